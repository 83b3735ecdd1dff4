//! Static move scoring.
//!
//! This module holds every one-ply heuristic the engine uses:
//!
//! - [`strategic_move`]: the strongest static evaluator. It decides between
//!   attack and defense by comparing shortest-connection costs, then scores
//!   each legal move by centrality, advancement, adjacency and its effect on
//!   the relevant path.
//! - [`fallback_move`]: a cheap last-resort scorer with no path search.
//! - [`expansion_score`] and [`rollout_score`]: the tiny heuristics used by
//!   the tree search when ordering untried moves and during playouts.

use log::trace;

use crate::board::{Board, Move, Player, neighbor_counts, with_stone};
use crate::constants::{
    FALLBACK_ENEMY_BONUS, FALLBACK_FRIEND_BONUS, ROLLOUT_ENEMY_WEIGHT, ROLLOUT_FRIEND_WEIGHT,
    STRATEGIC_ATTACK_WEIGHT, STRATEGIC_DEFENSE_WEIGHT, STRATEGIC_FRIEND_BONUS,
};
use crate::pathfinding::shortest_connection;

/// Return the highest-scoring move; the first one wins ties.
fn best_by<I, F>(moves: I, mut score: F) -> Option<Move>
where
    I: IntoIterator<Item = Move>,
    F: FnMut(Move) -> Option<f64>,
{
    let mut best: Option<(Move, f64)> = None;
    for mv in moves {
        let Some(s) = score(mv) else { continue };
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((mv, s));
        }
    }
    best.map(|(mv, _)| mv)
}

#[inline]
fn centre_distance(size: usize, (row, col): Move) -> usize {
    let centre = size / 2;
    row.abs_diff(centre) + col.abs_diff(centre)
}

/// Pick the best move for `player` by one-ply static evaluation.
///
/// Attack mode (our path no longer than the opponent's) rewards moves that
/// shorten our own connection; defense mode rewards moves that lengthen the
/// opponent's.
pub fn strategic_move<B: Board>(board: &B, player: Player) -> Option<Move> {
    let n = board.size();
    let centre = n / 2;
    let opponent = player.opponent();

    let own_cost = shortest_connection(board, player);
    let opp_cost = shortest_connection(board, opponent);
    let attack = own_cost <= opp_cost;
    trace!(
        "strategic eval for {player}: own {own_cost}, opponent {opp_cost}, {}",
        if attack { "attack" } else { "defense" }
    );

    best_by(board.legal_moves(), |mv| {
        let mut score = 2.0 * (n - player.lateral(mv).abs_diff(centre)) as f64;
        score += player.progress(mv) as f64;

        let (friends, _) = neighbor_counts(board, mv, player);
        score += STRATEGIC_FRIEND_BONUS * friends as f64;

        let next = with_stone(board, mv, player)?;
        let path_term = if attack {
            own_cost
                .delta_to(shortest_connection(&next, player))
                .map_or(0.0, |d| -d as f64 * STRATEGIC_ATTACK_WEIGHT)
        } else {
            opp_cost
                .delta_to(shortest_connection(&next, opponent))
                .map_or(0.0, |d| d as f64 * STRATEGIC_DEFENSE_WEIGHT)
        };
        Some(score + path_term)
    })
}

/// Cheapest scorer over all legal moves: centrality, contact and advancement.
pub fn fallback_move<B: Board>(board: &B, player: Player) -> Option<Move> {
    let n = board.size();
    best_by(board.legal_moves(), |mv| {
        let (friends, enemies) = neighbor_counts(board, mv, player);
        let score = n as f64 - centre_distance(n, mv) as f64
            + FALLBACK_FRIEND_BONUS * friends as f64
            + FALLBACK_ENEMY_BONUS * enemies as f64
            + 2.0 * player.progress(mv) as f64;
        Some(score)
    })
}

/// Ordering score for untried moves during tree expansion.
#[inline]
pub fn expansion_score<B: Board>(board: &B, mv: Move, player: Player) -> f64 {
    let n = board.size();
    let (friends, enemies) = neighbor_counts(board, mv, player);
    (n as f64 - centre_distance(n, mv) as f64) + 2.0 * friends as f64 - enemies as f64
        + player.progress(mv) as f64 / 2.0
}

/// Greedy score used by the playout policy.
#[inline]
pub fn rollout_score<B: Board>(board: &B, mv: Move, player: Player) -> i64 {
    let (friends, enemies) = neighbor_counts(board, mv, player);
    ROLLOUT_FRIEND_WEIGHT * friends as i64
        + ROLLOUT_ENEMY_WEIGHT * enemies as i64
        + player.progress(mv) as i64
}
