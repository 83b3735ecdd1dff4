//! Critical-move aggregation.
//!
//! Merges three sources of urgent moves into a single candidate list:
//!
//! 1. Blocks: when the opponent is within three stones of connecting, every
//!    legal move that lengthens their shortest connection.
//! 2. Advances: when we are within three stones, every legal move that
//!    shortens ours.
//! 3. Line and pattern threats built by the opponent's stones.
//!
//! Each legal move is cloned onto a hypothetical board at most once, and the
//! shortest-connection search runs at most twice per move.

use std::collections::HashSet;

use log::debug;

use crate::board::{Board, Move, Player, with_stone};
use crate::constants::{
    ADVANCE_BASE, ADVANCE_PER_STEP, BLOCK_BASE, BLOCK_PER_STEP, CRITICAL_THRESHOLD, NEAR_WIN_COST,
};
use crate::pathfinding::shortest_connection;
use crate::threats::{ThreatCandidate, line_threats, pattern_threats};

#[inline]
fn scaled(base: u32, per_step: u32, steps: i64) -> u32 {
    let steps = u32::try_from(steps).unwrap_or(u32::MAX);
    base.saturating_add(per_step.saturating_mul(steps))
}

/// Collect every critical candidate for `player`, unsorted.
///
/// Order: blocks, then advances, then line threats, then pattern threats.
pub fn critical_moves<B: Board>(board: &B, player: Player) -> Vec<ThreatCandidate> {
    let opponent = player.opponent();
    let legal = board.legal_moves();

    let own_cost = shortest_connection(board, player);
    let opp_cost = shortest_connection(board, opponent);
    let defend = opp_cost.is_within(NEAR_WIN_COST);
    let attack = own_cost.is_within(NEAR_WIN_COST);

    let mut blocks = Vec::new();
    let mut advances = Vec::new();

    if defend || attack {
        for &mv in &legal {
            let Some(next) = with_stone(board, mv, player) else {
                continue;
            };
            if defend {
                let raised = opp_cost
                    .delta_to(shortest_connection(&next, opponent))
                    .filter(|&d| d > 0);
                if let Some(d) = raised {
                    blocks.push(ThreatCandidate::new(mv, scaled(BLOCK_BASE, BLOCK_PER_STEP, d)));
                }
            }
            if attack {
                let lowered = own_cost
                    .delta_to(shortest_connection(&next, player))
                    .filter(|&d| d < 0);
                if let Some(d) = lowered {
                    advances.push(ThreatCandidate::new(
                        mv,
                        scaled(ADVANCE_BASE, ADVANCE_PER_STEP, -d),
                    ));
                }
            }
        }
    }

    let legal: HashSet<Move> = legal.into_iter().collect();
    let mut candidates = blocks;
    candidates.append(&mut advances);
    candidates.extend(
        line_threats(board, opponent)
            .into_iter()
            .chain(pattern_threats(board, opponent))
            .filter(|t| legal.contains(&t.mv)),
    );

    debug!(
        "critical analysis for {player}: own cost {own_cost}, opponent cost {opp_cost}, {} candidates",
        candidates.len()
    );
    candidates
}

/// Sort `candidates` by descending priority and return the top one if it
/// must be played.
///
/// The sort is stable: equal priorities keep their aggregation order.
pub fn best_critical_move(candidates: &mut [ThreatCandidate]) -> Option<ThreatCandidate> {
    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    candidates
        .first()
        .copied()
        .filter(|c| c.priority >= CRITICAL_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HexBoard;

    #[test]
    fn test_quiet_board_has_no_candidates() {
        let board = HexBoard::new(7);
        assert!(critical_moves(&board, Player::One).is_empty());
    }

    #[test]
    fn test_blocks_opponent_gap() {
        let board = HexBoard::from_rows(&[
            ". . O . .",
            ". . O . .",
            ". . . . .",
            ". . O . .",
            ". . O . .",
        ])
        .unwrap();

        let mut candidates = critical_moves(&board, Player::One);
        // Block 150 + 20, both line ends 70, and the column pattern 80 + 40 + 40.
        assert!(candidates.contains(&ThreatCandidate::new((2, 2), 170)));
        assert!(candidates.contains(&ThreatCandidate::new((2, 2), 70)));
        assert!(candidates.contains(&ThreatCandidate::new((2, 2), 160)));

        let best = best_critical_move(&mut candidates).unwrap();
        assert_eq!(best, ThreatCandidate::new((2, 2), 170));
    }

    #[test]
    fn test_advances_own_near_win() {
        let board = HexBoard::from_rows(&[
            ". . . . .",
            ". . . . .",
            "X X . X X",
            ". . . . .",
            ". . . . .",
        ])
        .unwrap();

        let mut candidates = critical_moves(&board, Player::One);
        assert!(candidates.contains(&ThreatCandidate::new((2, 2), 230)));
        let best = best_critical_move(&mut candidates).unwrap();
        assert_eq!(best.mv, (2, 2));
    }

    #[test]
    fn test_line_threat_skips_blocked_end() {
        let board = HexBoard::from_rows(&[
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . X O O . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
        ])
        .unwrap();

        let candidates = critical_moves(&board, Player::One);
        assert_eq!(candidates, vec![ThreatCandidate::new((3, 5), 70)]);
    }

    #[test]
    fn test_low_priorities_are_not_critical() {
        let mut candidates = vec![
            ThreatCandidate::new((0, 0), 70),
            ThreatCandidate::new((1, 1), 90),
        ];
        assert_eq!(best_critical_move(&mut candidates), None);
        assert_eq!(candidates[0].mv, (1, 1));
        assert!(best_critical_move(&mut []).is_none());
    }

    #[test]
    fn test_equal_priorities_keep_aggregation_order() {
        let mut candidates = vec![
            ThreatCandidate::new((4, 4), 120),
            ThreatCandidate::new((0, 0), 150),
            ThreatCandidate::new((2, 2), 150),
        ];
        let best = best_critical_move(&mut candidates).unwrap();
        assert_eq!(best.mv, (0, 0));
        assert_eq!(candidates[1].mv, (2, 2));
    }
}
