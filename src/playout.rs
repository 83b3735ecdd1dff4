//! Monte Carlo playouts (semi-random game simulation).
//!
//! A playout alternates moves from a position until one side links its
//! edges or the move cap (board area) is reached. Most steps are greedy
//! under [`rollout_score`]; the rest are uniformly random, which keeps the
//! simulations varied. All randomness comes from the caller's generator so
//! seeded searches are reproducible.

use fastrand::Rng;

use crate::board::{Board, Move, Player};
use crate::constants::{DRAW_VALUE, PROB_ROLLOUT_HEURISTIC};
use crate::evaluator::rollout_score;

/// Outcome of one simulated game.
#[derive(Clone, Debug, PartialEq)]
pub struct Playout {
    /// 1.0 win, 0.0 loss, 0.5 draw, from the requested perspective.
    pub result: f64,
    /// Every `(player, move)` played, in order.
    pub moves: Vec<(Player, Move)>,
}

/// Simulate from `board` with `to_move` playing first.
///
/// The result is scored for `perspective`. The starting board is not modified.
pub fn mcplayout<B: Board>(board: &B, to_move: Player, perspective: Player, rng: &mut Rng) -> Playout {
    let mut board = board.clone();
    let max_moves = board.size() * board.size();
    let mut moves = Vec::new();
    let mut player = to_move;

    let mut winner = board.winner();
    while winner.is_none() {
        let legal = board.legal_moves();
        if legal.is_empty() || moves.len() >= max_moves {
            break;
        }

        let mv = choose_move(&board, &legal, player, rng);
        if board.place(mv.0, mv.1, player).is_err() {
            break;
        }
        moves.push((player, mv));
        if board.has_connected(player) {
            winner = Some(player);
        }
        player = player.opponent();
    }

    let result = match winner {
        Some(p) if p == perspective => 1.0,
        Some(_) => 0.0,
        None => DRAW_VALUE,
    };
    Playout { result, moves }
}

/// Pick a playout move: usually the best by [`rollout_score`] (ties broken at
/// random), otherwise any legal move.
fn choose_move<B: Board>(board: &B, legal: &[Move], player: Player, rng: &mut Rng) -> Move {
    if rng.f64() >= PROB_ROLLOUT_HEURISTIC {
        return legal[rng.usize(..legal.len())];
    }

    let mut best_score = i64::MIN;
    let mut best: Vec<Move> = Vec::new();
    for &mv in legal {
        let score = rollout_score(board, mv, player);
        if score > best_score {
            best_score = score;
            best.clear();
            best.push(mv);
        } else if score == best_score {
            best.push(mv);
        }
    }
    best[rng.usize(..best.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HexBoard;

    #[test]
    fn test_finished_game_needs_no_moves() {
        let board = HexBoard::from_rows(&[
            ". . .",
            "X X X",
            ". . .",
        ])
        .unwrap();
        let mut rng = Rng::with_seed(1);

        let won = mcplayout(&board, Player::Two, Player::One, &mut rng);
        assert_eq!(won.result, 1.0);
        assert!(won.moves.is_empty());

        let lost = mcplayout(&board, Player::Two, Player::Two, &mut rng);
        assert_eq!(lost.result, 0.0);
    }

    #[test]
    fn test_playout_alternates_and_fills_empty_cells() {
        let board = HexBoard::new(5);
        let mut rng = Rng::with_seed(7);
        let playout = mcplayout(&board, Player::One, Player::One, &mut rng);

        assert!(playout.result == 0.0 || playout.result == 1.0);
        assert!(!playout.moves.is_empty());
        assert!(playout.moves.len() <= 25);
        for (i, &(player, _)) in playout.moves.iter().enumerate() {
            let expected = if i % 2 == 0 { Player::One } else { Player::Two };
            assert_eq!(player, expected);
        }

        let mut replay = board.clone();
        for &(player, (r, c)) in &playout.moves {
            assert!(replay.place(r, c, player).is_ok());
        }
        let last = playout.moves.last().unwrap().0;
        assert!(replay.has_connected(last));
        assert_eq!(playout.result == 1.0, last == Player::One);
        assert_eq!(board.stone_count(), 0);
    }

    #[test]
    fn test_same_seed_same_playout() {
        let board = HexBoard::new(6);
        let a = mcplayout(&board, Player::Two, Player::One, &mut Rng::with_seed(42));
        let b = mcplayout(&board, Player::Two, Player::One, &mut Rng::with_seed(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_winning_cell_is_taken_greedily_or_randomly() {
        // Whoever moves on a 1x1 board wins immediately.
        let board = HexBoard::new(1);
        let playout = mcplayout(&board, Player::Two, Player::One, &mut Rng::with_seed(3));
        assert_eq!(playout.moves, vec![(Player::Two, (0, 0))]);
        assert_eq!(playout.result, 0.0);
    }
}
