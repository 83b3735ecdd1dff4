//! Move decision pipeline.
//!
//! [`HexEngine::decide_move`] runs a fixed sequence of stages and returns at
//! the first one that produces a move:
//!
//! 1. Game already decided or no legal moves: error.
//! 2. Empty board: opening book, else the centre.
//! 3. One opponent stone on the board: the second-move response.
//! 4. A critical move (block, advance or threat answer) of high priority.
//! 5. Completing a bridge, with a configurable probability.
//! 6. Too little time left: the strategic evaluator.
//! 7. MCTS-RAVE until the deadline; the most-visited root child.
//! 8. Fallbacks: strategic evaluator, then the cheap scorer.
//!
//! The caller's board is only read; every hypothetical position is a clone.

use std::time::{Duration, Instant};

use fastrand::Rng;
use log::{debug, info};
use thiserror::Error;

use crate::board::{Board, Move, Player};
use crate::bridges::find_bridges;
use crate::constants::{MIN_SEARCH_TIME, PROB_BRIDGE_COMPLETION, TIME_LIMIT};
use crate::critical::{best_critical_move, critical_moves};
use crate::evaluator::{fallback_move, strategic_move};
use crate::mcts::{SearchTree, dump_children, tree_search};
use crate::opening::{OpeningBook, second_move_response};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("no legal moves available")]
    NoLegalMoves,
    #[error("game is over: {0} has already connected")]
    GameOver(Player),
}

/// Per-engine tuning knobs.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Wall-clock budget for one decision
    pub time_limit: Duration,
    /// Skip the search when less than this remains
    pub min_search_time: Duration,
    /// Stop the search after this many iterations even if time remains
    pub max_iterations: Option<usize>,
    /// Chance of completing a bridge before searching
    pub bridge_probability: f64,
    /// Seed for all random choices; `None` seeds from the environment
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit: TIME_LIMIT,
            min_search_time: MIN_SEARCH_TIME,
            max_iterations: None,
            bridge_probability: PROB_BRIDGE_COMPLETION,
            seed: None,
        }
    }
}

/// A Hex player.
pub struct HexEngine {
    player: Player,
    config: EngineConfig,
    book: OpeningBook,
    /// Opponent stones in the order they were first seen
    observed: Vec<Move>,
    rng: Rng,
}

impl HexEngine {
    /// Create an engine for `player` with default settings.
    pub fn new(player: Player) -> Self {
        Self::with_config(player, EngineConfig::default())
    }

    pub fn with_config(player: Player, config: EngineConfig) -> Self {
        let rng = config.seed.map_or_else(Rng::new, Rng::with_seed);
        Self {
            player,
            config,
            book: OpeningBook::default(),
            observed: Vec::new(),
            rng,
        }
    }

    /// Replace the opening book.
    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opponent stones seen so far, oldest first.
    pub fn observed(&self) -> &[Move] {
        &self.observed
    }

    fn observe<B: Board>(&mut self, board: &B) {
        for stone in board.stones_of(self.player.opponent()) {
            if !self.observed.contains(&stone) {
                self.observed.push(stone);
            }
        }
    }

    /// Choose a move for this engine's player on `board`.
    ///
    /// Every move returned is legal on `board`.
    pub fn decide_move<B: Board>(&mut self, board: &B) -> Result<Move, EngineError> {
        let start = Instant::now();
        let deadline = start + self.config.time_limit;
        let player = self.player;

        if let Some(winner) = board.winner() {
            return Err(EngineError::GameOver(winner));
        }
        if board.legal_moves().is_empty() {
            return Err(EngineError::NoLegalMoves);
        }
        self.observe(board);

        match board.stone_count() {
            0 => {
                let mv = self.book.first_move(board.size());
                if board.is_empty_cell(mv) {
                    info!("{player}: opening move {mv:?}");
                    return Ok(mv);
                }
            }
            1 => {
                if let [stone] = board.stones_of(player.opponent())[..] {
                    let reply = second_move_response(board, stone, player)
                        .filter(|&mv| board.is_empty_cell(mv));
                    if let Some(mv) = reply {
                        info!("{player}: reply {mv:?} to first stone {stone:?}");
                        return Ok(mv);
                    }
                }
            }
            _ => {}
        }

        let mut candidates = critical_moves(board, player);
        if let Some(critical) = best_critical_move(&mut candidates) {
            info!(
                "{player}: critical move {:?} (priority {})",
                critical.mv, critical.priority
            );
            return Ok(critical.mv);
        }

        let bridges = find_bridges(board, player);
        if !bridges.is_empty() && self.rng.f64() < self.config.bridge_probability {
            if let Some(mv) = bridges.iter().find_map(|b| b.completion(board)) {
                info!("{player}: completing bridge at {mv:?}");
                return Ok(mv);
            }
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining < self.config.min_search_time {
            debug!("{player}: {remaining:?} left, skipping search");
        } else {
            let mut tree = SearchTree::new(board.clone(), player);
            tree.seed_root_priors(&candidates);
            let best = tree_search(&mut tree, deadline, self.config.max_iterations, &mut self.rng);
            dump_children(&tree);
            if let Some(mv) = best {
                info!(
                    "{player}: search move {mv:?} after {} iterations in {:.2}s",
                    tree.root().visits,
                    start.elapsed().as_secs_f64()
                );
                return Ok(mv);
            }
        }

        let mv = strategic_move(board, player)
            .or_else(|| fallback_move(board, player))
            .ok_or(EngineError::NoLegalMoves)?;
        info!("{player}: static move {mv:?}");
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HexBoard;

    fn seeded(player: Player, seed: u64) -> HexEngine {
        HexEngine::with_config(
            player,
            EngineConfig {
                max_iterations: Some(200),
                seed: Some(seed),
                ..EngineConfig::default()
            },
        )
    }

    fn quiet_board() -> HexBoard {
        HexBoard::from_rows(&[
            ". . . . . . .",
            ". . . . . O .",
            ". . . . . . .",
            ". . . X . . .",
            ". . . . . . .",
            ". O . . . . .",
            ". . . . . . .",
        ])
        .unwrap()
    }

    #[test]
    fn test_finished_game_is_an_error() {
        let board = HexBoard::from_rows(&[
            ". O .",
            ". O .",
            "X O .",
        ])
        .unwrap();
        let mut engine = seeded(Player::One, 1);
        assert_eq!(
            engine.decide_move(&board),
            Err(EngineError::GameOver(Player::Two))
        );
    }

    #[test]
    fn test_opening_uses_book_then_centre() {
        let mut engine = seeded(Player::One, 1);
        assert_eq!(engine.decide_move(&HexBoard::new(11)), Ok((5, 5)));
        assert_eq!(engine.decide_move(&HexBoard::new(9)), Ok((4, 4)));

        let mut book = OpeningBook::empty();
        book.insert(9, 0, (2, 6));
        let mut engine = seeded(Player::Two, 1).with_book(book);
        assert_eq!(engine.decide_move(&HexBoard::new(9)), Ok((2, 6)));
    }

    #[test]
    fn test_second_move_answers_edge_stone() {
        let mut board = HexBoard::new(11);
        board.place(0, 4, Player::One).unwrap();
        let mut engine = seeded(Player::Two, 1);
        assert_eq!(engine.decide_move(&board), Ok((0, 3)));
        assert_eq!(engine.observed(), &[(0, 4)]);
    }

    #[test]
    fn test_critical_move_short_circuits() {
        let board = HexBoard::from_rows(&[
            ". . O . .",
            ". . O . .",
            ". . . . .",
            ". . O . .",
            ". X O . .",
        ])
        .unwrap();
        let mut engine = seeded(Player::One, 1);
        assert_eq!(engine.decide_move(&board), Ok((2, 2)));
    }

    #[test]
    fn test_bridge_completion_when_certain() {
        let mut board = HexBoard::new(7);
        board.place(2, 3, Player::One).unwrap();
        board.place(3, 2, Player::One).unwrap();
        board.place(6, 6, Player::Two).unwrap();

        let mut engine = HexEngine::with_config(
            Player::One,
            EngineConfig {
                bridge_probability: 1.0,
                seed: Some(5),
                ..EngineConfig::default()
            },
        );
        assert_eq!(engine.decide_move(&board), Ok((2, 2)));
    }

    #[test]
    fn test_short_budget_uses_strategic_move() {
        let board = quiet_board();
        let mut engine = HexEngine::with_config(
            Player::One,
            EngineConfig {
                time_limit: Duration::from_millis(100),
                min_search_time: Duration::from_secs(1),
                bridge_probability: 0.0,
                seed: Some(2),
                ..EngineConfig::default()
            },
        );
        assert_eq!(
            engine.decide_move(&board).ok(),
            strategic_move(&board, Player::One)
        );
    }

    #[test]
    fn test_search_is_reproducible_with_seed() {
        let board = quiet_board();
        let a = seeded(Player::Two, 17).decide_move(&board).unwrap();
        let b = seeded(Player::Two, 17).decide_move(&board).unwrap();
        assert_eq!(a, b);
        assert!(board.legal_moves().contains(&a));
        assert_eq!(board.stone_count(), 3);
    }

    #[test]
    fn test_observed_stones_accumulate() {
        let mut engine = seeded(Player::One, 3);
        let mut board = quiet_board();
        engine.decide_move(&board).unwrap();
        assert_eq!(engine.observed(), &[(1, 5), (5, 1)]);

        board.place(0, 0, Player::Two).unwrap();
        engine.decide_move(&board).unwrap();
        assert_eq!(engine.observed(), &[(1, 5), (5, 1), (0, 0)]);
    }
}
