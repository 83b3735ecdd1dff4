//! hex-rave: a Hex-playing engine built on MCTS with RAVE.
//!
//! The engine layers cheap tactical checks in front of a Monte Carlo Tree
//! Search: an opening book, blocking and advancing moves found with an A*
//! shortest-connection estimate, row/column threat scans and bridge
//! completion. Whatever those leave undecided goes to the search.
//!
//! ## Modules
//!
//! - [`constants`] - Tuning parameters and board geometry
//! - [`board`] - The `Board` trait, players, and the `HexBoard` implementation
//! - [`pathfinding`] - A* shortest-connection cost
//! - [`threats`] - Line and pattern threat scans
//! - [`bridges`] - Bridge (virtual connection) detection
//! - [`evaluator`] - One-ply static move scoring
//! - [`critical`] - Aggregation of urgent moves
//! - [`playout`] - Semi-greedy game simulation
//! - [`mcts`] - Monte Carlo Tree Search with RAVE
//! - [`opening`] - Opening book and first-reply logic
//! - [`engine`] - The decision pipeline
//!
//! ## Example
//!
//! ```
//! use hex_rave::board::{Board, HexBoard, Player};
//! use hex_rave::engine::{EngineConfig, HexEngine};
//!
//! let mut board = HexBoard::new(7);
//! board.place(3, 3, Player::One).unwrap();
//! board.place(2, 4, Player::Two).unwrap();
//!
//! let config = EngineConfig {
//!     max_iterations: Some(100),
//!     seed: Some(1),
//!     ..EngineConfig::default()
//! };
//! let mut engine = HexEngine::with_config(Player::One, config);
//! let mv = engine.decide_move(&board).unwrap();
//! assert!(board.legal_moves().contains(&mv));
//! ```

pub mod board;
pub mod bridges;
pub mod constants;
pub mod critical;
pub mod engine;
pub mod evaluator;
pub mod mcts;
pub mod opening;
pub mod pathfinding;
pub mod playout;
pub mod threats;
