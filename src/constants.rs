//! Constants for board geometry, search parameters, and move priorities.
//!
//! This module contains all the tuning constants for the Hex engine.
//! Per-engine knobs that callers may want to change at runtime live in
//! [`crate::engine::EngineConfig`], whose defaults are taken from here.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Standard tournament board size.
pub const DEFAULT_SIZE: usize = 11;

/// Offsets to the six neighbouring cells of a hex cell, as (row, col) deltas.
/// Order: West, East, North, South, North-East, South-West
pub const HEX_DIRS: [(isize, isize); 6] = [(0, -1), (0, 1), (-1, 0), (1, 0), (-1, 1), (1, -1)];

/// The four "L" templates used to detect bridges. The far stone of the
/// bridge sits at the sum of the two offsets.
pub const BRIDGE_TEMPLATES: [[(isize, isize); 2]; 4] = [
    [(0, 1), (1, 0)],
    [(0, -1), (1, 0)],
    [(0, 1), (-1, 0)],
    [(0, -1), (-1, 0)],
];

// =============================================================================
// Shortest-Connection Search
// =============================================================================

/// Step cost through a cell already held by the searching player.
pub const OWN_CELL_COST: u32 = 0;

/// Step cost through an empty cell.
pub const EMPTY_CELL_COST: u32 = 1;

/// Step cost through an opponent cell. Large but finite so the search still
/// finds a (useless) path instead of failing.
pub const BLOCKED_CELL_COST: u32 = 1000;

// =============================================================================
// Threat Priorities
// =============================================================================

/// Candidates at or above this priority are played without searching.
pub const CRITICAL_THRESHOLD: u32 = 100;

/// A shortest-connection cost at or below this triggers delta analysis.
pub const NEAR_WIN_COST: u32 = 3;

/// Base priority and per-stone bonus for extending a contiguous line.
pub const LINE_THREAT_BASE: u32 = 50;
pub const LINE_THREAT_PER_STONE: u32 = 10;

/// Minimum stones in a row/column before it counts as a pattern.
pub const PATTERN_MIN_STONES: usize = 3;

/// Base priority, per-stone bonus and per-adjacent-stone bonus for patterns.
pub const PATTERN_THREAT_BASE: u32 = 80;
pub const PATTERN_THREAT_PER_STONE: u32 = 10;
pub const PATTERN_THREAT_CONTINUITY: u32 = 20;

/// Priority for a move that lengthens the opponent's shortest connection.
pub const BLOCK_BASE: u32 = 150;
pub const BLOCK_PER_STEP: u32 = 20;

/// Priority for a move that shortens our own shortest connection.
pub const ADVANCE_BASE: u32 = 200;
pub const ADVANCE_PER_STEP: u32 = 30;

// =============================================================================
// Static Evaluation Weights
// =============================================================================

/// Strategic evaluator: bonus per neighbouring own stone.
pub const STRATEGIC_FRIEND_BONUS: f64 = 5.0;

/// Strategic evaluator: weight of our own path shortening in attack mode.
pub const STRATEGIC_ATTACK_WEIGHT: f64 = 10.0;

/// Strategic evaluator: weight of the opponent path lengthening in defense mode.
pub const STRATEGIC_DEFENSE_WEIGHT: f64 = 8.0;

/// Fallback scorer: bonus per neighbouring own / opponent stone.
pub const FALLBACK_FRIEND_BONUS: f64 = 5.0;
pub const FALLBACK_ENEMY_BONUS: f64 = 1.0;

/// Rollout policy: weight per neighbouring own / opponent stone.
pub const ROLLOUT_FRIEND_WEIGHT: i64 = 3;
pub const ROLLOUT_ENEMY_WEIGHT: i64 = 1;

// =============================================================================
// MCTS (Monte Carlo Tree Search) Parameters
// =============================================================================

/// RAVE equivalence parameter: beta = sqrt(k / (3 * visits + k)).
pub const RAVE_EQUIV: f64 = 1000.0;

/// UCT exploration constant.
pub const UCT_EXPLORATION: f64 = 1.4;

/// Added to AMAF visit counts before dividing.
pub const AMAF_EPSILON: f64 = 1e-6;

/// AMAF value assumed for moves without AMAF statistics.
pub const AMAF_NEUTRAL: f64 = 0.5;

/// Probability of expanding from the top third of the scored untried moves.
pub const PROB_EXPAND_TOP: f64 = 0.75;

/// Probability of a greedy (heuristic) step in a rollout.
pub const PROB_ROLLOUT_HEURISTIC: f64 = 0.7;

/// Result of a rollout that hit the move cap.
pub const DRAW_VALUE: f64 = 0.5;

/// Pseudo-visits given to critical moves when seeding root AMAF statistics.
pub const PRIOR_CRITICAL_VISITS: u32 = 10;

/// Priority that maps to a full-strength critical prior.
pub const PRIOR_CRITICAL_SCALE: f64 = 300.0;

/// Search iterations between progress reports.
pub const REPORT_PERIOD: usize = 500;

// =============================================================================
// Decision Budget
// =============================================================================

/// Wall-clock budget per decision.
pub const TIME_LIMIT: Duration = Duration::from_secs(10);

/// Below this remaining budget the search is skipped.
pub const MIN_SEARCH_TIME: Duration = Duration::from_millis(500);

/// Probability of completing a bridge instead of searching.
pub const PROB_BRIDGE_COMPLETION: f64 = 0.7;
