//! Row and column threat detection.
//!
//! Two cheap scans over the board's rows and columns:
//!
//! - **Line threats**: maximal contiguous runs of a player's stones of length
//!   two or more. The empty cells just beyond either end of the run are the
//!   cells that would extend it.
//! - **Pattern threats**: lines where a player already holds three or more
//!   stones, contiguous or not. Every empty cell of such a line is flagged,
//!   with a bonus for sitting right next to the player's stones.
//!
//! Both scans are player-agnostic; the critical-move aggregator runs them
//! against the opponent to find blocking moves.

use crate::board::{Board, Move, Player};
use crate::constants::{
    LINE_THREAT_BASE, LINE_THREAT_PER_STONE, PATTERN_MIN_STONES, PATTERN_THREAT_BASE,
    PATTERN_THREAT_CONTINUITY, PATTERN_THREAT_PER_STONE,
};

/// A move worth considering, with an opaque ranking (higher is more urgent).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ThreatCandidate {
    pub mv: Move,
    pub priority: u32,
}

impl ThreatCandidate {
    #[inline]
    pub fn new(mv: Move, priority: u32) -> Self {
        Self { mv, priority }
    }
}

/// Rows are scanned before columns.
#[derive(Copy, Clone, Debug)]
enum Axis {
    Row,
    Column,
}

impl Axis {
    const ALL: [Axis; 2] = [Axis::Row, Axis::Column];

    /// Cell `i` of line number `line`.
    #[inline]
    fn cell(self, line: usize, i: usize) -> Move {
        match self {
            Axis::Row => (line, i),
            Axis::Column => (i, line),
        }
    }
}

#[inline]
fn owner<B: Board>(board: &B, (row, col): Move) -> Option<Player> {
    board.occupancy(row, col)
}

/// Open cells that would extend a contiguous run of `player`'s stones.
///
/// Priority is `50 + 10 * run_length`.
pub fn line_threats<B: Board>(board: &B, player: Player) -> Vec<ThreatCandidate> {
    let n = board.size();
    let mut threats = Vec::new();

    for axis in Axis::ALL {
        for line in 0..n {
            let mut i = 0;
            while i < n {
                if owner(board, axis.cell(line, i)) != Some(player) {
                    i += 1;
                    continue;
                }
                let start = i;
                while i < n && owner(board, axis.cell(line, i)) == Some(player) {
                    i += 1;
                }

                let run = i - start;
                if run < 2 {
                    continue;
                }
                let priority = LINE_THREAT_BASE + LINE_THREAT_PER_STONE * run as u32;
                if start > 0 && board.is_empty_cell(axis.cell(line, start - 1)) {
                    threats.push(ThreatCandidate::new(axis.cell(line, start - 1), priority));
                }
                if i < n && board.is_empty_cell(axis.cell(line, i)) {
                    threats.push(ThreatCandidate::new(axis.cell(line, i), priority));
                }
            }
        }
    }

    threats
}

/// Empty cells of every row or column where `player` holds at least three stones.
///
/// Priority is `80 + 10 * stones_in_line + 20 * continuity`, where continuity
/// counts the player's stones directly beside the cell along the line.
pub fn pattern_threats<B: Board>(board: &B, player: Player) -> Vec<ThreatCandidate> {
    let n = board.size();
    let mut threats = Vec::new();

    for axis in Axis::ALL {
        for line in 0..n {
            let count = (0..n)
                .filter(|&i| owner(board, axis.cell(line, i)) == Some(player))
                .count();
            if count < PATTERN_MIN_STONES {
                continue;
            }

            for i in 0..n {
                if !board.is_empty_cell(axis.cell(line, i)) {
                    continue;
                }
                let before = i > 0 && owner(board, axis.cell(line, i - 1)) == Some(player);
                let after = i + 1 < n && owner(board, axis.cell(line, i + 1)) == Some(player);
                let continuity = u32::from(before) + u32::from(after);

                let priority = PATTERN_THREAT_BASE
                    + PATTERN_THREAT_PER_STONE * count as u32
                    + PATTERN_THREAT_CONTINUITY * continuity;
                threats.push(ThreatCandidate::new(axis.cell(line, i), priority));
            }
        }
    }

    threats
}
