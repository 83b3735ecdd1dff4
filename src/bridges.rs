//! Bridge (virtual connection) detection.
//!
//! A bridge is a pair of empty cells between two stones of the same player,
//! arranged so that whichever cell the opponent takes, the other one still
//! links the stones. The detector only surfaces these as move suggestions;
//! answering an intrusion into a bridge is left to the caller.

use crate::board::{Board, Move, Player, offset};
use crate::constants::BRIDGE_TEMPLATES;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bridge {
    /// The two empty cells, in template order from the first anchor found.
    pub cells: [Move; 2],
    /// The two stones the bridge links.
    pub anchors: [Move; 2],
}

impl Bridge {
    /// The first cell of the bridge that is still empty on `board`.
    pub fn completion<B: Board>(&self, board: &B) -> Option<Move> {
        self.cells.into_iter().find(|&mv| board.is_empty_cell(mv))
    }

    fn key(&self) -> [Move; 2] {
        let [a, b] = self.cells;
        if a <= b { [a, b] } else { [b, a] }
    }
}

/// Find every bridge between two of `player`'s stones.
///
/// Each stone is tried against the four "L" templates; a bridge seen from
/// both of its anchors is reported once.
pub fn find_bridges<B: Board>(board: &B, player: Player) -> Vec<Bridge> {
    let n = board.size();
    let mut bridges: Vec<Bridge> = Vec::new();

    for stone in board.stones_of(player) {
        for [a, b] in BRIDGE_TEMPLATES {
            let (Some(first), Some(second)) = (offset(n, stone, a), offset(n, stone, b)) else {
                continue;
            };
            if !board.is_empty_cell(first) || !board.is_empty_cell(second) {
                continue;
            }
            let Some(far) = offset(n, stone, (a.0 + b.0, a.1 + b.1)) else {
                continue;
            };
            if board.occupancy(far.0, far.1) != Some(player) {
                continue;
            }

            let bridge = Bridge {
                cells: [first, second],
                anchors: [stone, far],
            };
            if !bridges.iter().any(|known| known.key() == bridge.key()) {
                bridges.push(bridge);
            }
        }
    }

    bridges
}
