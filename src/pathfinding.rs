//! Shortest-connection estimation.
//!
//! An A* search over the hex grid that estimates how many more stones a
//! player needs to link their two edges. Own stones are free, empty cells
//! cost one stone, and opponent stones carry a large finite penalty so the
//! search degrades instead of failing when every route is blocked.
//!
//! The estimator is the most expensive primitive in the engine: the
//! critical-move analysis and the strategic evaluator call it once per
//! candidate move.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use crate::board::{Board, Move, Player, neighbors};
use crate::constants::{BLOCKED_CELL_COST, EMPTY_CELL_COST, OWN_CELL_COST};

/// Number of stones still needed to connect, or no path at all.
///
/// Ordered so that `Unreachable` is worse than any finite cost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cost {
    Finite(u32),
    Unreachable,
}

impl Cost {
    #[inline]
    pub fn finite(self) -> Option<u32> {
        match self {
            Cost::Finite(c) => Some(c),
            Cost::Unreachable => None,
        }
    }

    /// True when the cost is finite and at most `limit`.
    #[inline]
    pub fn is_within(self, limit: u32) -> bool {
        self.finite().is_some_and(|c| c <= limit)
    }

    /// `after - self`, or `None` when either side has no path.
    #[inline]
    pub fn delta_to(self, after: Cost) -> Option<i64> {
        Some(i64::from(after.finite()?) - i64::from(self.finite()?))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(c) => write!(f, "{c}"),
            Cost::Unreachable => write!(f, "inf"),
        }
    }
}

#[inline]
fn cell_cost<B: Board>(board: &B, (row, col): Move, player: Player) -> u32 {
    match board.occupancy(row, col) {
        Some(p) if p == player => OWN_CELL_COST,
        Some(_) => BLOCKED_CELL_COST,
        None => EMPTY_CELL_COST,
    }
}

/// Estimate the stones `player` still needs to link their edges.
///
/// Seeds every cell of the starting edge not held by the opponent, then runs
/// A* with the remaining distance to the far edge as heuristic. The first
/// goal-edge cell popped gives the answer.
pub fn shortest_connection<B: Board>(board: &B, player: Player) -> Cost {
    let n = board.size();
    if n == 0 {
        return Cost::Unreachable;
    }

    let idx = |(r, c): Move| r * n + c;
    let heuristic = |mv: Move| (n - 1 - player.progress(mv)) as u32;

    let mut best = vec![u32::MAX; n * n];
    let mut closed = vec![false; n * n];
    let mut open = BinaryHeap::new();

    for i in 0..n {
        let mv = player.start_cell(i);
        if board.occupancy(mv.0, mv.1) == Some(player.opponent()) {
            continue;
        }
        let g = cell_cost(board, mv, player);
        if g < best[idx(mv)] {
            best[idx(mv)] = g;
            open.push(Reverse((g + heuristic(mv), g, mv)));
        }
    }

    while let Some(Reverse((_, g, mv))) = open.pop() {
        if closed[idx(mv)] {
            continue;
        }
        closed[idx(mv)] = true;

        if player.is_goal(n, mv) {
            return Cost::Finite(g);
        }

        for next in neighbors(n, mv) {
            if closed[idx(next)] {
                continue;
            }
            let ng = g + cell_cost(board, next, player);
            if ng < best[idx(next)] {
                best[idx(next)] = ng;
                open.push(Reverse((ng + heuristic(next), ng, next)));
            }
        }
    }

    Cost::Unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HexBoard;

    #[test]
    fn test_empty_board_needs_one_stone_per_line() {
        for n in [1, 3, 7, 11] {
            let board = HexBoard::new(n);
            assert_eq!(shortest_connection(&board, Player::One), Cost::Finite(n as u32));
            assert_eq!(shortest_connection(&board, Player::Two), Cost::Finite(n as u32));
        }
    }

    #[test]
    fn test_complete_chain_costs_nothing() {
        let board = HexBoard::from_rows(&[
            ". . . . .",
            ". . . . .",
            "X X X X X",
            ". . . . .",
            ". . . . .",
        ])
        .unwrap();
        assert_eq!(shortest_connection(&board, Player::One), Cost::Finite(0));
    }

    #[test]
    fn test_gap_costs_one() {
        let board = HexBoard::from_rows(&[
            ". . O . .",
            ". . O . .",
            ". . . . .",
            ". . O . .",
            ". . O . .",
        ])
        .unwrap();
        assert_eq!(shortest_connection(&board, Player::Two), Cost::Finite(1));
    }

    #[test]
    fn test_own_stone_on_path_lowers_cost() {
        let mut board = HexBoard::new(5);
        let before = shortest_connection(&board, Player::One);
        board.place(2, 2, Player::One).unwrap();
        let after = shortest_connection(&board, Player::One);
        assert_eq!(before.delta_to(after), Some(-1));
    }

    #[test]
    fn test_wall_is_penalised_not_forbidden() {
        let board = HexBoard::from_rows(&[
            ". . O . .",
            ". . O . .",
            ". . O . .",
            ". . O . .",
            ". . O . .",
        ])
        .unwrap();
        let cost = shortest_connection(&board, Player::One);
        assert!(cost.finite().is_some_and(|c| c >= BLOCKED_CELL_COST));
    }

    #[test]
    fn test_blocked_start_edge_is_unreachable() {
        let board = HexBoard::from_rows(&[
            "O . .",
            "O . .",
            "O . .",
        ])
        .unwrap();
        assert_eq!(shortest_connection(&board, Player::One), Cost::Unreachable);
    }

    #[test]
    fn test_cost_ordering_and_deltas() {
        assert!(Cost::Unreachable > Cost::Finite(u32::MAX));
        assert!(Cost::Finite(2) < Cost::Finite(3));
        assert!(Cost::Finite(3).is_within(3));
        assert!(!Cost::Unreachable.is_within(3));
        assert_eq!(Cost::Finite(5).delta_to(Cost::Finite(2)), Some(-3));
        assert_eq!(Cost::Finite(5).delta_to(Cost::Unreachable), None);
    }
}
