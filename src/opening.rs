//! Opening book and the reply to the opponent's first stone.

use std::collections::HashMap;

use crate::board::{Board, Move, Player, neighbors};

/// Book moves keyed by `(board size, ply)`.
#[derive(Clone, Debug)]
pub struct OpeningBook {
    entries: HashMap<(usize, usize), Move>,
}

impl Default for OpeningBook {
    fn default() -> Self {
        let mut book = Self::empty();
        book.insert(11, 0, (5, 5));
        book.insert(7, 0, (3, 3));
        book
    }
}

impl OpeningBook {
    /// A book with no entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, size: usize, ply: usize, mv: Move) {
        self.entries.insert((size, ply), mv);
    }

    pub fn lookup(&self, size: usize, ply: usize) -> Option<Move> {
        self.entries.get(&(size, ply)).copied()
    }

    /// Move for an empty board: the book entry if it fits, else the centre.
    pub fn first_move(&self, size: usize) -> Move {
        self.lookup(size, 0)
            .filter(|&(r, c)| r < size && c < size)
            .unwrap_or((size / 2, size / 2))
    }
}

/// Reply for `player` to the single opponent stone at `stone`.
///
/// Edge stones are answered next to the stone along the edge, stones near
/// the centre by the empty neighbour most central on `player`'s lateral
/// axis, and anything else by a pulled-in mirror point. Returns `None` when
/// every choice is occupied.
pub fn second_move_response<B: Board>(board: &B, stone: Move, player: Player) -> Option<Move> {
    let n = board.size();
    let centre = n / 2;
    let (r, c) = stone;

    let on_edge = r == 0 || c == 0 || r + 1 == n || c + 1 == n;
    if on_edge {
        let along_row = (r <= 1)
            .then(|| {
                [c.checked_sub(1), Some(c), Some(c + 1)]
                    .into_iter()
                    .flatten()
                    .map(|nc| (r, nc))
                    .find(|&mv| board.is_empty_cell(mv))
            })
            .flatten();
        let along_col = || {
            (c <= 1)
                .then(|| {
                    [r.checked_sub(1), Some(r), Some(r + 1)]
                        .into_iter()
                        .flatten()
                        .map(|nr| (nr, c))
                        .find(|&mv| board.is_empty_cell(mv))
                })
                .flatten()
        };
        if let Some(mv) = along_row.or_else(along_col) {
            return Some(mv);
        }
    }

    if r.abs_diff(centre) + c.abs_diff(centre) <= 2 {
        let mut best: Option<(Move, usize)> = None;
        for mv in neighbors(n, stone).filter(|&mv| board.is_empty_cell(mv)) {
            let value = n - 1 - player.lateral(mv).abs_diff(centre);
            if best.is_none_or(|(_, b)| value > b) {
                best = Some((mv, value));
            }
        }
        if let Some((mv, _)) = best {
            return Some(mv);
        }
    }

    let mirror = ((n - 1 - r + centre) / 2, (n - 1 - c + centre) / 2);
    if board.is_empty_cell(mirror) {
        return Some(mirror);
    }

    Some((centre, centre)).filter(|&mv| board.is_empty_cell(mv))
}
