//! Board abstraction and a concrete Hex board.
//!
//! The decision core only talks to positions through the [`Board`] trait:
//! it reads occupancy, enumerates legal moves, clones, places stones and asks
//! whether a player has linked their two edges. [`HexBoard`] is the
//! reference implementation used by the binary and the tests.
//!
//! Player [`Player::One`] links the left edge (column 0) to the right edge;
//! [`Player::Two`] links the top edge (row 0) to the bottom edge.

use std::fmt;

use thiserror::Error;

use crate::constants::HEX_DIRS;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Distance travelled from the player's starting edge (column for One,
    /// row for Two).
    #[inline]
    pub fn progress(self, (row, col): Move) -> usize {
        match self {
            Player::One => col,
            Player::Two => row,
        }
    }

    /// Coordinate across the player's advancing axis.
    #[inline]
    pub fn lateral(self, (row, col): Move) -> usize {
        match self {
            Player::One => row,
            Player::Two => col,
        }
    }

    /// Cell number `i` of the player's starting edge.
    #[inline]
    pub fn start_cell(self, i: usize) -> Move {
        match self {
            Player::One => (i, 0),
            Player::Two => (0, i),
        }
    }

    /// Whether `mv` lies on the edge the player is racing towards.
    #[inline]
    pub fn is_goal(self, size: usize, mv: Move) -> bool {
        self.progress(mv) + 1 == size
    }

    fn symbol(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "One"),
            Player::Two => write!(f, "Two"),
        }
    }
}

/// A cell coordinate, `(row, col)`.
pub type Move = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
    #[error("malformed board diagram: {0}")]
    Malformed(String),
}

/// What the decision core needs from a position.
///
/// `Clone` must produce an independent deep copy: mutating the clone never
/// affects the original.
pub trait Board: Clone {
    fn size(&self) -> usize;

    /// The stone at a cell, or `None` when empty. Out-of-range cells read as empty.
    fn occupancy(&self, row: usize, col: usize) -> Option<Player>;

    fn legal_moves(&self) -> Vec<Move>;

    fn place(&mut self, row: usize, col: usize, player: Player) -> Result<(), BoardError>;

    fn has_connected(&self, player: Player) -> bool;

    #[inline]
    fn is_empty_cell(&self, (row, col): Move) -> bool {
        row < self.size() && col < self.size() && self.occupancy(row, col).is_none()
    }

    fn stones_of(&self, player: Player) -> Vec<Move> {
        let n = self.size();
        (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .filter(|&(r, c)| self.occupancy(r, c) == Some(player))
            .collect()
    }

    fn stone_count(&self) -> usize {
        self.stones_of(Player::One).len() + self.stones_of(Player::Two).len()
    }

    /// The player who has already linked their edges, if any.
    fn winner(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&p| self.has_connected(p))
    }
}

/// Apply a (row, col) delta, staying on a `size` x `size` board.
#[inline]
pub fn offset(size: usize, (row, col): Move, (dr, dc): (isize, isize)) -> Option<Move> {
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < size && c < size).then_some((r, c))
}

/// The in-bounds hex neighbours of a cell.
#[inline]
pub fn neighbors(size: usize, mv: Move) -> impl Iterator<Item = Move> {
    HEX_DIRS.iter().filter_map(move |&d| offset(size, mv, d))
}

/// Count `(friendly, hostile)` stones around `mv` from `player`'s side.
pub fn neighbor_counts<B: Board>(board: &B, mv: Move, player: Player) -> (usize, usize) {
    let mut friends = 0;
    let mut enemies = 0;
    for (r, c) in neighbors(board.size(), mv) {
        match board.occupancy(r, c) {
            Some(p) if p == player => friends += 1,
            Some(_) => enemies += 1,
            None => {}
        }
    }
    (friends, enemies)
}

/// Clone `board` and play `mv` for `player` on the copy.
///
/// Returns `None` if the board refuses the stone.
pub fn with_stone<B: Board>(board: &B, (row, col): Move, player: Player) -> Option<B> {
    let mut next = board.clone();
    next.place(row, col, player).ok()?;
    Some(next)
}

/// A square Hex board stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexBoard {
    size: usize,
    cells: Vec<Option<Player>>,
}

impl HexBoard {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from a diagram, one string per row.
    ///
    /// `.` is empty, `X`/`1` is [`Player::One`], `O`/`2` is [`Player::Two`];
    /// whitespace is ignored so the output of `Display` parses back.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let size = rows.len();
        let mut board = Self::new(size);
        for (r, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != size {
                return Err(BoardError::Malformed(format!(
                    "row {r} has {} cells, expected {size}",
                    cells.len()
                )));
            }
            for (c, ch) in cells.into_iter().enumerate() {
                let stone = match ch {
                    '.' => None,
                    'X' | 'x' | '1' => Some(Player::One),
                    'O' | 'o' | '2' => Some(Player::Two),
                    other => {
                        return Err(BoardError::Malformed(format!(
                            "unexpected '{other}' at ({r}, {c})"
                        )));
                    }
                };
                if let Some(p) = stone {
                    board.place(r, c, p)?;
                }
            }
        }
        Ok(board)
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Flood-fill `player`'s stones from their starting edge.
    fn reaches_goal(&self, player: Player) -> bool {
        let mut visited = vec![false; self.size * self.size];
        let mut stack: Vec<Move> = (0..self.size)
            .map(|i| player.start_cell(i))
            .filter(|&(r, c)| self.occupancy(r, c) == Some(player))
            .collect();

        while let Some((r, c)) = stack.pop() {
            let i = self.idx(r, c);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            if player.is_goal(self.size, (r, c)) {
                return true;
            }
            for (nr, nc) in neighbors(self.size, (r, c)) {
                if !visited[self.idx(nr, nc)] && self.occupancy(nr, nc) == Some(player) {
                    stack.push((nr, nc));
                }
            }
        }
        false
    }
}

impl Board for HexBoard {
    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn occupancy(&self, row: usize, col: usize) -> Option<Player> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells[self.idx(row, col)]
    }

    fn legal_moves(&self) -> Vec<Move> {
        (0..self.size)
            .flat_map(|r| (0..self.size).map(move |c| (r, c)))
            .filter(|&(r, c)| self.cells[self.idx(r, c)].is_none())
            .collect()
    }

    fn place(&mut self, row: usize, col: usize, player: Player) -> Result<(), BoardError> {
        if row >= self.size || col >= self.size {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        let i = self.idx(row, col);
        if self.cells[i].is_some() {
            return Err(BoardError::Occupied { row, col });
        }
        self.cells[i] = Some(player);
        Ok(())
    }

    fn has_connected(&self, player: Player) -> bool {
        self.reaches_goal(player)
    }
}

impl fmt::Display for HexBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            write!(f, "{}", " ".repeat(r))?;
            for c in 0..self.size {
                let ch = self.occupancy(r, c).map_or('.', Player::symbol);
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = HexBoard::new(5);
        assert_eq!(board.size(), 5);
        assert_eq!(board.legal_moves().len(), 25);
        assert_eq!(board.stone_count(), 0);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_bounds() {
        let mut board = HexBoard::new(3);
        assert!(board.place(1, 1, Player::One).is_ok());
        assert_eq!(
            board.place(1, 1, Player::Two),
            Err(BoardError::Occupied { row: 1, col: 1 })
        );
        assert_eq!(
            board.place(3, 0, Player::Two),
            Err(BoardError::OutOfBounds { row: 3, col: 0, size: 3 })
        );
        assert_eq!(board.legal_moves().len(), 8);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut board = HexBoard::new(4);
        board.place(0, 0, Player::One).unwrap();
        let mut copy = board.clone();
        copy.place(2, 2, Player::Two).unwrap();

        assert_eq!(board.occupancy(2, 2), None);
        assert_eq!(copy.occupancy(2, 2), Some(Player::Two));
        assert_eq!(copy.occupancy(0, 0), Some(Player::One));
    }

    #[test]
    fn test_scripted_moves_are_deterministic() {
        let script = [
            ((0, 1), Player::One),
            ((2, 2), Player::Two),
            ((1, 1), Player::One),
            ((3, 0), Player::Two),
        ];
        let mut a = HexBoard::new(5).clone();
        let mut b = HexBoard::new(5);
        for &((r, c), p) in &script {
            a.place(r, c, p).unwrap();
            b.place(r, c, p).unwrap();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_horizontal_connection_for_player_one() {
        let board = HexBoard::from_rows(&[
            ". . . .",
            "X X X X",
            ". . . .",
            ". . . .",
        ])
        .unwrap();
        assert!(board.has_connected(Player::One));
        assert!(!board.has_connected(Player::Two));
        assert_eq!(board.winner(), Some(Player::One));
    }

    #[test]
    fn test_connection_follows_hex_diagonal() {
        // (r, c) touches (r + 1, c - 1), not (r + 1, c + 1).
        let linked = HexBoard::from_rows(&[
            ". . O",
            ". O .",
            "O . .",
        ])
        .unwrap();
        assert!(linked.has_connected(Player::Two));

        let broken = HexBoard::from_rows(&[
            "O . .",
            ". O .",
            ". . O",
        ])
        .unwrap();
        assert!(!broken.has_connected(Player::Two));
    }

    #[test]
    fn test_display_parses_back() {
        let mut board = HexBoard::new(4);
        board.place(0, 3, Player::One).unwrap();
        board.place(2, 1, Player::Two).unwrap();

        let text = board.to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(HexBoard::from_rows(&rows).unwrap(), board);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(HexBoard::from_rows(&[". .", ". ."]).is_ok());
        assert!(HexBoard::from_rows(&[". . .", ". ."]).is_err());
        assert!(HexBoard::from_rows(&[". ?", ". ."]).is_err());
    }

    #[test]
    fn test_neighbors_respect_edges() {
        let corner: Vec<Move> = neighbors(3, (0, 0)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0)]);
        assert_eq!(neighbors(3, (1, 1)).count(), 6);
    }

    #[test]
    fn test_with_stone_leaves_original_untouched() {
        let board = HexBoard::new(3);
        let next = with_stone(&board, (1, 1), Player::Two).unwrap();
        assert_eq!(board.occupancy(1, 1), None);
        assert_eq!(next.occupancy(1, 1), Some(Player::Two));
        assert!(with_stone(&next, (1, 1), Player::One).is_none());
    }
}
