use crate::logic::rules::MoveError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Row delta of a forward step: Red walks up the rows, Black walks down.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::Red => 1,
            Self::Black => -1,
        }
    }

    #[must_use]
    pub const fn promotion_row(self) -> usize {
        match self {
            Self::Red => BOARD_SIZE - 1,
            Self::Black => 0,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Red => 'r',
            Self::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "Red"),
            Self::Black => write!(f, "Black"),
        }
    }
}

/// A validated cell on the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct BoardCoordinate {
    row: usize,
    col: usize,
}

impl BoardCoordinate {
    pub const fn new(row: usize, col: usize) -> Result<Self, MoveError> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Self { row, col })
        } else {
            Err(MoveError::OutOfRange { row, col })
        }
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Steps `(dr, dc)` away from this cell. Off-board targets yield `None`.
    #[must_use]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(isize::from(dr))?;
        let col = self.col.checked_add_signed(isize::from(dc))?;
        Self::new(row, col).ok()
    }

    /// Only dark cells (odd `row + col`) ever hold pieces.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Self { row, col }))
    }
}

impl TryFrom<(usize, usize)> for BoardCoordinate {
    type Error = MoveError;

    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(row, col)
    }
}

impl From<BoardCoordinate> for (usize, usize) {
    fn from(coord: BoardCoordinate) -> Self {
        (coord.row, coord.col)
    }
}

impl fmt::Display for BoardCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable identity of a piece, kept across relocation and promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub king: bool,
}

impl Piece {
    #[must_use]
    pub const fn symbol(self) -> char {
        if self.king {
            self.color.symbol().to_ascii_uppercase()
        } else {
            self.color.symbol()
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell {0} is a light square and can never hold a piece")]
    LightSquare(BoardCoordinate),
    #[error("cell {0} is already occupied")]
    Occupied(BoardCoordinate),
    #[error("diagram has {0} rows, expected 8")]
    RowCount(usize),
    #[error("diagram row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },
    #[error("unknown symbol '{symbol}' in diagram row {row}")]
    UnknownSymbol { row: usize, symbol: char },
    #[error("piece id {0} is used twice")]
    DuplicateId(u16),
    #[error("piece id {id} is not below the next free id {next_id}")]
    IdNotIssued { id: u16, next_id: u16 },
}

/// The 8x8 grid. A piece's coordinate is the cell holding it, so relocation
/// is a single cell-to-cell transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    grid: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    next_id: u16,
}

/// Serialized form of a [`Board`]: occupied cells in row-major order plus the
/// next free id. Loading goes through the same checks as `add_piece`.
#[derive(Serialize, Deserialize)]
struct BoardRepr {
    pieces: Vec<(BoardCoordinate, Piece)>,
    next_id: u16,
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        let pieces = BoardCoordinate::all()
            .filter_map(|at| board.get_piece(at).map(|piece| (at, piece)))
            .collect();
        Self {
            pieces,
            next_id: board.next_id,
        }
    }
}

impl TryFrom<BoardRepr> for Board {
    type Error = BoardError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        let mut board = Self::empty();
        let mut seen = HashSet::new();
        for (at, piece) in repr.pieces {
            if !at.is_dark() {
                return Err(BoardError::LightSquare(at));
            }
            if !board.is_empty(at) {
                return Err(BoardError::Occupied(at));
            }
            if !seen.insert(piece.id) {
                return Err(BoardError::DuplicateId(piece.id.0));
            }
            if piece.id.0 >= repr.next_id {
                return Err(BoardError::IdNotIssued {
                    id: piece.id.0,
                    next_id: repr.next_id,
                });
            }
            if let Some(cell) = board.cell_mut(at) {
                *cell = Some(piece);
            }
        }
        board.next_id = repr.next_id;
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard layout: Red on the dark cells of rows 0-2, Black on rows 5-7.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [[None; BOARD_SIZE]; BOARD_SIZE],
            next_id: 0,
        }
    }

    fn setup_initial_position(&mut self) {
        for at in BoardCoordinate::all().filter(|at| at.is_dark()) {
            let color = match at.row() {
                0..=2 => Color::Red,
                5..=7 => Color::Black,
                _ => continue,
            };
            self.place(at, color, false);
        }
    }

    pub fn clear(&mut self) {
        self.grid = [[None; BOARD_SIZE]; BOARD_SIZE];
    }

    fn cell_mut(&mut self, at: BoardCoordinate) -> Option<&mut Option<Piece>> {
        self.grid.get_mut(at.row())?.get_mut(at.col())
    }

    fn place(&mut self, at: BoardCoordinate, color: Color, king: bool) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if let Some(cell) = self.cell_mut(at) {
            *cell = Some(Piece { id, color, king });
        }
        id
    }

    #[must_use]
    pub fn get_piece(&self, at: BoardCoordinate) -> Option<Piece> {
        self.grid.get(at.row())?.get(at.col()).copied().flatten()
    }

    #[must_use]
    pub fn is_empty(&self, at: BoardCoordinate) -> bool {
        self.get_piece(at).is_none()
    }

    pub fn add_piece(
        &mut self,
        at: BoardCoordinate,
        color: Color,
        king: bool,
    ) -> Result<PieceId, BoardError> {
        if !at.is_dark() {
            return Err(BoardError::LightSquare(at));
        }
        if !self.is_empty(at) {
            return Err(BoardError::Occupied(at));
        }
        Ok(self.place(at, color, king))
    }

    pub fn remove_piece(&mut self, at: BoardCoordinate) -> Option<Piece> {
        self.cell_mut(at)?.take()
    }

    /// Relocates the piece on `from` to the empty cell `to`. Leaves the board
    /// untouched and returns `None` if `from` is empty or `to` is occupied.
    pub fn move_piece(&mut self, from: BoardCoordinate, to: BoardCoordinate) -> Option<Piece> {
        if from == to || !self.is_empty(to) {
            return None;
        }
        let piece = self.remove_piece(from)?;
        *self.cell_mut(to)? = Some(piece);
        Some(piece)
    }

    /// Crowns the piece on `at`. Returns `false` if the cell is empty.
    pub fn promote(&mut self, at: BoardCoordinate) -> bool {
        match self.cell_mut(at) {
            Some(Some(piece)) => {
                piece.king = true;
                true
            }
            _ => false,
        }
    }

    /// Pieces of `color` in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (BoardCoordinate, Piece)> + '_ {
        BoardCoordinate::all().filter_map(move |at| {
            self.get_piece(at)
                .filter(|piece| piece.color == color)
                .map(|piece| (at, piece))
        })
    }

    #[must_use]
    pub fn piece_count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    /// `(red, black)` piece counts.
    #[must_use]
    pub fn count_pieces(&self) -> (usize, usize) {
        (self.piece_count(Color::Red), self.piece_count(Color::Black))
    }

    #[must_use]
    pub fn find(&self, id: PieceId) -> Option<BoardCoordinate> {
        BoardCoordinate::all().find(|&at| self.get_piece(at).is_some_and(|piece| piece.id == id))
    }

    /// Parses the diagram written by `Display`: one line per row, `.` for an
    /// empty cell, `r`/`b` for men and `R`/`B` for kings. Header digits and
    /// whitespace are ignored.
    pub fn from_diagram(diagram: &str) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|ch| !ch.is_whitespace() && !ch.is_ascii_digit())
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE {
            return Err(BoardError::RowCount(rows.len()));
        }

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != BOARD_SIZE {
                return Err(BoardError::RowLength {
                    row,
                    len: cells.len(),
                });
            }
            for (col, &symbol) in cells.iter().enumerate() {
                let (color, king) = match symbol {
                    '.' => continue,
                    'r' => (Color::Red, false),
                    'R' => (Color::Red, true),
                    'b' => (Color::Black, false),
                    'B' => (Color::Black, true),
                    _ => return Err(BoardError::UnknownSymbol { row, symbol }),
                };
                let at = BoardCoordinate { row, col };
                board.add_piece(at, color, king)?;
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{row}")?;
            for col in 0..BOARD_SIZE {
                let symbol = self
                    .get_piece(BoardCoordinate { row, col })
                    .map_or('.', Piece::symbol);
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
