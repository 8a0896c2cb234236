use crate::logic::board::{Board, BoardCoordinate, Color, Piece};
use crate::logic::generator::MoveGenerator;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    #[error("coordinate ({row}, {col}) is outside the 8x8 board")]
    OutOfRange { row: usize, col: usize },
    #[error("no piece at {0}")]
    NoPieceAtSource(BoardCoordinate),
    #[error("illegal move from {from} to {to}")]
    InvalidMove {
        from: BoardCoordinate,
        to: BoardCoordinate,
    },
    #[error("the game is already over")]
    GameOver,
}

/// Whether a side holding a capture may still play a simple move instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapturePolicy {
    #[default]
    Mandatory,
    Optional,
}

impl CapturePolicy {
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        matches!(self, Self::Mandatory)
    }
}

/// Diagonal steps in generation order.
pub const ALL_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const RED_MAN_DIRECTIONS: [(i8, i8); 2] = [(Color::Red.forward(), -1), (Color::Red.forward(), 1)];
const BLACK_MAN_DIRECTIONS: [(i8, i8); 2] =
    [(Color::Black.forward(), -1), (Color::Black.forward(), 1)];

/// Directions a piece may start a move in. Kings use all four diagonals,
/// men only their two forward ones.
#[must_use]
pub const fn directions(color: Color, king: bool) -> &'static [(i8, i8)] {
    if king {
        return &ALL_DIRECTIONS;
    }
    match color {
        Color::Red => &RED_MAN_DIRECTIONS,
        Color::Black => &BLACK_MAN_DIRECTIONS,
    }
}

#[must_use]
pub const fn is_promotion(color: Color, row: usize) -> bool {
    color.promotion_row() == row
}

/// Checks `from -> to` against a freshly generated legal set and returns the
/// cells captured on the way.
pub fn validate_move(
    board: &Board,
    from: BoardCoordinate,
    to: BoardCoordinate,
    turn: Color,
    policy: CapturePolicy,
) -> Result<Vec<BoardCoordinate>, MoveError> {
    if board.get_piece(from).is_none() {
        return Err(MoveError::NoPieceAtSource(from));
    }

    MoveGenerator::new(policy)
        .legal_moves(board, from, turn)
        .get(to)
        .map(<[BoardCoordinate]>::to_vec)
        .ok_or(MoveError::InvalidMove { from, to })
}

/// Relocates the piece, removes every captured piece and crowns the mover on
/// its far row. The move must already be validated; returns `None` and leaves
/// the board untouched if `from` is empty or `to` occupied.
pub fn perform_move(
    board: &mut Board,
    from: BoardCoordinate,
    to: BoardCoordinate,
    captured: &[BoardCoordinate],
) -> Option<Piece> {
    let mut piece = board.move_piece(from, to)?;
    for &cell in captured {
        board.remove_piece(cell);
    }
    if !piece.king && is_promotion(piece.color, to.row()) {
        board.promote(to);
        piece.king = true;
    }
    Some(piece)
}
