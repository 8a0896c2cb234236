use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, BoardCoordinate, Color, Piece, BOARD_SIZE};
use std::sync::Arc;

pub struct SimpleEvaluator {
    config: Arc<EngineConfig>,
}

impl SimpleEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Material plus positional value of one piece, always non-negative.
    #[must_use]
    pub fn piece_value(&self, piece: Piece, at: BoardCoordinate) -> i32 {
        let mut value = if piece.king {
            self.config.val_king
        } else {
            // Rows travelled from the owner's back row.
            let advanced = match piece.color {
                Color::Red => at.row(),
                Color::Black => BOARD_SIZE - 1 - at.row(),
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let advanced = advanced as i32;
            self.config.val_man + advanced * self.config.advance_bonus
        };

        if at.col() == 0 || at.col() == BOARD_SIZE - 1 {
            value += self.config.edge_bonus;
        }
        value
    }
}

impl Evaluator for SimpleEvaluator {
    fn evaluate(&self, board: &Board, perspective: Color) -> i32 {
        let own: i32 = board
            .pieces(perspective)
            .map(|(at, piece)| self.piece_value(piece, at))
            .sum();
        let theirs: i32 = board
            .pieces(perspective.opposite())
            .map(|(at, piece)| self.piece_value(piece, at))
            .sum();
        own - theirs
    }
}
