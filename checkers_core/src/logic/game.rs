use crate::engine::Move;
use crate::logic::board::{Board, BoardCoordinate, Color};
use crate::logic::generator::{LegalMoves, MoveGenerator};
use crate::logic::rules::{perform_move, validate_move, CapturePolicy, MoveError};
use log::trace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won(Color),
    Draw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    pub policy: CapturePolicy,
    pub status: GameStatus,
    pub last_move: Option<(BoardCoordinate, BoardCoordinate)>,
    pub move_count: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard layout, Red to move, captures mandatory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(CapturePolicy::default())
    }

    #[must_use]
    pub fn with_policy(policy: CapturePolicy) -> Self {
        Self::from_board(Board::new(), Color::Red, policy)
    }

    /// Starts from an arbitrary position; the status is derived from it.
    #[must_use]
    pub fn from_board(board: Board, turn: Color, policy: CapturePolicy) -> Self {
        let mut game = Self {
            board,
            turn,
            policy,
            status: GameStatus::Playing,
            last_move: None,
            move_count: 0,
        };
        game.update_status();
        game
    }

    #[must_use]
    pub const fn generator(&self) -> MoveGenerator {
        MoveGenerator::new(self.policy)
    }

    /// Legal destinations for the piece on `from`, for the side to move.
    #[must_use]
    pub fn legal_moves(&self, from: BoardCoordinate) -> LegalMoves {
        self.generator().legal_moves(&self.board, from, self.turn)
    }

    /// Plays `from -> to` for the side to move without passing the turn.
    /// Returns the captured cells; on error the board is unchanged.
    pub fn apply_move(
        &mut self,
        from: BoardCoordinate,
        to: BoardCoordinate,
    ) -> Result<Vec<BoardCoordinate>, MoveError> {
        let captured = validate_move(&self.board, from, to, self.turn, self.policy)?;
        let piece = perform_move(&mut self.board, from, to, &captured)
            .ok_or(MoveError::InvalidMove { from, to })?;

        trace!(
            "{} {} {} -> {} captured {:?}{}",
            piece.color,
            piece.symbol(),
            from,
            to,
            captured,
            if piece.king { " (king)" } else { "" }
        );

        self.last_move = Some((from, to));
        Ok(captured)
    }

    /// Plays a whole turn: applies the move, passes the turn and refreshes
    /// the game status.
    pub fn make_move(
        &mut self,
        from: BoardCoordinate,
        to: BoardCoordinate,
    ) -> Result<Vec<BoardCoordinate>, MoveError> {
        if self.status != GameStatus::Playing {
            return Err(MoveError::GameOver);
        }

        let captured = self.apply_move(from, to)?;
        self.switch_turn();
        self.move_count += 1;
        self.update_status();
        Ok(captured)
    }

    /// Plays an engine move. The piece identity must match the live board.
    pub fn play(&mut self, mv: &Move) -> Result<Vec<BoardCoordinate>, MoveError> {
        let invalid = MoveError::InvalidMove {
            from: mv.from,
            to: mv.to,
        };
        match self.board.get_piece(mv.from) {
            Some(piece) if piece.id == mv.piece => self.make_move(mv.from, mv.to),
            Some(_) => Err(invalid),
            None => Err(MoveError::NoPieceAtSource(mv.from)),
        }
    }

    pub fn switch_turn(&mut self) {
        self.turn = self.turn.opposite();
    }

    /// Whether `color` could move if it were its turn. The side to move is
    /// not touched.
    #[must_use]
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        self.generator().has_legal_moves(&self.board, color)
    }

    /// A side without pieces or without a legal move has lost; both sides are
    /// checked regardless of whose turn it is.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        let (red, black) = self.board.count_pieces();
        red == 0
            || black == 0
            || !self.has_any_legal_move(Color::Red)
            || !self.has_any_legal_move(Color::Black)
    }

    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        let (red, black) = self.board.count_pieces();
        if red == 0 && black > 0 {
            return Some(Color::Black);
        }
        if black == 0 && red > 0 {
            return Some(Color::Red);
        }

        let red_can = self.has_any_legal_move(Color::Red);
        let black_can = self.has_any_legal_move(Color::Black);
        match (red_can, black_can) {
            (true, false) => Some(Color::Red),
            (false, true) => Some(Color::Black),
            _ => None,
        }
    }

    /// Concedes the game for `color`.
    pub fn surrender(&mut self, color: Color) {
        self.status = GameStatus::Won(color.opposite());
    }

    fn update_status(&mut self) {
        self.status = if self.is_terminal() {
            self.winner().map_or(GameStatus::Draw, GameStatus::Won)
        } else {
            GameStatus::Playing
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: usize, col: usize) -> BoardCoordinate {
        BoardCoordinate::new(row, col).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new();
        assert_eq!(game.turn, Color::Red);
        assert_eq!(game.policy, CapturePolicy::Mandatory);
        assert_eq!(game.status, GameStatus::Playing);
        assert!(!game.is_terminal());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_make_move_switches_turn() {
        let mut game = GameState::new();
        let captured = game.make_move(at(2, 1), at(3, 0)).unwrap();
        assert!(captured.is_empty());
        assert_eq!(game.turn, Color::Black);
        assert_eq!(game.move_count, 1);
        assert_eq!(game.last_move, Some((at(2, 1), at(3, 0))));
    }

    #[test]
    fn test_apply_move_keeps_turn() {
        let mut game = GameState::new();
        game.apply_move(at(2, 1), at(3, 0)).unwrap();
        assert_eq!(game.turn, Color::Red);
        game.switch_turn();
        assert_eq!(game.turn, Color::Black);
        game.switch_turn();
        assert_eq!(game.turn, Color::Red);
    }

    #[test]
    fn test_invalid_move_leaves_board_unchanged() {
        let mut game = GameState::new();
        let before = game.board.clone();
        let err = game.make_move(at(2, 1), at(4, 3)).unwrap_err();
        assert_eq!(
            err,
            MoveError::InvalidMove {
                from: at(2, 1),
                to: at(4, 3)
            }
        );
        assert_eq!(game.board, before);
        assert_eq!(game.turn, Color::Red);
    }

    #[test]
    fn test_moves_after_game_over_are_rejected() {
        let mut game = GameState::new();
        game.surrender(Color::Red);
        assert_eq!(game.status, GameStatus::Won(Color::Black));
        assert_eq!(
            game.make_move(at(2, 1), at(3, 0)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_play_checks_piece_identity() {
        let mut game = GameState::new();
        let piece = game.board.get_piece(at(2, 1)).unwrap();
        let other = game.board.get_piece(at(2, 3)).unwrap();

        let wrong = Move {
            piece: other.id,
            from: at(2, 1),
            to: at(3, 0),
            captured: Vec::new(),
        };
        assert!(game.play(&wrong).is_err());

        let right = Move { piece: piece.id, ..wrong };
        game.play(&right).unwrap();
        assert_eq!(game.board.get_piece(at(3, 0)).unwrap().id, piece.id);
    }

    #[test]
    fn test_has_any_legal_move_ignores_turn() {
        let game = GameState::new();
        assert!(game.has_any_legal_move(Color::Black));
        assert_eq!(game.turn, Color::Red);
    }

    #[test]
    fn test_both_sides_blocked_is_a_draw() {
        // Two uncrowned men already standing on the far rows: neither can step.
        let mut board = Board::empty();
        board.add_piece(at(7, 0), Color::Red, false).unwrap();
        board.add_piece(at(0, 7), Color::Black, false).unwrap();

        let game = GameState::from_board(board, Color::Red, CapturePolicy::Mandatory);
        assert!(game.is_terminal());
        assert_eq!(game.winner(), None);
        assert_eq!(game.status, GameStatus::Draw);
    }
}
