use crate::engine::Move;
use crate::logic::board::{Board, BoardCoordinate, Color, Piece};
use crate::logic::rules::{directions, CapturePolicy, ALL_DIRECTIONS};
use serde::{Deserialize, Serialize};

/// Destinations reachable by one piece, each with the cells it jumps over.
/// Entries keep discovery order: jumps depth-first in direction order, then
/// simple steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMoves {
    entries: Vec<(BoardCoordinate, Vec<BoardCoordinate>)>,
}

impl LegalMoves {
    /// Keeps the first chain found for a landing cell.
    fn insert(&mut self, to: BoardCoordinate, captured: Vec<BoardCoordinate>) {
        if !self.contains(to) {
            self.entries.push((to, captured));
        }
    }

    #[must_use]
    pub fn get(&self, to: BoardCoordinate) -> Option<&[BoardCoordinate]> {
        self.entries
            .iter()
            .find(|(dest, _)| *dest == to)
            .map(|(_, captured)| captured.as_slice())
    }

    #[must_use]
    pub fn contains(&self, to: BoardCoordinate) -> bool {
        self.entries.iter().any(|(dest, _)| *dest == to)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoardCoordinate, &[BoardCoordinate])> {
        self.entries
            .iter()
            .map(|(dest, captured)| (*dest, captured.as_slice()))
    }

    pub fn destinations(&self) -> impl Iterator<Item = BoardCoordinate> + '_ {
        self.entries.iter().map(|(dest, _)| *dest)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn has_capture(&self) -> bool {
        self.entries.iter().any(|(_, captured)| !captured.is_empty())
    }

    fn retain_captures(&mut self) {
        self.entries.retain(|(_, captured)| !captured.is_empty());
    }
}

/// Per-chain bookkeeping for the jump search: captured cells and landing
/// cells along the current path, popped on backtrack.
#[derive(Default)]
struct JumpChain {
    captured: Vec<BoardCoordinate>,
    landings: Vec<BoardCoordinate>,
}

pub struct MoveGenerator {
    policy: CapturePolicy,
}

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new(CapturePolicy::default())
    }
}

impl MoveGenerator {
    #[must_use]
    pub const fn new(policy: CapturePolicy) -> Self {
        Self { policy }
    }

    /// Legal destinations for the piece on `from`. Empty when the cell is
    /// empty or the piece does not belong to `side_to_move`.
    #[must_use]
    pub fn legal_moves(
        &self,
        board: &Board,
        from: BoardCoordinate,
        side_to_move: Color,
    ) -> LegalMoves {
        let mut moves = LegalMoves::default();
        let Some(piece) = board.get_piece(from) else {
            return moves;
        };
        if piece.color != side_to_move {
            return moves;
        }

        let steps = directions(piece.color, piece.king);
        Self::explore_jumps(
            board,
            piece,
            from,
            steps,
            &mut JumpChain::default(),
            &mut moves,
        );

        for &(dr, dc) in steps {
            if let Some(to) = from.offset(dr, dc) {
                if board.is_empty(to) {
                    moves.insert(to, Vec::new());
                }
            }
        }

        if self.policy.is_mandatory() && moves.has_capture() {
            moves.retain_captures();
        }

        moves
    }

    // The mover stays on its origin cell while the chain is explored, so the
    // origin is never an empty landing cell. Once the first jump is made the
    // chain continues in all four directions regardless of rank.
    fn explore_jumps(
        board: &Board,
        piece: Piece,
        at: BoardCoordinate,
        steps: &[(i8, i8)],
        chain: &mut JumpChain,
        moves: &mut LegalMoves,
    ) {
        for &(dr, dc) in steps {
            let (Some(over), Some(land)) = (at.offset(dr, dc), at.offset(2 * dr, 2 * dc)) else {
                continue;
            };
            let Some(victim) = board.get_piece(over) else {
                continue;
            };
            if victim.color == piece.color
                || chain.captured.contains(&over)
                || chain.landings.contains(&land)
                || !board.is_empty(land)
            {
                continue;
            }

            chain.captured.push(over);
            chain.landings.push(land);
            moves.insert(land, chain.captured.clone());

            Self::explore_jumps(board, piece, land, &ALL_DIRECTIONS, chain, moves);

            chain.captured.pop();
            chain.landings.pop();
        }
    }

    /// Every legal move of `color`, pieces in board order.
    #[must_use]
    pub fn generate_moves(&self, board: &Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(32);
        for (from, piece) in board.pieces(color) {
            for (to, captured) in self.legal_moves(board, from, color).iter() {
                moves.push(Move {
                    piece: piece.id,
                    from,
                    to,
                    captured: captured.to_vec(),
                });
            }
        }
        moves
    }

    /// Returns `true` as soon as one piece of `color` has a legal move.
    #[must_use]
    pub fn has_legal_moves(&self, board: &Board, color: Color) -> bool {
        board
            .pieces(color)
            .any(|(from, _)| !self.legal_moves(board, from, color).is_empty())
    }
}
