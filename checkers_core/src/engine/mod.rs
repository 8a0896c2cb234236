use crate::logic::board::{Board, BoardCoordinate, Color, PieceId};
use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod search;

#[cfg(test)]
mod search_test;

/// One complete turn: a step, a single jump, or a whole jump chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub from: BoardCoordinate,
    pub to: BoardCoordinate,
    /// Jumped cells in the order they were captured.
    pub captured: Vec<BoardCoordinate>,
}

impl Move {
    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
}

pub trait Evaluator {
    /// Score of `board` from `perspective`'s point of view; positive is good.
    fn evaluate(&self, board: &Board, perspective: Color) -> i32;
}

pub trait Searcher {
    fn search(&mut self, game_state: &GameState, limit: SearchLimit)
        -> Option<(Move, SearchStats)>;
}
