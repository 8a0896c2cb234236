use crate::engine::config::EngineConfig;
use crate::engine::eval::SimpleEvaluator;
use crate::engine::{Evaluator, Move, SearchLimit, SearchStats, Searcher};
use crate::logic::board::{Board, Color};
use crate::logic::game::GameState;
use crate::logic::generator::MoveGenerator;
use crate::logic::rules::perform_move;
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Depth ceiling for time-limited searches.
const MAX_ITERATIVE_DEPTH: u8 = 32;

/// Plain minimax with alpha-beta pruning. Every child is searched on its own
/// board clone, so sibling branches never see each other's moves.
pub struct AlphaBetaEngine {
    evaluator: SimpleEvaluator,
    nodes_searched: u64,
    start_time: Instant,
    time_limit: Option<Duration>,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: SimpleEvaluator::new(config),
            nodes_searched: 0,
            start_time: Instant::now(),
            time_limit: None,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = SimpleEvaluator::new(config);
    }

    #[must_use]
    pub const fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Best move for `color` found at `depth` plies, expressed against the
    /// live board of `game`. `None` when `color` has no legal move. A depth
    /// of 0 is searched as depth 1: a move is always looked at.
    pub fn choose_move(&mut self, game: &GameState, color: Color, depth: u8) -> Option<Move> {
        self.reset(None);
        let generator = game.generator();
        let scratch = game.board.clone();

        // Without a time limit the root search cannot be interrupted.
        let (mv, score) = self.search_root(&generator, &scratch, color, depth.max(1))??;
        info!(
            "{color} plays {} -> {} (score {score}, {} nodes)",
            mv.from, mv.to, self.nodes_searched
        );
        Self::translate(game, color, mv)
    }

    fn reset(&mut self, time_limit: Option<Duration>) {
        self.nodes_searched = 0;
        self.start_time = Instant::now();
        self.time_limit = time_limit;
    }

    fn check_time(&self) -> bool {
        if let Some(limit) = self.time_limit {
            if self.nodes_searched & 1023 == 0 && self.start_time.elapsed() > limit {
                return true;
            }
        }
        false
    }

    /// Rebinds a move found on a scratch board to the piece standing on the
    /// same origin cell of the live board.
    fn translate(game: &GameState, color: Color, mv: Move) -> Option<Move> {
        let live = game.board.get_piece(mv.from)?;
        if live.color != color {
            return None;
        }
        Some(Move {
            piece: live.id,
            ..mv
        })
    }

    /// Outer `None` means the time budget ran out; inner `None` means `me`
    /// has nothing to play.
    fn search_root(
        &mut self,
        generator: &MoveGenerator,
        board: &Board,
        me: Color,
        depth: u8,
    ) -> Option<Option<(Move, i32)>> {
        self.nodes_searched = self.nodes_searched.wrapping_add(1);
        let moves = generator.generate_moves(board, me);

        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best: Option<(Move, i32)> = None;

        for mv in moves {
            let mut next_board = board.clone();
            perform_move(&mut next_board, mv.from, mv.to, &mv.captured);

            let score = self.minimax(generator, &next_board, depth - 1, alpha, beta, false, me)?;
            let improves = match &best {
                Some((_, best_score)) => score > *best_score,
                None => true,
            };
            if improves {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        Some(best)
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        generator: &MoveGenerator,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        me: Color,
    ) -> Option<i32> {
        self.nodes_searched = self.nodes_searched.wrapping_add(1);

        if self.check_time() {
            return None;
        }

        let side = if maximizing { me } else { me.opposite() };

        // Out of depth, out of pieces or out of moves: all scored statically.
        if depth == 0 || board.piece_count(side) == 0 {
            return Some(self.evaluator.evaluate(board, me));
        }
        let moves = generator.generate_moves(board, side);
        if moves.is_empty() {
            return Some(self.evaluator.evaluate(board, me));
        }

        if maximizing {
            let mut best_score = i32::MIN;
            for mv in moves {
                let mut next_board = board.clone();
                perform_move(&mut next_board, mv.from, mv.to, &mv.captured);

                let score =
                    self.minimax(generator, &next_board, depth - 1, alpha, beta, false, me)?;
                if score > best_score {
                    best_score = score;
                }
                alpha = alpha.max(best_score);
                if beta <= alpha {
                    break; // Beta cutoff
                }
            }
            Some(best_score)
        } else {
            let mut best_score = i32::MAX;
            for mv in moves {
                let mut next_board = board.clone();
                perform_move(&mut next_board, mv.from, mv.to, &mv.captured);

                let score =
                    self.minimax(generator, &next_board, depth - 1, alpha, beta, true, me)?;
                if score < best_score {
                    best_score = score;
                }
                beta = beta.min(best_score);
                if beta <= alpha {
                    break; // Alpha cutoff
                }
            }
            Some(best_score)
        }
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(
        &mut self,
        game_state: &GameState,
        limit: SearchLimit,
    ) -> Option<(Move, SearchStats)> {
        // Depth(0) is searched as depth 1, like `choose_move`.
        let (max_depth, time_limit) = match limit {
            SearchLimit::Depth(d) => (d.max(1), None),
            SearchLimit::Time(t) => (MAX_ITERATIVE_DEPTH, Some(Duration::from_millis(t))),
        };
        self.reset(time_limit);

        let generator = game_state.generator();
        let board = game_state.board.clone();
        let me = game_state.turn;

        let first_depth = if time_limit.is_some() { 1 } else { max_depth };
        let mut best_move = None;
        let mut final_depth = 0;

        for d in first_depth..=max_depth {
            match self.search_root(&generator, &board, me, d) {
                // Nothing to play at all.
                Some(None) => return None,
                Some(Some((mv, score))) => {
                    debug!(
                        "depth {d}: {} -> {} score {score} ({} nodes)",
                        mv.from, mv.to, self.nodes_searched
                    );
                    best_move = Some(mv);
                    final_depth = d;
                }
                None => {
                    debug!("time limit hit during depth {d}");
                    break;
                }
            }
        }

        // Out of time before depth 1 finished: fall back to the first legal move.
        let best_move =
            best_move.or_else(|| generator.generate_moves(&board, me).into_iter().next())?;
        let mv = Self::translate(game_state, me, best_move)?;

        #[allow(clippy::cast_possible_truncation)]
        let time_ms = self.start_time.elapsed().as_millis() as u64;
        info!(
            "{me} plays {} -> {} at depth {final_depth} ({} nodes, {time_ms} ms)",
            mv.from, mv.to, self.nodes_searched
        );

        Some((
            mv,
            SearchStats {
                depth: final_depth,
                nodes: self.nodes_searched,
                time_ms,
            },
        ))
    }
}
