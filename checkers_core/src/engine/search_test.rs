use crate::engine::config::EngineConfig;
use crate::engine::eval::SimpleEvaluator;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Evaluator, SearchLimit, Searcher};
use crate::logic::board::{Board, BoardCoordinate, Color};
use crate::logic::game::GameState;
use crate::logic::generator::MoveGenerator;
use crate::logic::rules::{perform_move, CapturePolicy};
use std::sync::Arc;

fn at(row: usize, col: usize) -> BoardCoordinate {
    BoardCoordinate::new(row, col).unwrap()
}

fn engine() -> AlphaBetaEngine {
    AlphaBetaEngine::new(Arc::new(EngineConfig::default()))
}

fn game_with(
    pieces: &[(usize, usize, Color, bool)],
    turn: Color,
    policy: CapturePolicy,
) -> GameState {
    let mut board = Board::empty();
    for &(row, col, color, king) in pieces {
        board.add_piece(at(row, col), color, king).unwrap();
    }
    GameState::from_board(board, turn, policy)
}

/// Exhaustive minimax without pruning, scored the same way as the engine.
fn plain_minimax(
    board: &Board,
    generator: &MoveGenerator,
    depth: u8,
    maximizing: bool,
    me: Color,
) -> i32 {
    let evaluator = SimpleEvaluator::new(Arc::new(EngineConfig::default()));
    let side = if maximizing { me } else { me.opposite() };

    if depth == 0 || board.piece_count(side) == 0 {
        return evaluator.evaluate(board, me);
    }
    let moves = generator.generate_moves(board, side);
    if moves.is_empty() {
        return evaluator.evaluate(board, me);
    }

    let scores = moves.iter().map(|mv| {
        let mut next = board.clone();
        perform_move(&mut next, mv.from, mv.to, &mv.captured);
        plain_minimax(&next, generator, depth - 1, !maximizing, me)
    });
    if maximizing {
        scores.max().unwrap()
    } else {
        scores.min().unwrap()
    }
}

#[test]
fn test_search_is_deterministic() {
    let game = GameState::new();
    let mut engine = engine();
    let first = engine.choose_move(&game, Color::Red, 4).unwrap();
    let second = engine.choose_move(&game, Color::Red, 4).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_prefers_capture_when_optional() {
    let game = game_with(
        &[
            (2, 1, Color::Red, false),
            (3, 2, Color::Black, false),
            (6, 5, Color::Black, false),
        ],
        Color::Red,
        CapturePolicy::Optional,
    );
    assert_eq!(game.legal_moves(at(2, 1)).len(), 2);

    let mv = engine().choose_move(&game, Color::Red, 1).unwrap();
    assert_eq!(mv.to, at(4, 3));
    assert_eq!(mv.captured, vec![at(3, 2)]);
}

#[test]
fn test_prefers_capture_over_other_pieces_steps() {
    // Captures are forced per piece, so the man on (2,5) keeps two steps.
    let game = game_with(
        &[
            (2, 1, Color::Red, false),
            (2, 5, Color::Red, false),
            (3, 2, Color::Black, false),
            (7, 6, Color::Black, false),
        ],
        Color::Red,
        CapturePolicy::Mandatory,
    );
    let moves = game.generator().generate_moves(&game.board, Color::Red);
    assert_eq!(moves.len(), 3);
    assert_eq!(moves.iter().filter(|mv| mv.is_capture()).count(), 1);

    let mv = engine().choose_move(&game, Color::Red, 1).unwrap();
    assert_eq!(mv.from, at(2, 1));
    assert_eq!(mv.to, at(4, 3));
    assert_eq!(mv.captured, vec![at(3, 2)]);
}

#[test]
fn test_blocked_side_is_scored_statically() {
    // Blocking both black men leaves them without moves, but the capture
    // still evaluates higher once black's reply is scored.
    let game = game_with(
        &[
            (0, 1, Color::Red, true),
            (1, 4, Color::Red, true),
            (1, 0, Color::Black, false),
            (1, 2, Color::Black, false),
        ],
        Color::Red,
        CapturePolicy::Mandatory,
    );
    let mv = engine().choose_move(&game, Color::Red, 2).unwrap();
    assert_eq!(mv.from, at(0, 1));
    assert_eq!(mv.to, at(2, 3));
    assert_eq!(mv.captured, vec![at(1, 2)]);
}

#[test]
fn test_zero_depth_searches_one_ply() {
    let game = GameState::new();
    let mut engine = engine();
    let shallow = engine.choose_move(&game, Color::Red, 0);
    assert!(shallow.is_some());
    assert_eq!(shallow, engine.choose_move(&game, Color::Red, 1));

    let (_, stats) = engine.search(&game, SearchLimit::Depth(0)).unwrap();
    assert_eq!(stats.depth, 1);
}

#[test]
fn test_takes_the_winning_chain() {
    // Both the step and the double jump are legal; only the jump wins at once.
    let game = game_with(
        &[
            (2, 3, Color::Red, false),
            (3, 4, Color::Black, false),
            (3, 6, Color::Black, false),
        ],
        Color::Red,
        CapturePolicy::Optional,
    );
    let mv = engine().choose_move(&game, Color::Red, 3).unwrap();
    assert_eq!(mv.to, at(2, 7));
    assert_eq!(mv.captured, vec![at(3, 4), at(3, 6)]);
}

#[test]
fn test_no_move_when_blocked() {
    let game = game_with(
        &[(7, 0, Color::Red, false), (0, 7, Color::Black, false)],
        Color::Red,
        CapturePolicy::Mandatory,
    );
    let mut engine = engine();
    assert!(engine.choose_move(&game, Color::Red, 3).is_none());
    assert!(engine.search(&game, SearchLimit::Depth(3)).is_none());
}

#[test]
fn test_move_refers_to_live_piece() {
    let mut game = GameState::new();
    game.make_move(at(2, 1), at(3, 2)).unwrap();

    let mv = engine().choose_move(&game, Color::Black, 3).unwrap();
    let live = game.board.get_piece(mv.from).unwrap();
    assert_eq!(live.id, mv.piece);
    assert_eq!(live.color, Color::Black);

    game.play(&mv).unwrap();
    assert_eq!(game.board.get_piece(mv.to).unwrap().id, live.id);
    assert_eq!(game.turn, Color::Red);
}

#[test]
fn test_search_leaves_game_untouched() {
    let game = GameState::new();
    let before = game.clone();
    engine().choose_move(&game, Color::Red, 5).unwrap();
    assert_eq!(game.board, before.board);
    assert_eq!(game.turn, before.turn);
    assert_eq!(game.move_count, before.move_count);
}

#[test]
fn test_depth_limited_search_stats() {
    let game = GameState::new();
    let (mv, stats) = engine().search(&game, SearchLimit::Depth(3)).unwrap();
    assert_eq!(stats.depth, 3);
    assert!(stats.nodes > 1);
    assert!(game.legal_moves(mv.from).contains(mv.to));
}

#[test]
fn test_time_limited_search_returns_a_move() {
    let game = GameState::new();
    let (mv, stats) = engine().search(&game, SearchLimit::Time(50)).unwrap();
    assert!(stats.depth >= 1);
    assert!(game.legal_moves(mv.from).contains(mv.to));
}

#[test]
fn test_pruning_matches_plain_minimax() {
    let mut game = GameState::new();
    game.make_move(at(2, 3), at(3, 4)).unwrap();
    game.make_move(at(5, 6), at(4, 5)).unwrap();

    let generator = game.generator();
    let depth = 3;
    let mut expected = None;
    let mut best = i32::MIN;
    for mv in generator.generate_moves(&game.board, Color::Red) {
        let mut next = game.board.clone();
        perform_move(&mut next, mv.from, mv.to, &mv.captured);
        let score = plain_minimax(&next, &generator, depth - 1, false, Color::Red);
        if score > best {
            best = score;
            expected = Some(mv);
        }
    }

    let found = engine().choose_move(&game, Color::Red, depth);
    assert_eq!(found, expected);
}

#[test]
fn test_engine_usable_after_config_update() {
    let game = GameState::new();
    let mut engine = engine();
    engine.choose_move(&game, Color::Red, 2).unwrap();
    let nodes = engine.nodes_searched();
    assert!(nodes > 0);

    let config = EngineConfig {
        max_depth: 2,
        ..EngineConfig::default()
    };
    engine.update_config(Arc::new(config));
    assert!(engine.choose_move(&game, Color::Red, 2).is_some());
}
