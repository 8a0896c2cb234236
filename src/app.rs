use anyhow::{bail, Context, Result};
use checkers_core::engine::config::EngineConfig;
use checkers_core::engine::search::AlphaBetaEngine;
use checkers_core::engine::{SearchLimit, Searcher};
use checkers_core::logic::board::{BoardCoordinate, Color};
use checkers_core::logic::game::{GameState, GameStatus};
use clap::ValueEnum;
use log::{debug, info};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Which sides are driven by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineSide {
    Red,
    Black,
    Both,
    None,
}

impl EngineSide {
    const fn controls(self, color: Color) -> bool {
        matches!(
            (self, color),
            (Self::Both, _) | (Self::Red, Color::Red) | (Self::Black, Color::Black)
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Surrender,
    Move(BoardCoordinate, BoardCoordinate),
}

fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    match line {
        "q" | "Q" => return Ok(Command::Quit),
        "s" | "S" => return Ok(Command::Surrender),
        _ => {}
    }

    let numbers = line
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<usize>()
                .with_context(|| format!("'{tok}' is not a row or column number"))
        })
        .collect::<Result<Vec<_>>>()?;

    let &[from_row, from_col, to_row, to_col] = numbers.as_slice() else {
        bail!("expected four numbers: from_row from_col to_row to_col");
    };
    Ok(Command::Move(
        BoardCoordinate::new(from_row, from_col)?,
        BoardCoordinate::new(to_row, to_col)?,
    ))
}

pub struct App {
    game: GameState,
    engine: AlphaBetaEngine,
    engine_side: EngineSide,
    limit: SearchLimit,
    max_moves: Option<u32>,
}

impl App {
    pub fn new(
        game: GameState,
        config: Arc<EngineConfig>,
        engine_side: EngineSide,
        limit: SearchLimit,
    ) -> Self {
        Self {
            game,
            engine: AlphaBetaEngine::new(config),
            engine_side,
            limit,
            max_moves: None,
        }
    }

    #[must_use]
    pub const fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = Some(max_moves);
        self
    }

    #[cfg(test)]
    pub const fn game(&self) -> &GameState {
        &self.game
    }

    /// Runs the game until it ends, the player quits or the input runs dry.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        let mut line = String::new();

        loop {
            if self.game.status != GameStatus::Playing {
                writeln!(out, "{}", self.game.board)?;
                match self.game.status {
                    GameStatus::Won(color) => writeln!(out, "{color} wins!")?,
                    _ => writeln!(out, "Draw: neither side can move.")?,
                }
                break;
            }
            if self
                .max_moves
                .is_some_and(|max| self.game.move_count >= max)
            {
                writeln!(out, "Stopped after {} moves.", self.game.move_count)?;
                break;
            }

            let turn = self.game.turn;
            writeln!(out, "{}", self.game.board)?;
            writeln!(out, "{turn} to move")?;

            if self.engine_side.controls(turn) {
                self.engine_turn(&mut out)?;
                continue;
            }

            write!(
                out,
                "Enter move as 'from_row from_col to_row to_col', 'q' to quit, 's' to surrender: "
            )?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }

            match parse_command(&line) {
                Ok(Command::Quit) => {
                    writeln!(out, "Goodbye.")?;
                    break;
                }
                Ok(Command::Surrender) => {
                    info!("{turn} surrenders");
                    self.game.surrender(turn);
                }
                Ok(Command::Move(from, to)) => match self.game.make_move(from, to) {
                    Ok(captured) if !captured.is_empty() => {
                        writeln!(out, "Captured {} piece(s).", captured.len())?;
                    }
                    Ok(_) => {}
                    Err(err) => writeln!(out, "Invalid move: {err}")?,
                },
                Err(err) => writeln!(out, "Invalid input: {err}")?,
            }
        }

        Ok(())
    }

    fn engine_turn<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let turn = self.game.turn;
        let Some((mv, stats)) = self.engine.search(&self.game, self.limit) else {
            // A playing side always has a move; nothing to do otherwise.
            bail!("engine found no move for {turn}");
        };
        debug!(
            "search depth {} nodes {} time {} ms",
            stats.depth, stats.nodes, stats.time_ms
        );

        self.game.play(&mv)?;
        write!(out, "Engine ({turn}) moves {} -> {}", mv.from, mv.to)?;
        if mv.is_capture() {
            writeln!(out, ", capturing {} piece(s)", mv.captured.len())?;
        } else {
            writeln!(out)?;
        }
        Ok(())
    }
}
