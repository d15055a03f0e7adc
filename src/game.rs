//! Core game state and logic

use crate::grid::Grid;
use crate::matcher;
use crate::piece::{Piece, RotationDirection};
use crate::score::Score;
use crate::spawner::Spawner;
use std::time::{Duration, Instant};

/// Session parameters, fixed at construction
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub palette_size: u8,
    pub drop_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 16,
            palette_size: 7,
            drop_interval: Duration::from_millis(1000),
        }
    }
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    Drop,
    Quit,
}

/// The main game struct: owns the grid, the falling piece and the score.
///
/// There is no terminal game-over state. A spawn that immediately collides
/// wipes the field, zeroes the run score and keeps playing.
pub struct Game {
    pub grid: Grid,
    pub piece: Piece,
    pub score: Score,
    spawner: Spawner,
    /// Gravity interval; a drop happens when this much time has passed
    drop_interval: Duration,
    last_drop: Instant,
    /// When the last top-out reset happened (drives the UI flash)
    pub last_topout: Option<Instant>,
    /// (points, regions) of every run that ended in a top-out
    pub finished_runs: Vec<(u32, u32)>,
}

impl Game {
    /// Create a new game
    pub fn new(config: &GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Create a new game with a fixed spawn seed
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        let mut spawner = Spawner::with_seed(config.palette_size, seed);
        let piece = spawner.next(config.width);
        Self {
            grid: Grid::new(config.width, config.height),
            piece,
            score: Score::new(),
            spawner,
            drop_interval: config.drop_interval,
            last_drop: Instant::now(),
            last_topout: None,
            finished_runs: Vec::new(),
        }
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.piece.move_left(&self.grid);
            }
            Action::MoveRight => {
                self.piece.move_right(&self.grid);
            }
            Action::RotateCw => {
                self.piece.rotate(RotationDirection::Clockwise, &self.grid);
            }
            Action::RotateCcw => {
                self.piece.rotate(RotationDirection::CounterClockwise, &self.grid);
            }
            Action::Drop => self.drop_piece(),
            Action::Quit => {
                // Handled by the frame loop
            }
        }
    }

    /// Advance gravity (call every frame); drops once per interval and
    /// tolerates irregular call timing
    pub fn update(&mut self) {
        if self.last_drop.elapsed() >= self.drop_interval {
            self.drop_piece();
        }
    }

    /// One gravity step. Locks the piece when it cannot fall further.
    /// Any drop, manual or timed, restarts the gravity interval.
    pub fn drop_piece(&mut self) {
        if !self.piece.move_down(&self.grid) {
            self.lock_piece();
        }
        self.last_drop = Instant::now();
    }

    /// Merge the piece, settle, resolve matches, spawn the next piece
    fn lock_piece(&mut self) {
        self.grid.merge(&self.piece);
        self.grid.settle();

        let outcome = matcher::clear_matches(&mut self.grid);
        if outcome.cells > 0 {
            let delta = self.score.add_matches(&outcome);
            tracing::debug!(
                regions = outcome.regions,
                cells = outcome.cells,
                delta,
                points = self.score.points,
                "cleared matches"
            );
        }

        self.spawn_piece();
    }

    /// Deal the next piece; a blocked spawn wipes the field and run score
    fn spawn_piece(&mut self) {
        self.piece = self.spawner.next(self.grid.width());
        if self.grid.collides(&self.piece) {
            tracing::info!(points = self.score.points, "top out, field reset");
            self.finished_runs.push((self.score.points, self.score.regions));
            self.score.reset();
            self.grid.clear();
            self.last_topout = Some(Instant::now());
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
