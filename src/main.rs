//! MATCHFALL - a terminal match-3 falling-block puzzle
//!
//! Drop two-cell pieces, connect three or more of one color to clear them.

mod game;
mod grid;
mod input;
mod matcher;
mod piece;
mod score;
mod settings;
mod spawner;
mod ui;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Action, Game};
use input::KeyBindings;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::Duration,
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the matchfall temp directory, creating it if needed
fn matchfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("matchfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup matchfall temp directory for logs
    let log_dir = matchfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("matchfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "MATCHFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // Load settings
    let mut settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Record every finished run plus the one in progress, then save
    if let Ok(game) = &result {
        for &(points, regions) in &game.finished_runs {
            settings.add_score(points, regions);
        }
        settings.add_score(game.score.points, game.score.regions);
    }
    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    // Print final message
    if let Ok(game) = &result {
        println!("\nThanks for playing MATCHFALL!");
        println!("Final Score: {}", game.score.points);
        println!("Session Best: {}", game.score.best);
        if let Some(best) = settings.best_score() {
            println!("All-Time Best: {}", best);
        }
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Game> {
    let mut game = Game::new(&settings.gameplay.game_config());
    let bindings = KeyBindings::from_settings(settings);

    loop {
        // Render
        terminal.draw(|frame| ui::render_game(frame, &game, settings))?;

        // Handle input
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match bindings.map(key) {
                        Some(Action::Quit) => return Ok(game),
                        Some(action) => game.process_action(action),
                        None => {}
                    }
                }
            }
        }

        // Update game state
        game.update();
    }
}
