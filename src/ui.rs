//! Terminal UI rendering with ratatui

use crate::game::Game;
use crate::grid::Cell;
use crate::settings::Settings;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::Duration;

const EMPTY: &str = "  ";

/// Width of the stats panel to the right of the board
const PANEL_WIDTH: u16 = 16;

/// How long the top-out overlay stays visible
const TOPOUT_FLASH: Duration = Duration::from_millis(1500);

/// Map a palette index to a terminal color
pub fn palette(index: u8) -> Color {
    match index {
        1 => Color::Red,
        2 => Color::Blue,
        3 => Color::LightMagenta, // pink
        4 => Color::Green,
        5 => Color::Yellow,
        6 => Color::Rgb(255, 165, 0), // orange
        7 => Color::Magenta,          // purple
        _ => Color::White,
    }
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();

    // Board: 2 columns per cell plus borders
    let board_width = game.grid.width() as u16 * 2 + 2;
    let board_height = game.grid.height() as u16 + 2;
    let game_area = center_rect(area, board_width + PANEL_WIDTH, board_height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Length(PANEL_WIDTH),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);
    render_stats(frame, main_layout[1], game, settings);

    if let Some(at) = game.last_topout {
        if at.elapsed() < TOPOUT_FLASH {
            render_overlay(frame, area, "TOP OUT", "Field reset");
        }
    }
}

/// Render the playing field with the active piece overlaid
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let block_char = settings.visual.block_char();

    let block = Block::default()
        .title(" MATCHFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for y in 0..game.grid.height() {
        let mut spans = Vec::new();
        for x in 0..game.grid.width() {
            // The falling piece wins over settled cells; its rows above the
            // top edge simply have no (x, y) here and are not drawn
            let piece_cell = game
                .piece
                .filled_cells()
                .find(|&(px, py, _)| px == x as i32 && py == y as i32);

            let (text, style) = if let Some((_, _, color)) = piece_cell {
                (block_char, Style::default().fg(palette(color)))
            } else {
                match game.grid.get(x as i32, y as i32) {
                    Some(Cell::Filled(color)) => (block_char, Style::default().fg(palette(color))),
                    _ => (EMPTY, Style::default()),
                }
            };

            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the stats panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let best = game.score.best.max(settings.best_score().unwrap_or(0));

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        "SCORE",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        format!("{}", game.score.points),
        Style::default().fg(Color::Yellow).bold(),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "REGIONS",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        format!("{}", game.score.regions),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "BEST",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        format!("{}", best),
        Style::default().fg(Color::Green),
    )));

    lines.push(Line::raw(""));
    for hint in ["←→ move", "↑ rotate", "↓ drop", "q quit"] {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render an overlay popup (top-out flash)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
