use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, BorderType, Paragraph, Wrap},
};

pub(super) use super::app::App;

mod arena;
mod telemetry;

use arena::render_arena;
use telemetry::render_telemetry;

const SIDEBAR_WIDTH: u16 = 38;

/// Where the arena canvas goes for a terminal of `size`.
pub(super) fn arena_area(size: Rect) -> Rect {
    body_columns(size)[0]
}

fn body_columns(size: Rect) -> [Rect; 2] {
    let rows = Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).split(size);
    let cols = Layout::horizontal([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)]).split(rows[0]);
    [cols[0], cols[1]]
}

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    let [arena, side] = body_columns(size);
    let footer = Rect::new(size.x, size.bottom().saturating_sub(1), size.width, 1.min(size.height));

    let state = app.engine.lock();
    render_arena(f, arena, &state);

    let side_chunks = Layout::vertical([
        Constraint::Min(8),
        Constraint::Length(6),
        Constraint::Length(6),
    ])
    .split(side);
    render_telemetry(f, side_chunks[0], &state);
    drop(state);

    for (i, area) in side_chunks[1..].iter().enumerate() {
        render_status(f, *area, app, i);
    }

    let keys = Paragraph::new(" a/b reload  space pause  +/- speed  s step  q quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(keys, footer);
}

fn render_status(f: &mut Frame, area: Rect, app: &App, slot: usize) {
    let panel = &app.panels[slot];
    let name = app.sources[slot]
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let color = if panel.is_error() {
        Color::Red
    } else if panel.inner_html.is_empty() {
        Color::Gray
    } else {
        Color::Green
    };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(format!(" {} {} ", robot_name(slot), name));
    let para = Paragraph::new(panel.plain_text())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(para, area);
}

pub(super) fn robot_name(slot: usize) -> &'static str {
    if slot == 0 { "Robot A" } else { "Robot B" }
}

pub(super) fn robot_color(slot: usize) -> Color {
    if slot == 0 { Color::Cyan } else { Color::Magenta }
}
