use crate::ui::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use embattled::engine::ProgramSlot;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('a') => app.reload(ProgramSlot::A),
        KeyCode::Char('b') => app.reload(ProgramSlot::B),
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.scale_time(true),
        KeyCode::Char('-') => app.scale_time(false),
        KeyCode::Char('s') => app.single_step(),
        _ => {}
    }
}
