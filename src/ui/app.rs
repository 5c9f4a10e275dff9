use super::{input::handle_key, view::{arena_area, ui}};
use crossterm::event::{self, Event};
use embattled::arena::Worker;
use embattled::engine::{reload_and_present, Engine, ProgramSlot};
use embattled::presentation::{present, StatusPanel};
use log::info;
use ratatui::{DefaultTerminal, layout::Rect};
use std::{fs, io, path::PathBuf, time::Duration};

const MIN_TIME_SCALE: u32 = 1;
const MAX_TIME_SCALE: u32 = 64_000;

pub struct App {
    pub(super) engine: Engine,
    pub(super) sources: [PathBuf; 2],
    pub(super) panels: [StatusPanel; 2],
    // Time scale to restore when unpausing
    pub(super) resume_scale: u32,
    pub(super) should_quit: bool,
    worker: Option<Worker>,
}

impl App {
    pub fn new(engine: Engine, sources: [PathBuf; 2]) -> Self {
        let resume_scale = engine.lock().runner.time_scale().max(MIN_TIME_SCALE);
        Self {
            engine,
            sources,
            panels: Default::default(),
            resume_scale,
            should_quit: false,
            worker: None,
        }
    }

    /// Loads both programs and starts the simulation thread.
    pub fn start(&mut self) {
        for slot in ProgramSlot::ALL {
            self.reload(slot);
        }
        self.worker = Some(self.engine.start_worker());
    }

    /// Re-reads the slot's file and loads it, updating that slot's status panel.
    pub(super) fn reload(&mut self, slot: ProgramSlot) {
        let i = slot.index();
        let path = &self.sources[i];
        match fs::read_to_string(path) {
            Ok(source) => {
                reload_and_present(&self.engine, slot, &source, &mut self.panels[i]);
            }
            Err(e) => present(&format!("cannot read {}: {e}", path.display()), &mut self.panels[i]),
        }
    }

    pub(super) fn toggle_pause(&mut self) {
        let mut state = self.engine.lock();
        if state.runner.is_paused() {
            state.runner.set_time_scale(self.resume_scale);
            info!("resumed");
        } else {
            self.resume_scale = state.runner.time_scale();
            state.runner.set_time_scale(0);
            info!("paused");
        }
    }

    pub(super) fn scale_time(&mut self, faster: bool) {
        let mut state = self.engine.lock();
        let paused = state.runner.is_paused();
        let current = if paused { self.resume_scale } else { state.runner.time_scale() };
        let next = if faster {
            current.saturating_mul(2).min(MAX_TIME_SCALE)
        } else {
            (current / 2).max(MIN_TIME_SCALE)
        };
        if paused {
            self.resume_scale = next;
        } else {
            state.runner.set_time_scale(next);
        }
    }

    pub(super) fn single_step(&mut self) {
        self.engine.lock().runner.force_step();
    }

    /// Reports the canvas size, in braille dots, for a terminal of `size`.
    pub(super) fn resize(&mut self, size: Rect) {
        let area = arena_area(size);
        let inner = Rect::new(area.x + 1, area.y + 1, area.width.saturating_sub(2), area.height.saturating_sub(2));
        self.engine.on_canvas_resize(inner.width as f64 * 2.0, inner.height as f64 * 4.0);
    }
}

pub fn run(terminal: &mut DefaultTerminal, mut app: App) -> io::Result<()> {
    let size = terminal.size()?;
    app.resize(Rect::new(0, 0, size.width, size.height));
    app.start();
    loop {
        terminal.draw(|f| ui(f, &app))?;
        if event::poll(Duration::from_millis(33))? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Resize(w, h) => app.resize(Rect::new(0, 0, w, h)),
                _ => {}
            }
        }
        if app.should_quit {
            break;
        }
    }
    // dropping the worker joins the simulation thread
    app.worker = None;
    Ok(())
}
