// engine.rs
//! The boundary hosts talk to: program reloads, canvas resizes and the clock.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{info, warn};

use crate::arena::{Rect, Runner, Simulation, Vec2};
use crate::assembler::assemble;
use crate::config::ArenaConfig;
use crate::presentation::{present, Presenter};

/// Which robot a program is loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramSlot {
    A,
    B,
}

impl ProgramSlot {
    pub const ALL: [ProgramSlot; 2] = [ProgramSlot::A, ProgramSlot::B];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ProgramSlot::A => 0,
            ProgramSlot::B => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProgramSlot::A => "A",
            ProgramSlot::B => "B",
        }
    }
}

/// The host's drawing surface, as last reported.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Uniform scale and offset that map arena coordinates onto a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Fit {
    pub fn to_screen(&self, p: Vec2) -> (f64, f64) {
        (self.offset_x + p.x as f64 * self.scale, self.offset_y + p.y as f64 * self.scale)
    }
}

impl Viewport {
    /// Largest scale that shows all of `boundary`, centred.
    pub fn fit(&self, boundary: Rect) -> Fit {
        let (bw, bh) = (boundary.width as f64, boundary.height as f64);
        if bw <= 0.0 || bh <= 0.0 || self.width <= 0.0 || self.height <= 0.0 {
            return Fit { scale: 0.0, offset_x: 0.0, offset_y: 0.0 };
        }
        let scale = (self.width / bw).min(self.height / bh);
        Fit {
            scale,
            offset_x: (self.width - bw * scale) / 2.0 - boundary.x as f64 * scale,
            offset_y: (self.height - bh * scale) / 2.0 - boundary.y as f64 * scale,
        }
    }
}

#[derive(Debug)]
pub struct EngineState {
    pub runner: Runner,
    pub viewport: Viewport,
}

/// Shared handle to the arena. Clones refer to the same state, and every
/// call takes the lock, so reloads, resizes and steps never interleave.
#[derive(Debug, Clone)]
pub struct Engine {
    state: Arc<Mutex<EngineState>>,
}

impl Engine {
    pub fn new(config: ArenaConfig) -> Self {
        let state = EngineState {
            runner: Runner::new(Simulation::new(config)),
            viewport: Viewport::default(),
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Locks the state. A panic on another thread does not make the arena unusable.
    pub fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn shared(&self) -> Arc<Mutex<EngineState>> {
        self.state.clone()
    }

    pub fn on_canvas_resize(&self, width: f64, height: f64) {
        self.lock().viewport = Viewport { width, height };
    }

    pub fn viewport(&self) -> Viewport {
        self.lock().viewport
    }

    /// Assembles `source` into `slot`. Returns an empty string on success and
    /// the error text otherwise; a rejected program leaves the robot untouched.
    pub fn reload_program(&self, slot: ProgramSlot, source: &str) -> String {
        let program = match assemble(source) {
            Ok(p) => p,
            Err(e) => {
                warn!("program {} rejected: {e}", slot.name());
                return e.to_string();
            }
        };
        match self.lock().runner.simulation.load_program(slot.index(), &program.bytes) {
            Ok(()) => {
                info!("program {} loaded ({} statements)", slot.name(), program.mappings.len());
                String::new()
            }
            Err(e) => {
                warn!("program {} could not be loaded: {e}", slot.name());
                e.to_string()
            }
        }
    }

    pub fn reload_program_a(&self, source: &str) -> String {
        self.reload_program(ProgramSlot::A, source)
    }

    pub fn reload_program_b(&self, source: &str) -> String {
        self.reload_program(ProgramSlot::B, source)
    }

    /// Runs the steps owed for `elapsed` real time.
    pub fn advance(&self, elapsed: Duration) -> u64 {
        self.lock().runner.advance(elapsed)
    }

    /// [`Engine::advance`] for hosts that measure time in float milliseconds.
    /// Negative or NaN input counts as no time, and values too large for a
    /// `Duration` saturate.
    pub fn advance_ms(&self, elapsed_ms: f64) -> u64 {
        let elapsed = if elapsed_ms > 0.0 {
            Duration::try_from_secs_f64(elapsed_ms / 1000.0).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        self.advance(elapsed)
    }

    /// Drives the arena from a background thread until the worker is dropped.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_worker(&self) -> crate::arena::Worker {
        let mut last = std::time::Instant::now();
        crate::arena::Worker::start(self.shared(), move |state: &mut EngineState| {
            let now = std::time::Instant::now();
            let elapsed = now - last;
            last = now;
            state.runner.on_step(elapsed)
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}

/// Reloads `slot` and hands the result to `presenter`. Returns true on success.
pub fn reload_and_present(
    engine: &Engine,
    slot: ProgramSlot,
    source: &str,
    presenter: &mut dyn Presenter,
) -> bool {
    let result = engine.reload_program(slot, source);
    present(&result, presenter);
    result.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{ModalAlert, StatusPanel};

    #[test]
    fn resize_is_stored_verbatim() {
        let engine = Engine::default();
        engine.on_canvas_resize(-3.5, 1e9);
        assert_eq!(engine.viewport(), Viewport { width: -3.5, height: 1e9 });
    }

    #[test]
    fn fit_centres_the_arena() {
        let vp = Viewport { width: 800.0, height: 800.0 };
        let fit = vp.fit(Rect::new(0.0, 0.0, 1600.0, 900.0));
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, 175.0);
        assert_eq!(fit.to_screen(Vec2::new(1600.0, 900.0)), (800.0, 625.0));
        assert_eq!(Viewport::default().fit(Rect::new(0.0, 0.0, 1.0, 1.0)).scale, 0.0);
    }

    #[test]
    fn reload_reports_assembler_errors() {
        let engine = Engine::default();
        assert_eq!(engine.reload_program_a("nop\n"), "");
        assert_eq!(engine.reload_program_b("nop\nfoo $x0\n"), "line 2: Unrecognized mnemonic");
    }

    #[test]
    fn slots_target_different_robots() {
        let engine = Engine::default();
        assert_eq!(engine.reload_program_b("stw 400, 0xFF00\nhalt: jmp @halt\n"), "");
        let mut state = engine.lock();
        state.runner.simulation.step();
        let sim = &state.runner.simulation;
        let a = sim.robot(0).and_then(|r| r.position(sim.world())).expect("a");
        let b = sim.robot(1).and_then(|r| r.position(sim.world())).expect("b");
        assert_eq!(a.x, 400.0);
        assert!(b.x < 1200.0);
    }

    #[test]
    fn failed_reload_keeps_the_running_program() {
        let engine = Engine::default();
        assert_eq!(engine.reload_program_a("stw 400, 0xFF00\nhalt: jmp @halt\n"), "");
        engine.advance(Duration::from_millis(10));
        let before = engine.lock().runner.simulation.robot(0).expect("robot").process.clone();
        assert_ne!(engine.reload_program_a("jmp @nowhere"), "");
        let state = engine.lock();
        let after = &state.runner.simulation.robot(0).expect("robot").process;
        assert_eq!(after.registers.ip, before.registers.ip);
        assert_eq!(after.memory.read_word(0xFF00), 400);
    }

    #[test]
    fn advance_ms_accepts_any_float() {
        let engine = Engine::default();
        assert_eq!(engine.advance_ms(10.0), 10);
        assert_eq!(engine.advance_ms(-5.0), 0);
        assert_eq!(engine.advance_ms(f64::NAN), 0);
        assert_eq!(engine.advance_ms(1e25), 102);
        assert_eq!(engine.advance_ms(f64::INFINITY), 102);
    }

    #[test]
    fn reload_and_present_uses_the_policy() {
        let engine = Engine::default();
        let mut panel = StatusPanel::new();
        assert!(reload_and_present(&engine, ProgramSlot::A, "nop", &mut panel));
        assert_eq!(panel.inner_html, "<b>Success!</b>");

        let mut alerts = Vec::new();
        let mut modal = ModalAlert::new(|m: &str| alerts.push(m.to_string()));
        assert!(!reload_and_present(&engine, ProgramSlot::B, "nop 1", &mut modal));
        assert_eq!(alerts, ["line 1: Too many parameters"]);
    }
}
