// web.rs
//! Browser entry points. The page calls these by their exported names.
#![allow(non_snake_case)]

use log::{warn, Level};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::engine::Engine;
use crate::presentation::{present, ModalAlert, Presenter, ERROR_CLASS, SUCCESS_CLASS};

thread_local! {
    static ENGINE: Engine = Engine::default();
}

#[wasm_bindgen(start)]
pub fn start() {
    if console_log::init_with_level(Level::Info).is_err() {
        warn!("logger already initialised");
    }
}

#[wasm_bindgen(js_name = OnCanvasResize)]
pub fn OnCanvasResize(width: f64, height: f64) {
    ENGINE.with(|e| e.on_canvas_resize(width, height));
}

#[wasm_bindgen(js_name = ReloadAssemblyProgramA)]
pub fn ReloadAssemblyProgramA(source: &str) -> String {
    ENGINE.with(|e| e.reload_program_a(source))
}

#[wasm_bindgen(js_name = ReloadAssemblyProgramB)]
pub fn ReloadAssemblyProgramB(source: &str) -> String {
    ENGINE.with(|e| e.reload_program_b(source))
}

/// Runs the steps owed for `elapsed_ms` of page time; returns how many ran.
#[wasm_bindgen(js_name = AdvanceArena)]
pub fn AdvanceArena(elapsed_ms: f64) -> u32 {
    let steps = ENGINE.with(|e| e.advance_ms(elapsed_ms));
    steps.min(u32::MAX as u64) as u32
}

/// Status policy on a live DOM element.
struct ElementStatus<'a>(&'a Element);

impl ElementStatus<'_> {
    fn swap_class(&self, add: &str, remove: &str) {
        let classes = self.0.class_list();
        if classes.add_1(add).and_then(|_| classes.remove_1(remove)).is_err() {
            warn!("could not update status classes");
        }
    }
}

impl Presenter for ElementStatus<'_> {
    fn on_success(&mut self) {
        self.0.set_inner_html("<b>Success!</b>");
        self.swap_class(SUCCESS_CLASS, ERROR_CLASS);
    }

    fn on_error(&mut self, message: &str) {
        self.0.set_inner_html(&format!("<b>Error</b><br>{message}"));
        self.swap_class(ERROR_CLASS, SUCCESS_CLASS);
    }
}

#[wasm_bindgen(js_name = PresentReloadResult)]
pub fn PresentReloadResult(result: &str, element: &Element) {
    present(result, &mut ElementStatus(element));
}

#[wasm_bindgen(js_name = PresentReloadResultModal)]
pub fn PresentReloadResultModal(result: &str) {
    let mut modal = ModalAlert::new(|message: &str| {
        let shown = web_sys::window().map(|w| w.alert_with_message(message));
        if !matches!(shown, Some(Ok(()))) {
            warn!("could not raise alert: {message}");
        }
    });
    present(result, &mut modal);
}
