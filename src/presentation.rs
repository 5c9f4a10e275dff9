// presentation.rs
//! How a reload result reaches the user. The engine returns an empty string
//! on success and the error text otherwise; a [`Presenter`] decides what
//! the user sees in each case.
use std::collections::BTreeSet;

pub trait Presenter {
    fn on_success(&mut self);
    fn on_error(&mut self, message: &str);
}

/// Routes `result` to the presenter: empty means success, anything else is shown verbatim.
pub fn present(result: &str, presenter: &mut dyn Presenter) {
    if result.is_empty() {
        presenter.on_success();
    } else {
        presenter.on_error(result);
    }
}

pub const SUCCESS_CLASS: &str = "success";
pub const ERROR_CLASS: &str = "error";

/// A status element: its inner HTML and class list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusPanel {
    pub inner_html: String,
    pub classes: BTreeSet<String>,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_error(&self) -> bool {
        self.has_class(ERROR_CLASS)
    }

    /// The panel text with the markup stripped, for hosts that cannot render HTML.
    pub fn plain_text(&self) -> String {
        let text = self.inner_html.replace("<br>", "\n");
        let mut out = String::with_capacity(text.len());
        let mut in_tag = false;
        for c in text.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out
    }
}

impl Presenter for StatusPanel {
    fn on_success(&mut self) {
        self.inner_html = "<b>Success!</b>".to_string();
        self.classes.insert(SUCCESS_CLASS.to_string());
        self.classes.remove(ERROR_CLASS);
    }

    fn on_error(&mut self, message: &str) {
        self.inner_html = format!("<b>Error</b><br>{message}");
        self.classes.insert(ERROR_CLASS.to_string());
        self.classes.remove(SUCCESS_CLASS);
    }
}

/// Raises `alert` with the message on failure and stays quiet on success.
pub struct ModalAlert<F: FnMut(&str)> {
    alert: F,
}

impl<F: FnMut(&str)> ModalAlert<F> {
    pub fn new(alert: F) -> Self {
        Self { alert }
    }
}

impl<F: FnMut(&str)> Presenter for ModalAlert<F> {
    fn on_success(&mut self) {}

    fn on_error(&mut self, message: &str) {
        (self.alert)(message);
    }
}
