mod app;
mod input;
mod view;

pub use app::{run, App};
