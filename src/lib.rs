//! A two-robot arena. Each robot runs a program for a small 16-bit
//! processor, written in that processor's assembly language and loaded
//! into the arena through [`Engine`].

pub mod arena;
pub mod assembler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod presentation;
pub mod processor;
#[cfg(feature = "web")]
pub mod web;

pub use config::ArenaConfig;
pub use engine::{reload_and_present, Engine, ProgramSlot, Viewport};
pub use errors::EmbattledError;
pub use presentation::{present, ModalAlert, Presenter, StatusPanel};
