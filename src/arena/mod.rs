pub mod io;
pub mod physics;
pub mod raycast;
pub mod robot;
pub mod runner;
pub mod simulation;
pub mod timer;
pub mod vector;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub use physics::{PhysicsBody, PhysicsWorld, MAX_PHYSICS_BODIES};
pub use raycast::{raycast, HitKind, RaycastHit};
pub use robot::{Robot, Segment};
pub use runner::Runner;
pub use simulation::{Outcome, Simulation, MAX_ROBOTS};
pub use timer::Timer;
pub use vector::{Rect, Vec2, EPSILON};
#[cfg(not(target_arch = "wasm32"))]
pub use worker::Worker;

#[cfg(test)]
mod tests;
