// config.rs
use crate::arena::Rect;

/// Every tunable constant of the arena. `Default` gives the standard match rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Simulation steps per simulated second.
    pub steps_per_sec: u32,
    /// Backlog of real time the runner is allowed to catch up on.
    pub max_ms_behind: u32,
    /// Neutral time scale; `time_scale / neutral_time_scale` simulated seconds pass per real second.
    pub neutral_time_scale: u32,

    pub boundary: Rect,

    pub robot_radius: f32,
    pub initial_energy: i32,
    pub weapon_cooldown_steps: u16,
    pub step_energy_cost: i32,
    /// Moving costs `|speed| / move_energy_divisor` per step.
    pub move_energy_divisor: i32,
    pub fire_energy_cost: i32,
    pub weapon_damage: i32,

    /// Units per second.
    pub max_speed: i16,
    /// Degrees per second.
    pub max_turn_rate: i16,
}

impl ArenaConfig {
    #[inline]
    pub fn delta_time(&self) -> f32 {
        1.0 / self.steps_per_sec as f32
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            steps_per_sec: 1024,
            max_ms_behind: 100,
            neutral_time_scale: 1000,
            boundary: Rect::new(0.0, 0.0, 1600.0, 900.0),
            robot_radius: 50.0,
            initial_energy: 4_000_000,
            weapon_cooldown_steps: 1000,
            step_energy_cost: 1,
            move_energy_divisor: 8,
            fire_energy_cost: 10_000,
            weapon_damage: 250_000,
            max_speed: 400,
            max_turn_rate: 180,
        }
    }
}
