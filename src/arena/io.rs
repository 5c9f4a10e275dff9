// arena/io.rs
//! Memory-mapped I/O page shared between a robot's program and the arena.
//! Words are little-endian like the rest of memory.
use crate::processor::Memory;

pub const IO_BASE: u16 = 0xFF00;

// ---------- Written by the program ----------
pub const IO_SPEED: u16 = 0xFF00;
pub const IO_TURN_RATE: u16 = 0xFF02;
pub const IO_FIRE: u16 = 0xFF04;

// ---------- Written by the arena ----------
pub const IO_SENSOR_KIND: u16 = 0xFF05;
pub const IO_SENSOR_DISTANCE: u16 = 0xFF06;
pub const IO_ENERGY: u16 = 0xFF08;
pub const IO_COOLDOWN: u16 = 0xFF0A;
pub const IO_HEADING: u16 = 0xFF0C;

/// What the program asked the robot to do this step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub speed: i16,
    pub turn_rate: i16,
    pub fire: bool,
}

impl Controls {
    pub fn read(memory: &Memory) -> Self {
        Self {
            speed: memory.read_word(IO_SPEED) as i16,
            turn_rate: memory.read_word(IO_TURN_RATE) as i16,
            fire: memory.read_byte(IO_FIRE) != 0,
        }
    }
}

/// The arena's view of the robot, as the program sees it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Telemetry {
    pub sensor_kind: u8,
    pub sensor_distance: u16,
    pub energy: u16,
    pub cooldown: u16,
    pub heading: u16,
}

impl Telemetry {
    pub fn write(&self, memory: &mut Memory) {
        memory.write_byte(IO_SENSOR_KIND, self.sensor_kind);
        memory.write_word(IO_SENSOR_DISTANCE, self.sensor_distance);
        memory.write_word(IO_ENERGY, self.energy);
        memory.write_word(IO_COOLDOWN, self.cooldown);
        memory.write_word(IO_HEADING, self.heading);
    }
}

pub fn clear_fire(memory: &mut Memory) {
    memory.write_byte(IO_FIRE, 0);
}

/// Radians to a binary angle where 65536 is a full turn.
pub fn binary_angle(radians: f32) -> u16 {
    let turns = radians / std::f32::consts::TAU;
    let frac = turns - turns.floor();
    (frac * 65536.0) as u32 as u16
}

/// Clamps a distance into a sensor word.
#[inline]
pub fn saturate_distance(distance: f32) -> u16 {
    if distance.is_finite() { distance.clamp(0.0, u16::MAX as f32) as u16 } else { u16::MAX }
}
