// arena/robot.rs
use log::debug;

use super::io::{self, Controls, Telemetry, IO_BASE};
use super::physics::PhysicsWorld;
use super::raycast::{raycast, HitKind, RaycastHit};
use super::vector::Vec2;
use crate::config::ArenaConfig;
use crate::errors::EmbattledError;
use crate::processor::{Memory, Process};

/// A line drawn by the robot this step, kept for hosts to render.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

#[derive(Debug, Clone)]
pub struct Robot {
    pub body: usize,
    pub energy: i32,
    pub cooldown: u16,
    /// Radians, measured from +x towards +y.
    pub heading: f32,
    pub last_weapon_fire: Option<Segment>,
    pub last_sensor: Option<Segment>,
    pub last_sensor_hit: RaycastHit,
    pub process: Process,
}

impl Robot {
    pub fn new(body: usize, heading: f32, config: &ArenaConfig) -> Self {
        let mut robot = Self {
            body,
            energy: config.initial_energy,
            cooldown: 0,
            heading,
            last_weapon_fire: None,
            last_sensor: None,
            last_sensor_hit: RaycastHit::MISS,
            process: Process::new(),
        };
        robot.process.registers.sp = IO_BASE;
        robot
    }

    /// Replaces the program with `image` and restores full energy.
    /// Position and heading are kept.
    pub fn respawn(&mut self, image: &[u8], config: &ArenaConfig) -> Result<(), EmbattledError> {
        let memory = Memory::from_image(image)?;
        self.process.memory = memory;
        self.process.reset();
        self.process.registers.sp = IO_BASE;
        self.energy = config.initial_energy;
        self.cooldown = 0;
        self.last_weapon_fire = None;
        Ok(())
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.energy <= 0
    }

    /// Runs one instruction (or one sleep tick) and charges for it.
    pub fn step_process(&mut self, config: &ArenaConfig) {
        if self.is_disabled() {
            return;
        }
        crate::processor::step(&mut self.process);
        self.spend(config.step_energy_cost);
    }

    /// Moves, turns and fires according to the I/O page.
    /// `on_damage(body, amount)` is called for a body hit by the weapon.
    pub fn apply_controls(
        &mut self,
        world: &mut PhysicsWorld,
        config: &ArenaConfig,
        on_damage: &mut dyn FnMut(usize, i32),
    ) {
        self.last_weapon_fire = None;
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.is_disabled() {
            return;
        }

        let controls = Controls::read(&self.process.memory);
        let dt = config.delta_time();
        let speed = clamp_magnitude(controls.speed, config.max_speed);
        let turn = clamp_magnitude(controls.turn_rate, config.max_turn_rate);

        self.heading = (self.heading + (turn as f32).to_radians() * dt).rem_euclid(std::f32::consts::TAU);
        let forward = Vec2::from_angle(self.heading);
        if let Some(body) = world.body_mut(self.body) {
            body.position += forward.scale(speed as f32 * dt);
        }
        self.spend(speed.abs().checked_div(config.move_energy_divisor).unwrap_or(0));

        if controls.fire {
            io::clear_fire(&mut self.process.memory);
            if self.cooldown == 0 {
                self.fire(world, config, on_damage);
            }
        }

        if self.is_disabled() {
            debug!("robot on body {} ran out of energy", self.body);
        }
    }

    fn fire(&mut self, world: &PhysicsWorld, config: &ArenaConfig, on_damage: &mut dyn FnMut(usize, i32)) {
        let Some(origin) = self.rim(world) else { return };
        let dir = Vec2::from_angle(self.heading);
        let hit = raycast(world, origin, dir);

        self.cooldown = config.weapon_cooldown_steps;
        self.spend(config.fire_energy_cost);
        self.last_weapon_fire = hit.point(origin, dir).map(|end| Segment { start: origin, end });

        if let (HitKind::Body, Some(body)) = (hit.kind, hit.body) {
            on_damage(body, config.weapon_damage);
        }
    }

    /// Casts the sensor ray and publishes the result on the I/O page.
    pub fn update_sensor(&mut self, world: &PhysicsWorld) {
        let dir = Vec2::from_angle(self.heading);
        let hit = match self.rim(world) {
            Some(origin) => {
                let hit = raycast(world, origin, dir);
                self.last_sensor = hit.point(origin, dir).map(|end| Segment { start: origin, end });
                hit
            }
            None => RaycastHit::MISS,
        };
        self.last_sensor_hit = hit;

        let telemetry = Telemetry {
            sensor_kind: hit.kind.code(),
            sensor_distance: io::saturate_distance(hit.distance),
            energy: (self.energy.max(0) / 100).min(u16::MAX as i32) as u16,
            cooldown: self.cooldown,
            heading: io::binary_angle(self.heading),
        };
        telemetry.write(&mut self.process.memory);
    }

    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        world.body(self.body).map(|b| b.position)
    }

    /// Point on the robot's surface straight ahead.
    fn rim(&self, world: &PhysicsWorld) -> Option<Vec2> {
        let body = world.body(self.body)?;
        Some(body.position + Vec2::from_angle(self.heading).scale(body.radius))
    }

    #[inline]
    fn spend(&mut self, amount: i32) {
        self.energy = self.energy.saturating_sub(amount);
    }
}

/// Clamps `value` to `-limit..=limit`; a negative limit counts as its magnitude.
fn clamp_magnitude(value: i16, limit: i16) -> i32 {
    let limit = limit.unsigned_abs() as i32;
    (value as i32).clamp(-limit, limit)
}
