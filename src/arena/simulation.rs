// arena/simulation.rs
use std::f32::consts::PI;

use log::debug;

use super::physics::{PhysicsBody, PhysicsWorld};
use super::robot::Robot;
use crate::config::ArenaConfig;
use crate::errors::EmbattledError;

pub const MAX_ROBOTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    /// Index of the only robot left with energy.
    Winner(usize),
    Draw,
}

/// The two-robot arena: robots, their bodies and the rules that bind them.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: ArenaConfig,
    world: PhysicsWorld,
    robots: Vec<Robot>,
    steps: u64,
}

impl Simulation {
    /// Robot 0 starts on the left facing right, robot 1 on the right facing left.
    pub fn new(config: ArenaConfig) -> Self {
        let mut world = PhysicsWorld::new(config.boundary);
        let starts = [(0.25, 0.0), (0.75, PI)];
        let mut robots = Vec::with_capacity(MAX_ROBOTS);
        for (fx, heading) in starts {
            let position = config.boundary.lerp(fx, 0.5);
            if let Some(body) = world.add_body(PhysicsBody::new(position, config.robot_radius)) {
                robots.push(Robot::new(body, heading, &config));
            }
        }

        let mut sim = Self { config, world, robots, steps: 0 };
        sim.update_sensors();
        sim
    }

    /// Respawns robot `slot` running `image`.
    pub fn load_program(&mut self, slot: usize, image: &[u8]) -> Result<(), EmbattledError> {
        let robot = self.robots.get_mut(slot).ok_or(EmbattledError::NoSuchRobot(slot))?;
        robot.respawn(image, &self.config)?;
        robot.update_sensor(&self.world);
        Ok(())
    }

    pub fn step(&mut self) {
        for robot in &mut self.robots {
            robot.step_process(&self.config);
        }

        for i in 0..self.robots.len() {
            let mut hits = Vec::new();
            self.robots[i].apply_controls(&mut self.world, &self.config, &mut |body: usize, damage: i32| {
                hits.push((body, damage))
            });
            for (body, damage) in hits {
                self.damage_body(body, damage);
            }
        }

        self.world.step(self.config.delta_time());
        self.update_sensors();
        self.steps += 1;
    }

    fn damage_body(&mut self, body: usize, damage: i32) {
        let Some(target) = self.robots.iter_mut().find(|r| r.body == body) else { return };
        if target.energy > 0 {
            target.energy = target.energy.saturating_sub(damage);
            debug!("body {body} took {damage} damage, {} energy left", target.energy);
        }
    }

    fn update_sensors(&mut self) {
        for robot in &mut self.robots {
            robot.update_sensor(&self.world);
        }
    }

    pub fn outcome(&self) -> Outcome {
        let mut alive = self.robots.iter().enumerate().filter(|(_, r)| !r.is_disabled());
        match (alive.next(), alive.next()) {
            (Some(_), Some(_)) => Outcome::Running,
            (Some((i, _)), None) => Outcome::Winner(i),
            _ => Outcome::Draw,
        }
    }

    #[inline]
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    #[inline]
    pub fn robot(&self, slot: usize) -> Option<&Robot> {
        self.robots.get(slot)
    }

    #[inline]
    pub fn robot_mut(&mut self, slot: usize) -> Option<&mut Robot> {
        self.robots.get_mut(slot)
    }

    #[inline]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    #[inline]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Steps taken since the arena was created.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}
