use std::time::Duration;

use super::io::{
    IO_BASE, IO_COOLDOWN, IO_ENERGY, IO_FIRE, IO_HEADING, IO_SENSOR_DISTANCE, IO_SENSOR_KIND,
};
use super::*;
use crate::assembler::assemble;
use crate::config::ArenaConfig;
use crate::errors::EmbattledError;

fn load(sim: &mut Simulation, slot: usize, src: &str) {
    let prog = assemble(src).expect("assemble");
    sim.load_program(slot, &prog.bytes).expect("load");
}

fn x_of(sim: &Simulation, slot: usize) -> f32 {
    sim.robot(slot).and_then(|r| r.position(sim.world())).expect("robot").x
}

#[test]
fn robots_start_facing_each_other() {
    let sim = Simulation::default();
    assert_eq!(sim.robots().len(), MAX_ROBOTS);
    assert_eq!(x_of(&sim, 0), 400.0);
    assert_eq!(x_of(&sim, 1), 1200.0);

    let a = sim.robot(0).expect("robot");
    assert_eq!(a.process.registers.sp, IO_BASE);
    assert_eq!(a.process.memory.read_byte(IO_SENSOR_KIND), 1);
    assert_eq!(a.process.memory.read_word(IO_SENSOR_DISTANCE), 700);
    assert_eq!(a.process.memory.read_word(IO_ENERGY), 40_000);
    assert_eq!(sim.outcome(), Outcome::Running);
}

#[test]
fn each_step_costs_energy() {
    let mut sim = Simulation::default();
    for _ in 0..10 {
        sim.step();
    }
    assert_eq!(sim.steps(), 10);
    assert!(sim.robots().iter().all(|r| r.energy == 4_000_000 - 10));
}

#[test]
fn speed_moves_the_robot_and_costs_energy() {
    let mut sim = Simulation::default();
    load(&mut sim, 0, "stw 400, 0xFF00\nhalt: jmp @halt\n");
    sim.step();
    let x = x_of(&sim, 0);
    assert!((x - (400.0 + 400.0 / 1024.0)).abs() < 1e-3, "{x}");
    assert_eq!(sim.robot(0).expect("robot").energy, 4_000_000 - 1 - 50);
}

#[test]
fn speed_is_clamped() {
    let mut sim = Simulation::default();
    load(&mut sim, 1, "stw -30000, 0xFF00\nhalt: jmp @halt\n");
    sim.step();
    // robot 1 faces left, so a negative speed backs it off to the right
    let x = x_of(&sim, 1);
    assert!((x - (1200.0 + 400.0 / 1024.0)).abs() < 1e-3, "{x}");
}

#[test]
fn turn_rate_is_clamped_and_heading_published() {
    let mut sim = Simulation::default();
    load(&mut sim, 0, "stw 30000, 0xFF02\nhalt: jmp @halt\n");
    for _ in 0..513 {
        sim.step();
    }

    // 180 degrees per second for 513/1024 s, just past a quarter turn
    let a = sim.robot(0).expect("robot");
    let expected = 513.0 / 1024.0 * std::f32::consts::PI;
    assert!((a.heading - expected).abs() < 1e-3, "{}", a.heading);
    assert_eq!(a.process.memory.read_word(IO_HEADING), 0x4020);

    // looking across the short side of the arena at the wall
    assert_eq!(a.process.memory.read_byte(IO_SENSOR_KIND), HitKind::Boundary.code());
    assert_eq!(a.process.memory.read_byte(IO_SENSOR_KIND), 2);
    assert_eq!(a.process.memory.read_word(IO_SENSOR_DISTANCE), 400);
}

#[test]
fn negative_limits_clamp_by_magnitude() {
    let config = ArenaConfig { max_speed: -400, max_turn_rate: -180, ..ArenaConfig::default() };
    let mut sim = Simulation::new(config);
    load(&mut sim, 0, "stw 30000, 0xFF00\nstw 30000, 0xFF02\nhalt: jmp @halt\n");
    sim.step();
    sim.step();
    let a = sim.robot(0).expect("robot");
    assert!((a.heading - std::f32::consts::PI / 1024.0).abs() < 1e-5, "{}", a.heading);
    assert!(x_of(&sim, 0) > 400.0);
}

#[test]
fn weapon_hits_the_other_robot() {
    let mut sim = Simulation::default();
    load(&mut sim, 0, "stb 1, 0xFF04\nhalt: jmp @halt\n");
    sim.step();

    let a = sim.robot(0).expect("robot");
    let b = sim.robot(1).expect("robot");
    assert_eq!(a.energy, 4_000_000 - 1 - 10_000);
    assert_eq!(b.energy, 4_000_000 - 1 - 250_000);
    assert_eq!(a.cooldown, 1000);
    assert_eq!(a.process.memory.read_byte(IO_FIRE), 0);
    assert_eq!(a.process.memory.read_word(IO_COOLDOWN), 1000);

    let shot = a.last_weapon_fire.expect("shot");
    assert!((shot.start.x - 450.0).abs() < 1e-3);
    assert!((shot.end.x - 1150.0).abs() < 1e-3);

    sim.step();
    assert_eq!(sim.robot(0).expect("robot").cooldown, 999);
    assert!(sim.robot(0).expect("robot").last_weapon_fire.is_none());
}

#[test]
fn sustained_fire_wins_the_match() {
    let mut sim = Simulation::default();
    load(&mut sim, 0, "loop: stb 1, 0xFF04\njmp @loop\n");
    while sim.outcome() == Outcome::Running && sim.steps() < 20_000 {
        sim.step();
    }
    assert_eq!(sim.outcome(), Outcome::Winner(0));
    assert_eq!(sim.steps(), 15_001);

    // a disabled robot stops executing
    let frozen = sim.robot(1).expect("robot").process.registers.ip;
    sim.step();
    assert_eq!(sim.robot(1).expect("robot").process.registers.ip, frozen);
}

#[test]
fn both_robots_out_is_a_draw() {
    let mut sim = Simulation::default();
    for slot in 0..MAX_ROBOTS {
        sim.robot_mut(slot).expect("robot").energy = 0;
    }
    assert_eq!(sim.outcome(), Outcome::Draw);
}

#[test]
fn reload_respawns_in_place() {
    let mut sim = Simulation::default();
    load(&mut sim, 0, "stw 400, 0xFF00\nhalt: jmp @halt\n");
    for _ in 0..100 {
        sim.step();
    }
    let moved = x_of(&sim, 0);
    load(&mut sim, 0, "halt: jmp @halt\n");
    let a = sim.robot(0).expect("robot");
    assert_eq!(a.energy, 4_000_000);
    assert_eq!(a.process.registers.ip, 0);
    assert_eq!(a.process.registers.sp, IO_BASE);
    assert_eq!(x_of(&sim, 0), moved);
}

#[test]
fn load_rejects_missing_slot_and_bad_images() {
    let mut sim = Simulation::default();
    let err = sim.load_program(2, &[0; 0x10000]).err().expect("expected error");
    assert!(matches!(err, EmbattledError::NoSuchRobot(2)));
    let err = sim.load_program(0, &[0; 16]).err().expect("expected error");
    assert!(matches!(err, EmbattledError::ImageSize { .. }));
}

#[test]
fn runner_paces_steps_with_carry() {
    let mut runner = Runner::default();
    let total: u64 = (0..5).map(|_| runner.advance(Duration::from_millis(10))).sum();
    assert_eq!(total, 51);
    assert_eq!(runner.simulation.steps(), 51);
}

#[test]
fn runner_caps_backlog() {
    let mut runner = Runner::default();
    assert_eq!(runner.advance(Duration::from_secs(5)), 102);
}

#[test]
fn runner_survives_extreme_input() {
    let mut runner = Runner::default();
    runner.set_time_scale(u32::MAX);
    assert_eq!(runner.advance(Duration::from_secs(u64::MAX)), 102);
    assert_eq!(runner.advance(Duration::MAX), 102);

    let config = ArenaConfig { neutral_time_scale: 0, ..ArenaConfig::default() };
    let mut runner = Runner::new(Simulation::new(config));
    runner.set_time_scale(1);
    assert_eq!(runner.advance(Duration::from_millis(10)), 10);
}

#[test]
fn runner_time_scale_speeds_up() {
    let mut runner = Runner::default();
    runner.set_time_scale(2000);
    assert_eq!(runner.advance(Duration::from_millis(10)), 20);
}

#[test]
fn paused_runner_only_force_steps() {
    let mut runner = Runner::default();
    runner.set_time_scale(0);
    assert!(runner.is_paused());
    assert_eq!(runner.advance(Duration::from_secs(1)), 0);
    runner.force_step();
    assert_eq!(runner.advance(Duration::ZERO), 1);
    assert_eq!(runner.advance(Duration::ZERO), 0);
    assert_eq!(runner.on_step(Duration::from_secs(1)), runner::IDLE_WAIT);
}

#[test]
fn on_step_runs_one_step_or_reports_wait() {
    let mut runner = Runner::default();
    let wait = runner.on_step(Duration::ZERO);
    assert_eq!(wait, Duration::from_nanos(976_563));
    assert_eq!(runner.on_step(Duration::from_millis(1)), Duration::ZERO);
    assert_eq!(runner.simulation.steps(), 1);
}

#[test]
fn custom_config_reaches_the_robots() {
    let config = ArenaConfig { initial_energy: 10, step_energy_cost: 5, ..ArenaConfig::default() };
    let mut sim = Simulation::new(config);
    sim.step();
    sim.step();
    assert_eq!(sim.outcome(), Outcome::Draw);
}
