use embattled::arena::{HitKind, Outcome};
use embattled::engine::EngineState;
use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, BorderType, Paragraph},
};

use super::{robot_color, robot_name};

pub(super) fn render_telemetry(f: &mut Frame, area: Rect, state: &EngineState) {
    let runner = &state.runner;
    let sim = &runner.simulation;

    let speed = if runner.is_paused() {
        Span::styled("paused", Style::default().fg(Color::Yellow))
    } else {
        Span::raw(format!("x{:.3}", runner.time_scale() as f64 / sim.config().neutral_time_scale as f64))
    };
    let mut lines = vec![Line::from(vec![Span::raw(format!("step {}  ", sim.steps())), speed])];
    lines.push(match sim.outcome() {
        Outcome::Running => Line::raw("fighting"),
        Outcome::Winner(i) => Line::styled(format!("{} wins", robot_name(i)), Style::default().fg(robot_color(i))),
        Outcome::Draw => Line::raw("draw"),
    });

    for (slot, robot) in sim.robots().iter().enumerate() {
        lines.push(Line::raw(""));
        let status = if robot.is_disabled() { " (disabled)" } else { "" };
        lines.push(Line::styled(
            format!("{}{status}", robot_name(slot)),
            Style::default().fg(robot_color(slot)).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::raw(format!("  energy {:>8}  cool {:>4}", robot.energy, robot.cooldown)));
        if let Some(p) = robot.position(sim.world()) {
            lines.push(Line::raw(format!(
                "  pos ({:.0}, {:.0})  hdg {:.0}°",
                p.x,
                p.y,
                robot.heading.to_degrees()
            )));
        }
        let hit = robot.last_sensor_hit;
        let seen = match hit.kind {
            HitKind::None => "nothing".to_string(),
            HitKind::Body => format!("robot @ {:.0}", hit.distance),
            HitKind::Boundary => format!("wall @ {:.0}", hit.distance),
        };
        lines.push(Line::raw(format!("  sensor {seen}")));
        let regs = &robot.process.registers;
        lines.push(Line::raw(format!("  ip {:04X}  sp {:04X}  rt {:04X}", regs.ip, regs.sp, regs.rt)));
    }

    let block = Block::bordered().border_type(BorderType::Rounded).title(" Telemetry ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}
