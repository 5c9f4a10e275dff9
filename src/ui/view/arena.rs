use embattled::arena::Vec2;
use embattled::engine::EngineState;
use ratatui::{
    Frame,
    prelude::*,
    symbols::Marker,
    widgets::{
        Block, BorderType,
        canvas::{Canvas, Circle, Line as CanvasLine, Rectangle},
    },
};

use super::robot_color;

pub(super) fn render_arena(f: &mut Frame, area: Rect, state: &EngineState) {
    let sim = &state.runner.simulation;
    let world = sim.world();
    let viewport = state.viewport;
    let fit = viewport.fit(world.boundary);
    let (width, height) = (viewport.width.max(1.0), viewport.height.max(1.0));

    // canvas y grows upward, arena y grows downward
    let to_canvas = |p: Vec2| {
        let (x, y) = fit.to_screen(p);
        (x, height - y)
    };

    let canvas = Canvas::default()
        .block(Block::bordered().border_type(BorderType::Rounded).title(" Arena "))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            let b = world.boundary;
            let (x, y) = to_canvas(Vec2::new(b.x, b.bottom()));
            ctx.draw(&Rectangle {
                x,
                y,
                width: b.width as f64 * fit.scale,
                height: b.height as f64 * fit.scale,
                color: Color::DarkGray,
            });

            for (slot, robot) in sim.robots().iter().enumerate() {
                if let Some(s) = robot.last_sensor {
                    let ((x1, y1), (x2, y2)) = (to_canvas(s.start), to_canvas(s.end));
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, Color::DarkGray));
                }
                if let Some(s) = robot.last_weapon_fire {
                    let ((x1, y1), (x2, y2)) = (to_canvas(s.start), to_canvas(s.end));
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, Color::Yellow));
                }

                let Some(body) = world.body(robot.body) else { continue };
                let color = if robot.is_disabled() { Color::DarkGray } else { robot_color(slot) };
                let (x, y) = to_canvas(body.position);
                ctx.draw(&Circle { x, y, radius: body.radius as f64 * fit.scale, color });

                let nose = body.position + Vec2::from_angle(robot.heading).scale(body.radius);
                let (nx, ny) = to_canvas(nose);
                ctx.draw(&CanvasLine::new(x, y, nx, ny, color));
            }
        });
    f.render_widget(canvas, area);
}
