// arena/raycast.rs
use super::physics::{PhysicsBody, PhysicsWorld};
use super::vector::{Rect, Vec2};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    #[default]
    None,
    Body,
    Boundary,
}

impl HitKind {
    /// Code written to the sensor byte of the I/O page.
    pub fn code(self) -> u8 {
        match self {
            HitKind::None => 0,
            HitKind::Body => 1,
            HitKind::Boundary => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub distance: f32,
    pub kind: HitKind,
    pub body: Option<usize>,
}

impl RaycastHit {
    pub const MISS: RaycastHit = RaycastHit { distance: f32::INFINITY, kind: HitKind::None, body: None };

    pub fn point(&self, origin: Vec2, direction: Vec2) -> Option<Vec2> {
        self.distance.is_finite().then(|| origin + direction.normalize().scale(self.distance))
    }
}

/// Casts a ray and returns the nearest body or boundary edge it hits.
///
/// Bodies whose surface contains `origin` are not hit, so a robot can cast
/// from its own rim. The boundary only wins over a body when it is strictly nearer.
pub fn raycast(world: &PhysicsWorld, origin: Vec2, direction: Vec2) -> RaycastHit {
    let dir = direction.normalize();
    if dir.is_zero() {
        return RaycastHit::MISS;
    }

    let mut nearest = RaycastHit::MISS;
    for (i, body) in world.bodies().iter().enumerate() {
        if let Some(d) = ray_circle(body, origin, dir) {
            if d < nearest.distance {
                nearest = RaycastHit { distance: d, kind: HitKind::Body, body: Some(i) };
            }
        }
    }

    if let Some(d) = ray_boundary(&world.boundary, origin, dir) {
        if d < nearest.distance {
            nearest = RaycastHit { distance: d, kind: HitKind::Boundary, body: None };
        }
    }
    nearest
}

fn ray_circle(body: &PhysicsBody, origin: Vec2, dir: Vec2) -> Option<f32> {
    let m = origin - body.position;
    let c = m.length_sqr() - body.radius * body.radius;
    if c <= 0.0 {
        return None;
    }
    let b = m.dot(dir);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()).max(0.0))
}

/// Distance to the wall the ray leaves the boundary through.
fn ray_boundary(boundary: &Rect, origin: Vec2, dir: Vec2) -> Option<f32> {
    let tx = if dir.x > 0.0 {
        (boundary.right() - origin.x) / dir.x
    } else if dir.x < 0.0 {
        (boundary.x - origin.x) / dir.x
    } else {
        f32::INFINITY
    };
    let ty = if dir.y > 0.0 {
        (boundary.bottom() - origin.y) / dir.y
    } else if dir.y < 0.0 {
        (boundary.y - origin.y) / dir.y
    } else {
        f32::INFINITY
    };
    let t = tx.min(ty);
    t.is_finite().then(|| t.max(0.0))
}
