// arena/physics.rs
use super::vector::{EPSILON, Rect, Vec2};

pub const MAX_PHYSICS_BODIES: usize = 16;
const MAX_RESOLVER_ITERATIONS: usize = 32;

/// A circle. Bodies carry no momentum; whoever moves them sets `position`
/// and the world pushes them apart on the next step.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub position: Vec2,
    pub radius: f32,
}

impl PhysicsBody {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self { position, radius }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsWorld {
    pub boundary: Rect,
    bodies: Vec<PhysicsBody>,
}

impl PhysicsWorld {
    pub fn new(boundary: Rect) -> Self {
        Self { boundary, bodies: Vec::new() }
    }

    /// Adds a body and returns its index, or `None` once the world is full.
    pub fn add_body(&mut self, body: PhysicsBody) -> Option<usize> {
        if self.bodies.len() >= MAX_PHYSICS_BODIES {
            return None;
        }
        self.bodies.push(body);
        Some(self.bodies.len() - 1)
    }

    #[inline]
    pub fn bodies(&self) -> &[PhysicsBody] {
        &self.bodies
    }

    #[inline]
    pub fn body(&self, index: usize) -> Option<&PhysicsBody> {
        self.bodies.get(index)
    }

    #[inline]
    pub fn body_mut(&mut self, index: usize) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(index)
    }

    /// Resolves boundary and body overlaps. `_dt` is unused until bodies get momentum.
    pub fn step(&mut self, _dt: f32) {
        let boundary = self.boundary;
        for body in &mut self.bodies {
            if let Some(pen) = boundary_penetration(body, &boundary) {
                body.position -= pen;
            }
        }

        let n = self.bodies.len();
        for _ in 0..MAX_RESOLVER_ITERATIONS {
            let mut found = false;
            for i in 0..n {
                for j in i + 1..n {
                    let (mut a, mut b) = (self.bodies[i], self.bodies[j]);
                    let Some(pen) = body_penetration(&a, &b) else { continue };
                    found = true;

                    let half = pen.scale(0.5);
                    a.position -= half;
                    b.position += half;

                    // shift the pair together if either one was pushed into a wall
                    if let Some(p) = boundary_penetration(&a, &boundary) {
                        a.position -= p;
                        b.position -= p;
                    }
                    if let Some(p) = boundary_penetration(&b, &boundary) {
                        a.position -= p;
                        b.position -= p;
                    }

                    self.bodies[i] = a;
                    self.bodies[j] = b;
                }
            }
            if !found {
                break;
            }
        }
    }
}

/// How far `body` sticks out of `boundary` on each axis, padded by [`EPSILON`].
pub fn boundary_penetration(body: &PhysicsBody, boundary: &Rect) -> Option<Vec2> {
    let p = body.position;
    let r = body.radius;
    let mut pen = Vec2::ZERO;
    let mut hit = false;

    if p.x - r < boundary.x {
        hit = true;
        pen.x = p.x - r - boundary.x - EPSILON;
    } else if p.x + r > boundary.right() {
        hit = true;
        pen.x = p.x + r - boundary.right() + EPSILON;
    }

    if p.y - r < boundary.y {
        hit = true;
        pen.y = p.y - r - boundary.y - EPSILON;
    } else if p.y + r > boundary.bottom() {
        hit = true;
        pen.y = p.y + r - boundary.bottom() + EPSILON;
    }

    hit.then_some(pen)
}

/// How far `a` penetrates into `b`, pointing from `a` towards `b`.
pub fn body_penetration(a: &PhysicsBody, b: &PhysicsBody) -> Option<Vec2> {
    let delta = b.position - a.position;
    let radii = a.radius + b.radius;
    let dist_sqr = delta.length_sqr();
    if dist_sqr >= radii * radii {
        return None;
    }
    let dist = dist_sqr.sqrt();
    let normal = if dist > EPSILON { delta.scale(1.0 / dist) } else { Vec2::new(1.0, 0.0) };
    Some(normal.scale(radii - dist + EPSILON))
}
