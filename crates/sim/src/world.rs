use glam::Vec2;

/// Handle to a body owned by a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_width: f32, half_height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixture {
    pub shape: Shape,
    pub density: f32,
}

/// Rigid body state. The navigation core only reads the pose and writes the
/// velocities; everything else belongs to the world step.
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    fixtures: Vec<Fixture>,
}

impl Body {
    fn new(kind: BodyKind, position: Vec2, angle: f32) -> Self {
        Self {
            kind,
            position,
            angle,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            fixtures: Vec::new(),
        }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Transform a point from this body's local frame into the world frame.
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.angle)
    }

    /// Transform a world-frame point into this body's local frame.
    pub fn local_point(&self, world: Vec2) -> Vec2 {
        rotate(world - self.position, -self.angle)
    }
}

/// One fixture intersection reported during a raycast.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub body: BodyId,
    pub point: Vec2,
    pub normal: Vec2,
    pub fraction: f32,
}

/// A flat 2D rigid-body world: bodies with circle/rect fixtures, kinematic
/// velocity integration, and segment raycasts against every fixture.
#[derive(Debug, Default)]
pub struct World {
    bodies: Vec<Body>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_body(&mut self, kind: BodyKind, position: Vec2, angle: f32) -> BodyId {
        self.bodies.push(Body::new(kind, position, angle));
        BodyId(self.bodies.len() - 1)
    }

    pub fn attach_fixture(&mut self, id: BodyId, fixture: Fixture) {
        self.bodies[id.0].fixtures.push(fixture);
    }

    pub fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }

    pub fn body_mut(&mut self, id: BodyId) -> &mut Body {
        &mut self.bodies[id.0]
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn set_linear_velocity(&mut self, id: BodyId, velocity: Vec2) {
        self.bodies[id.0].linear_velocity = velocity;
    }

    pub fn set_angular_velocity(&mut self, id: BodyId, omega: f32) {
        self.bodies[id.0].angular_velocity = omega;
    }

    /// Advance every dynamic body one step of kinematic integration.
    pub fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            if body.kind == BodyKind::Dynamic {
                body.position += body.linear_velocity * dt;
                body.angle += body.angular_velocity * dt;
            }
        }
    }

    /// Cast the segment p1..p2 against every fixture, invoking `callback`
    /// once per intersection in body order. The callback's return value
    /// controls the scan: anything <= 0 stops it, anything else continues,
    /// so a callback that always returns 1.0 sees every hit.
    pub fn raycast<F>(&self, p1: Vec2, p2: Vec2, mut callback: F)
    where
        F: FnMut(RayHit) -> f32,
    {
        let dir = p2 - p1;
        for (index, body) in self.bodies.iter().enumerate() {
            for fixture in &body.fixtures {
                let hit = match fixture.shape {
                    Shape::Circle { radius } => ray_circle(p1, dir, body.position, radius),
                    Shape::Rect {
                        half_width,
                        half_height,
                    } => ray_rect(p1, dir, body, half_width, half_height),
                };
                if let Some((fraction, normal)) = hit {
                    let report = callback(RayHit {
                        body: BodyId(index),
                        point: p1 + dir * fraction,
                        normal,
                        fraction,
                    });
                    if report <= 0.0 {
                        return;
                    }
                }
            }
        }
    }
}

fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Nearest entering intersection of the segment o + t*d, t in [0, 1], with a
/// circle. Rays starting inside the circle report no hit.
fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<(f32, Vec2)> {
    let m = origin - center;
    let a = dir.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * m.dot(dir);
    let c = m.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let normal = (m + dir * t).normalize_or_zero();
    Some((t, normal))
}

/// Slab test against a rect fixture in the body's local frame. Rays starting
/// inside the rect report no hit.
fn ray_rect(origin: Vec2, dir: Vec2, body: &Body, hw: f32, hh: f32) -> Option<(f32, Vec2)> {
    let o = body.local_point(origin);
    let d = rotate(dir, -body.angle);

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut entry_normal = Vec2::ZERO;

    for (axis, half) in [(0usize, hw), (1usize, hh)] {
        let (o_a, d_a) = if axis == 0 { (o.x, d.x) } else { (o.y, d.y) };
        if d_a.abs() <= f32::EPSILON {
            if o_a.abs() > half {
                return None;
            }
            continue;
        }
        let mut t1 = (-half - o_a) / d_a;
        let mut t2 = (half - o_a) / d_a;
        // The entry face is the one the ray direction points away from.
        let axis_normal = if axis == 0 {
            Vec2::new(-d_a.signum(), 0.0)
        } else {
            Vec2::new(0.0, -d_a.signum())
        };
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_min {
            t_min = t1;
            entry_normal = axis_normal;
        }
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    if !(0.0..=1.0).contains(&t_min) {
        return None;
    }
    Some((t_min, rotate(entry_normal, body.angle)))
}
