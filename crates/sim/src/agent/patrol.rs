//! A two-waypoint patrol: shuttle between the spawn point and a waypoint,
//! flipping direction whenever the current target is within tolerance.

use glam::Vec2;

use super::{spawn_body, Agent};
use crate::config::AgentConfig;
use crate::world::{BodyId, World};

pub struct PatrolAgent {
    name: String,
    body: BodyId,
    waypoint_a: Vec2,
    waypoint_b: Vec2,
    speed: f32,
    tolerance: f32,
    reverse: bool,
}

impl PatrolAgent {
    pub fn from_config(config: &AgentConfig, world: &mut World) -> Self {
        let body = spawn_body(world, config);
        let waypoint = config.waypoint.unwrap_or_default();
        Self {
            name: config.name.clone(),
            body,
            waypoint_a: Vec2::new(config.x, config.y),
            waypoint_b: Vec2::new(waypoint.x, waypoint.y),
            speed: config.speed,
            tolerance: config.goal_tolerance,
            reverse: false,
        }
    }

    fn current_target(&self) -> Vec2 {
        if self.reverse {
            self.waypoint_a
        } else {
            self.waypoint_b
        }
    }
}

impl Agent for PatrolAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn body(&self) -> BodyId {
        self.body
    }

    fn step(&mut self, world: &mut World, _delta_t: f32) {
        let mut goal = world.body(self.body).local_point(self.current_target());
        if goal.length() < self.tolerance {
            self.reverse = !self.reverse;
            goal = world.body(self.body).local_point(self.current_target());
        }

        let velocity = goal.normalize_or_zero() * self.speed;
        world.set_linear_velocity(self.body, velocity);
        world.set_angular_velocity(self.body, 0.0);
    }
}
