//! The VFH obstacle-avoidance agent.
//!
//! Per control tick: sweep the sensor ring into the certainty grid, pull the
//! active window around the agent, build and smooth the polar histogram,
//! steer through the nearest valley toward the goal, and command the body
//! velocity. Boundary failures hold position instead of erroring.

use glam::Vec2;
use tracing::{debug, warn};

use vfh_shared::{Percept, SensorReading, WINDOW_SIZE};

use super::{spawn_body, Agent};
use crate::config::AgentConfig;
use crate::grid::HistogramGrid;
use crate::sensor::UltrasonicArray;
use crate::telemetry::TelemetryLog;
use crate::vfh::{build_polar_histogram, select_steering, smooth_polar_histogram, target_sector};
use crate::world::{BodyId, World};

pub struct VfhAgent {
    name: String,
    body: BodyId,
    grid: HistogramGrid,
    sensors: UltrasonicArray,
    goal: Vec2,
    valley_threshold: f32,
    max_speed: f32,
    goal_tolerance: f32,
    telemetry: Option<TelemetryLog>,
    // per-tick scratch, reused to keep the hot path allocation-free
    readings: Vec<SensorReading>,
    window: Vec<u8>,
}

impl VfhAgent {
    /// Build from a config entry. The grid, sensor and valley threshold
    /// keys are mandatory; a missing one logs and rejects the entry.
    pub fn from_config(config: &AgentConfig, world: &mut World) -> Option<Self> {
        let Some(grid) = config.grid else {
            warn!(agent = %config.name, "vfh agent missing mandatory [agents.grid] table");
            return None;
        };
        let Some(sensor) = config.sensor else {
            warn!(agent = %config.name, "vfh agent missing mandatory [agents.sensor] table");
            return None;
        };
        let Some(valley_threshold) = config.valley_threshold else {
            warn!(agent = %config.name, "vfh agent missing mandatory valley_threshold");
            return None;
        };

        let body = spawn_body(world, config);
        let goal = config.goal.unwrap_or_default();
        let side = grid.width as usize;
        let beam_count = sensor.count as usize;

        Some(Self {
            name: config.name.clone(),
            body,
            grid: HistogramGrid::new(side, side),
            sensors: UltrasonicArray::new(beam_count, sensor.range, body),
            goal: Vec2::new(goal.x, goal.y),
            valley_threshold,
            max_speed: config.speed,
            goal_tolerance: config.goal_tolerance,
            telemetry: config.logging.then(|| TelemetryLog::for_agent(&config.name)),
            readings: Vec::with_capacity(beam_count),
            window: Vec::with_capacity(WINDOW_SIZE * WINDOW_SIZE),
        })
    }

    pub fn grid(&self) -> &HistogramGrid {
        &self.grid
    }

    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    pub fn telemetry(&self) -> Option<&TelemetryLog> {
        self.telemetry.as_ref()
    }

    fn hold_position(&self, world: &mut World) {
        world.set_linear_velocity(self.body, Vec2::ZERO);
        world.set_angular_velocity(self.body, 0.0);
    }
}

impl Agent for VfhAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn body(&self) -> BodyId {
        self.body
    }

    fn step(&mut self, world: &mut World, _delta_t: f32) {
        let (position, heading) = {
            let body = world.body(self.body);
            (body.position, body.angle)
        };
        let origin_x = position.x.round() as i32;
        let origin_y = position.y.round() as i32;

        // Full sweep folded into the grid. A reading <= 0 is a max-range
        // pass: the ray still clears transit cells and erodes the endpoint.
        self.sensors.sense_all_into(world, &mut self.readings);
        let max_range = self.sensors.max_range();
        for reading in &self.readings {
            let detected = reading.distance > 0.0;
            self.grid.add_percept(Percept {
                x: origin_x,
                y: origin_y,
                angle: heading + reading.angle,
                distance: if detected { reading.distance } else { max_range },
                detected,
            });
        }

        if let Some(log) = &mut self.telemetry {
            log.record_grid(&self.grid);
        }

        // Active window; too close to the grid edge means hold position.
        if !self.grid.copy_window_into(
            WINDOW_SIZE,
            WINDOW_SIZE,
            origin_x,
            origin_y,
            &mut self.window,
        ) {
            debug!(agent = %self.name, origin_x, origin_y, "active window outside grid, holding");
            self.hold_position(world);
            return;
        }

        let histogram = build_polar_histogram(&self.window, WINDOW_SIZE);
        let smoothed = smooth_polar_histogram(&histogram);

        let goal_local = world.body(self.body).local_point(self.goal);
        let target = target_sector(goal_local);
        let command = select_steering(&smoothed, target, self.valley_threshold, self.max_speed);

        if let Some(log) = &mut self.telemetry {
            log.record_tick(&smoothed, &self.window, command, position);
        }

        world.set_linear_velocity(self.body, command.velocity());
        world.set_angular_velocity(self.body, 0.0);
    }

    fn goal_reached(&self, world: &World) -> Option<bool> {
        let position = world.body(self.body).position;
        Some(position.distance(self.goal) <= self.goal_tolerance)
    }

    fn finish(&mut self) {
        if let Some(log) = &self.telemetry {
            match log.flush() {
                Ok(()) => debug!(agent = %self.name, path = %log.path().display(), "telemetry archive written"),
                Err(err) => warn!(agent = %self.name, error = %err, "failed to write telemetry archive"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::world::{BodyKind, Fixture, Shape};

    fn vfh_config(goal_x: f32, goal_y: f32) -> AgentConfig {
        let toml = format!(
            r#"
            [[agents]]
            name = "seeker"
            type = "vfh"
            radius = 0.3
            valley_threshold = 10000.0
            speed = 1.0
            grid = {{ width = 100 }}
            sensor = {{ count = 8, range = 10.0 }}
            goal = {{ x = {goal_x}, y = {goal_y} }}
            logging = false
            "#
        );
        SimConfig::parse(&toml).unwrap().agents.remove(0)
    }

    #[test]
    fn test_empty_world_drives_straight_at_goal() {
        let mut world = World::new();
        let mut agent = VfhAgent::from_config(&vfh_config(25.0, 0.0), &mut world).unwrap();

        agent.step(&mut world, 1.0 / 60.0);

        let velocity = world.body(agent.body()).linear_velocity;
        assert!((velocity.x - 1.0).abs() < 1e-4, "vx = {}", velocity.x);
        assert!(velocity.y.abs() < 1e-4, "vy = {}", velocity.y);
    }

    #[test]
    fn test_obstacle_hit_is_integrated_into_grid() {
        let mut world = World::new();
        let mut agent = VfhAgent::from_config(&vfh_config(25.0, 0.0), &mut world).unwrap();

        let wall = world.create_body(BodyKind::Static, Vec2::new(4.0, 0.0), 0.0);
        world.attach_fixture(
            wall,
            Fixture {
                shape: Shape::Circle { radius: 1.0 },
                density: 1.0,
            },
        );

        agent.step(&mut world, 1.0 / 60.0);

        // The 0-radian beam hits at distance 3; that cell gains evidence.
        assert_eq!(agent.grid().at(3, 0), Some(3));
    }

    #[test]
    fn test_near_grid_edge_holds_position() {
        let mut world = World::new();
        let mut config = vfh_config(0.0, 0.0);
        config.x = 45.0; // x_max - 5 on a 100-cell grid
        let mut agent = VfhAgent::from_config(&config, &mut world).unwrap();

        world.set_linear_velocity(agent.body(), Vec2::new(1.0, 1.0));
        agent.step(&mut world, 1.0 / 60.0);

        let body = world.body(agent.body());
        assert_eq!(body.linear_velocity, Vec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn test_goal_reached_uses_tolerance() {
        let mut world = World::new();
        let agent = VfhAgent::from_config(&vfh_config(0.05, 0.0), &mut world).unwrap();
        assert_eq!(agent.goal_reached(&world), Some(true));

        let mut world = World::new();
        let agent = VfhAgent::from_config(&vfh_config(5.0, 0.0), &mut world).unwrap();
        assert_eq!(agent.goal_reached(&world), Some(false));
    }
}
