//! Agent policies and their shared body plumbing.

pub mod patrol;
pub mod vfh;

pub use patrol::PatrolAgent;
pub use vfh::VfhAgent;

use glam::Vec2;

use crate::config::{AgentConfig, AgentKind, ShapeKind};
use crate::world::{BodyId, BodyKind, Fixture, Shape, World};

/// A policy driving one body. `step` runs one control tick; `delta_t` is
/// accepted for staggered-sensor simulation and currently unused.
pub trait Agent: Send {
    fn name(&self) -> &str;

    fn body(&self) -> BodyId;

    fn step(&mut self, world: &mut World, delta_t: f32);

    /// Whether the agent has reached its goal. `None` for policies without
    /// a terminal goal (a patrol shuttles forever).
    fn goal_reached(&self, world: &World) -> Option<bool> {
        let _ = world;
        None
    }

    /// Flush any buffered telemetry at the end of a run.
    fn finish(&mut self) {}
}

/// Build an agent from a validated config entry. Returns `None` (with a
/// log line) when a policy-mandatory key is missing.
pub fn from_config(config: &AgentConfig, world: &mut World) -> Option<Box<dyn Agent>> {
    match config.kind {
        AgentKind::Vfh => {
            VfhAgent::from_config(config, world).map(|agent| Box::new(agent) as Box<dyn Agent>)
        }
        AgentKind::Patrol => Some(Box::new(PatrolAgent::from_config(config, world))),
    }
}

/// Create the dynamic body and fixture an agent config describes.
fn spawn_body(world: &mut World, config: &AgentConfig) -> BodyId {
    let body = world.create_body(
        BodyKind::Dynamic,
        Vec2::new(config.x, config.y),
        config.theta,
    );
    let shape = match config.shape {
        ShapeKind::Circle => Shape::Circle {
            radius: config.radius,
        },
        ShapeKind::Box => Shape::Rect {
            half_width: config.width / 2.0,
            half_height: config.height / 2.0,
        },
    };
    world.attach_fixture(
        body,
        Fixture {
            shape,
            density: config.density,
        },
    );
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_spawn_body_places_fixture() {
        let config = SimConfig::parse(
            r#"
            [[agents]]
            type = "patrol"
            x = 2.0
            y = 3.0
            theta = 0.5
            shape = "box"
            width = 4.0
            height = 2.0
            density = 2.5
            "#,
        )
        .unwrap();

        let mut world = World::new();
        let body = spawn_body(&mut world, &config.agents[0]);

        let body = world.body(body);
        assert_eq!(body.position, Vec2::new(2.0, 3.0));
        assert_eq!(body.angle, 0.5);
        assert_eq!(body.fixtures().len(), 1);
        match body.fixtures()[0].shape {
            Shape::Rect {
                half_width,
                half_height,
            } => {
                assert_eq!(half_width, 2.0);
                assert_eq!(half_height, 1.0);
            }
            other => panic!("expected a rect fixture, got {:?}", other),
        }
        assert_eq!(body.fixtures()[0].density, 2.5);
    }

    #[test]
    fn test_from_config_builds_both_policies() {
        let config = SimConfig::parse(
            r#"
            [[agents]]
            name = "walker"
            type = "patrol"

            [[agents]]
            name = "seeker"
            type = "vfh"
            valley_threshold = 100.0
            grid = { width = 100 }
            sensor = { count = 8, range = 10.0 }
            goal = { x = 5.0, y = 0.0 }
            logging = false
            "#,
        )
        .unwrap();

        let mut world = World::new();
        let agents: Vec<_> = config
            .agents
            .iter()
            .filter_map(|entry| from_config(entry, &mut world))
            .collect();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].name(), "walker");
        assert_eq!(agents[1].name(), "seeker");
    }

    #[test]
    fn test_vfh_without_mandatory_tables_is_rejected() {
        let config = SimConfig::parse(
            r#"
            [[agents]]
            type = "vfh"
            "#,
        )
        .unwrap();

        let mut world = World::new();
        assert!(from_config(&config.agents[0], &mut world).is_none());
        assert_eq!(world.body_count(), 0, "no body may be left behind");
    }
}
