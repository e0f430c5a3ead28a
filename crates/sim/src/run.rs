//! Headless run driver: build a world from a config, then step agents and
//! physics in lockstep until the goals are met or the tick budget runs out.

use glam::Vec2;
use tracing::info;

use crate::agent::{self, Agent};
use crate::config::{ObstacleConfig, ShapeKind, SimConfig};
use crate::world::{BodyKind, Fixture, Shape, World};

/// Final state of one agent after a run.
#[derive(Debug, Clone)]
pub struct AgentReport {
    pub name: String,
    pub position: Vec2,
    /// `None` for agents without a terminal goal.
    pub goal_reached: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub ticks: u32,
    pub agents: Vec<AgentReport>,
}

/// Build the world and the agent roster a config describes. Config entries
/// that fail policy validation are dropped (already logged).
pub fn build(config: &SimConfig) -> (World, Vec<Box<dyn Agent>>) {
    let mut world = World::new();

    for obstacle in &config.obstacles {
        spawn_obstacle(&mut world, obstacle);
    }

    let agents: Vec<_> = config
        .agents
        .iter()
        .filter_map(|entry| agent::from_config(entry, &mut world))
        .collect();

    (world, agents)
}

fn spawn_obstacle(world: &mut World, obstacle: &ObstacleConfig) {
    let body = world.create_body(
        BodyKind::Static,
        Vec2::new(obstacle.x, obstacle.y),
        obstacle.theta,
    );
    let shape = match obstacle.shape {
        ShapeKind::Circle => Shape::Circle {
            radius: obstacle.radius,
        },
        ShapeKind::Box => Shape::Rect {
            half_width: obstacle.width / 2.0,
            half_height: obstacle.height / 2.0,
        },
    };
    world.attach_fixture(
        body,
        Fixture {
            shape,
            density: 1.0,
        },
    );
}

/// Run the configured simulation to completion. Each tick every agent
/// senses and commands its velocity, then the world integrates one step.
/// The run ends early once every goal-seeking agent reports its goal
/// reached.
pub fn run(config: &SimConfig) -> RunReport {
    let (mut world, mut agents) = build(config);
    let dt = config.world.dt;

    let mut ticks = 0;
    for _ in 0..config.world.ticks {
        for agent in &mut agents {
            agent.step(&mut world, dt);
        }
        world.step(dt);
        ticks += 1;

        let goals: Vec<bool> = agents
            .iter()
            .filter_map(|agent| agent.goal_reached(&world))
            .collect();
        if !goals.is_empty() && goals.iter().all(|&reached| reached) {
            info!(ticks, "all goals reached");
            break;
        }
    }

    for agent in &mut agents {
        agent.finish();
    }

    let reports = agents
        .iter()
        .map(|agent| AgentReport {
            name: agent.name().to_string(),
            position: world.body(agent.body()).position,
            goal_reached: agent.goal_reached(&world),
        })
        .collect();

    RunReport {
        ticks,
        agents: reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_spawns_obstacles_and_agents() {
        let config = SimConfig::parse(
            r#"
            [[agents]]
            type = "patrol"
            waypoint = { x = 3.0, y = 0.0 }

            [[obstacles]]
            shape = "circle"
            x = 5.0
            radius = 2.0
            "#,
        )
        .unwrap();

        let (world, agents) = build(&config);
        assert_eq!(agents.len(), 1);
        // obstacle body + agent body
        assert_eq!(world.body_count(), 2);
    }

    #[test]
    fn test_run_reaches_goal_and_stops_early() {
        let config = SimConfig::parse(
            r#"
            [world]
            ticks = 2000
            dt = 0.05

            [[agents]]
            name = "seeker"
            type = "vfh"
            radius = 0.3
            valley_threshold = 10000.0
            speed = 1.0
            grid = { width = 200 }
            sensor = { count = 8, range = 10.0 }
            goal = { x = 5.0, y = 0.0 }
            logging = false
            "#,
        )
        .unwrap();

        let report = run(&config);
        assert!(report.ticks < 2000, "empty world goal should be reached early");
        assert_eq!(report.agents[0].goal_reached, Some(true));
        assert!((report.agents[0].position.x - 5.0).abs() < 0.2);
    }

    #[test]
    fn test_run_without_goal_seekers_uses_full_budget() {
        let config = SimConfig::parse(
            r#"
            [world]
            ticks = 50

            [[agents]]
            type = "patrol"
            waypoint = { x = 3.0, y = 0.0 }
            "#,
        )
        .unwrap();

        let report = run(&config);
        assert_eq!(report.ticks, 50);
        assert_eq!(report.agents[0].goal_reached, None);
    }
}
