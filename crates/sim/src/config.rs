//! Run configuration: a TOML document with a `[world]` table, an
//! `[[agents]]` array and an optional `[[obstacles]]` array.
//!
//! Agent entries are deserialized one by one so a single malformed entry is
//! logged and skipped instead of failing the whole file.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use vfh_shared::{
    DEFAULT_DENSITY, DEFAULT_DT, DEFAULT_GOAL_TOLERANCE, DEFAULT_MAX_TICKS, DEFAULT_SPEED,
};

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    world: WorldConfig,
    #[serde(default)]
    agents: Vec<toml::Value>,
    #[serde(default)]
    obstacles: Vec<ObstacleConfig>,
}

/// Fully parsed run configuration. `agents` holds only the entries that
/// deserialized cleanly.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub agents: Vec<AgentConfig>,
    pub obstacles: Vec<ObstacleConfig>,
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents)?;

        let mut agents = Vec::new();
        for value in raw.agents {
            let name = value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("<name missing>")
                .to_string();
            match value.try_into::<AgentConfig>() {
                Ok(agent) => agents.push(agent),
                Err(err) => warn!(agent = %name, error = %err, "skipping invalid agent entry"),
            }
        }

        Ok(Self {
            world: raw.world,
            agents,
            obstacles: raw.obstacles,
        })
    }
}

/// `[world]` table: fixed-step timing for the headless driver.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WorldConfig {
    /// Maximum ticks to run before giving up on the goals.
    #[serde(default = "default_max_ticks")]
    pub ticks: u32,
    /// Fixed physics step in seconds.
    #[serde(default = "default_dt")]
    pub dt: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ticks: default_max_ticks(),
            dt: default_dt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Vfh,
    Patrol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Box,
}

/// One `[[agents]]` entry. Pose, body geometry and policy parameters are
/// flat keys; grid/sensor/goal/waypoint are nested tables. Keys mandatory
/// for a policy are validated at spawn time so a patrol entry does not need
/// a sensor table.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AgentKind,

    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub theta: f32,

    #[serde(default = "default_shape")]
    pub shape: ShapeKind,
    #[serde(default = "default_extent")]
    pub radius: f32,
    #[serde(default = "default_extent")]
    pub width: f32,
    #[serde(default = "default_extent")]
    pub height: f32,
    #[serde(default = "default_density")]
    pub density: f32,

    pub grid: Option<GridConfig>,
    pub sensor: Option<SensorConfig>,
    pub goal: Option<PointConfig>,
    pub waypoint: Option<PointConfig>,

    pub valley_threshold: Option<f32>,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_goal_tolerance")]
    pub goal_tolerance: f32,
    #[serde(default = "default_logging")]
    pub logging: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GridConfig {
    /// Grid side length in cells, used for both width and height.
    pub width: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SensorConfig {
    pub count: u32,
    pub range: f32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PointConfig {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// One `[[obstacles]]` entry: a static body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ObstacleConfig {
    #[serde(default = "default_obstacle_shape")]
    pub shape: ShapeKind,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub theta: f32,
    #[serde(default = "default_extent")]
    pub radius: f32,
    #[serde(default = "default_extent")]
    pub width: f32,
    #[serde(default = "default_extent")]
    pub height: f32,
}

fn default_max_ticks() -> u32 {
    DEFAULT_MAX_TICKS
}

fn default_dt() -> f32 {
    DEFAULT_DT
}

fn default_agent_name() -> String {
    "agent".to_string()
}

fn default_shape() -> ShapeKind {
    ShapeKind::Circle
}

fn default_obstacle_shape() -> ShapeKind {
    ShapeKind::Box
}

fn default_extent() -> f32 {
    1.0
}

fn default_density() -> f32 {
    DEFAULT_DENSITY
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_goal_tolerance() -> f32 {
    DEFAULT_GOAL_TOLERANCE
}

fn default_logging() -> bool {
    true
}
