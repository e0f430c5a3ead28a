pub mod agent;
pub mod config;
pub mod error;
pub mod grid;
pub mod run;
pub mod sensor;
pub mod telemetry;
pub mod vfh;
pub mod world;

pub use agent::{Agent, PatrolAgent, VfhAgent};
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use grid::HistogramGrid;
pub use run::{run, RunReport};
pub use sensor::UltrasonicArray;
pub use telemetry::TelemetryLog;
pub use world::{Body, BodyId, BodyKind, Fixture, RayHit, Shape, World};
