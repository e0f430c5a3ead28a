//! Error type for the simulation boundary.

use thiserror::Error;

/// Errors surfaced while loading a run configuration. Core navigation
/// operations never fail with an error; they signal boundary conditions
/// with `Option`/`bool` returns instead.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
