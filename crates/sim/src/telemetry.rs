//! Per-agent telemetry archive.
//!
//! When logging is enabled each VFH agent appends one record per control
//! tick: the smoothed polar histogram, the active window, and a packed
//! motion row. The archive also keeps the most recent full-grid snapshot.
//! Everything is flushed as one JSON document to `<tmp>/<name>/log.json`.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Serialize;

use vfh_shared::SteeringCommand;

use crate::grid::HistogramGrid;
use crate::vfh::PolarHistogram;

#[derive(Debug, Serialize)]
pub struct TelemetryLog {
    #[serde(skip)]
    path: PathBuf,

    /// One row of K sector densities per tick.
    polar_histogram: Vec<Vec<f32>>,
    /// One row of WINDOW_SIZE^2 certainty values per tick.
    window_histogram: Vec<Vec<u8>>,
    /// Latest snapshot of the whole grid, row-major.
    full_histogram: Vec<u8>,
    /// One `[angle, speed, x, y]` row per tick.
    packed_motion: Vec<[f32; 4]>,
    /// Legend for the packed motion rows.
    motion_rows: [&'static str; 4],
}

impl TelemetryLog {
    /// Archive for the named agent under the system temp directory.
    pub fn for_agent(name: &str) -> Self {
        Self::at_path(std::env::temp_dir().join(name).join("log.json"))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            polar_histogram: Vec::new(),
            window_histogram: Vec::new(),
            full_histogram: Vec::new(),
            packed_motion: Vec::new(),
            motion_rows: ["angle", "speed", "x", "y"],
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of ticks recorded so far.
    pub fn ticks(&self) -> usize {
        self.packed_motion.len()
    }

    pub fn record_grid(&mut self, grid: &HistogramGrid) {
        self.full_histogram.clear();
        self.full_histogram.extend_from_slice(grid.data());
    }

    pub fn record_tick(
        &mut self,
        histogram: &PolarHistogram,
        window: &[u8],
        command: SteeringCommand,
        position: Vec2,
    ) {
        self.polar_histogram.push(histogram.to_vec());
        self.window_histogram.push(window.to_vec());
        self.packed_motion
            .push([command.angle, command.speed, position.x, position.y]);
    }

    /// Write the archive to disk, creating the parent directory if needed.
    pub fn flush(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, json)
    }
}
