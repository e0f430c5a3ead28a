use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One range measurement folded into the certainty grid.
///
/// The origin is the sensor position rounded to grid coordinates; the angle
/// is in the grid (world) frame and may be any finite value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percept {
    pub x: i32,
    pub y: i32,
    pub angle: f32,
    pub distance: f32,
    /// True for an obstacle hit at the endpoint, false for a max-range pass.
    pub detected: bool,
}

/// A single beam measurement in the agent's local frame.
///
/// `distance <= 0.0` means nothing was hit within range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub distance: f32,
    pub angle: f32,
}

/// Output of the steering stage: a heading in [0, 2*pi) and a speed in
/// [0, v_max].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringCommand {
    pub angle: f32,
    pub speed: f32,
}

impl SteeringCommand {
    /// The degenerate command: stand still.
    pub fn hold() -> Self {
        Self {
            angle: 0.0,
            speed: 0.0,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.speed * self.angle.cos(), self.speed * self.angle.sin())
    }
}

impl Default for SteeringCommand {
    fn default() -> Self {
        Self::hold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_command_is_zero_velocity() {
        let cmd = SteeringCommand::hold();
        assert_eq!(cmd.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_velocity_decomposition() {
        let cmd = SteeringCommand {
            angle: std::f32::consts::FRAC_PI_2,
            speed: 2.0,
        };
        let v = cmd.velocity();
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 2.0).abs() < 1e-6);
    }
}
