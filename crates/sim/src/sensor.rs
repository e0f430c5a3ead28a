//! Ultrasonic range sensor ring over the physics world.

use glam::Vec2;
use vfh_shared::SensorReading;

use crate::world::{BodyId, World};

#[derive(Debug, Clone, Copy)]
struct Beam {
    relative_angle: f32,
    local_endpoint: Vec2,
}

/// A fixed ring of `n` range beams mounted on one body, fired round-robin.
///
/// Beam `i` points at `2*pi*i/n` in the body's local frame. A reading with
/// `distance <= 0.0` means nothing was hit within range.
#[derive(Debug)]
pub struct UltrasonicArray {
    beams: Vec<Beam>,
    active_beam: usize,
    body: BodyId,
    max_range: f32,
}

impl UltrasonicArray {
    pub fn new(beam_count: usize, max_range: f32, body: BodyId) -> Self {
        let beams = (0..beam_count)
            .map(|i| {
                let relative_angle =
                    std::f32::consts::TAU * i as f32 / beam_count as f32;
                Beam {
                    relative_angle,
                    local_endpoint: Vec2::new(
                        relative_angle.cos() * max_range,
                        relative_angle.sin() * max_range,
                    ),
                }
            })
            .collect();
        Self {
            beams,
            active_beam: 0,
            body,
            max_range,
        }
    }

    #[inline]
    pub fn beam_count(&self) -> usize {
        self.beams.len()
    }

    #[inline]
    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    /// Fire the next beam in the ring and report the closest hit, measured
    /// in the body's local frame. Fixtures of the emitting body are skipped;
    /// the scan keeps going past every hit so the minimum wins.
    pub fn sense_one(&mut self, world: &World) -> SensorReading {
        let beam = self.beams[self.active_beam];
        self.active_beam = (self.active_beam + 1) % self.beams.len();

        let body = world.body(self.body);
        let endpoint = body.world_point(beam.local_endpoint);

        let own_body = self.body;
        let mut min_distance = f32::INFINITY;
        world.raycast(body.position, endpoint, |hit| {
            if hit.body != own_body {
                min_distance = min_distance.min(body.local_point(hit.point).length());
            }
            1.0
        });

        SensorReading {
            distance: if min_distance.is_finite() {
                min_distance
            } else {
                0.0
            },
            angle: beam.relative_angle,
        }
    }

    /// Fire every beam once, in index order, reusing `readings`.
    pub fn sense_all_into(&mut self, world: &World, readings: &mut Vec<SensorReading>) {
        readings.clear();
        for _ in 0..self.beams.len() {
            readings.push(self.sense_one(world));
        }
    }

    /// Fire every beam once and collect the readings in index order.
    pub fn sense_all(&mut self, world: &World) -> Vec<SensorReading> {
        let mut readings = Vec::with_capacity(self.beams.len());
        self.sense_all_into(world, &mut readings);
        readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BodyKind, Fixture, Shape};

    fn circle_fixture(radius: f32) -> Fixture {
        Fixture {
            shape: Shape::Circle { radius },
            density: 1.0,
        }
    }

    fn world_with_agent() -> (World, BodyId) {
        let mut world = World::new();
        let agent = world.create_body(BodyKind::Static, Vec2::ZERO, 0.0);
        world.attach_fixture(agent, circle_fixture(0.1));
        (world, agent)
    }

    #[test]
    fn test_single_beam_empty_world() {
        let (world, agent) = world_with_agent();
        let mut sensor = UltrasonicArray::new(1, 5.0, agent);

        let reading = sensor.sense_one(&world);
        assert_eq!(reading.angle, 0.0);
        assert_eq!(reading.distance, 0.0);

        // Round-robin wraps on a single beam.
        let reading = sensor.sense_one(&world);
        assert_eq!(reading.angle, 0.0);
        assert_eq!(reading.distance, 0.0);

        let readings = sensor.sense_all(&world);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].angle, 0.0);
        assert_eq!(readings[0].distance, 0.0);
    }

    #[test]
    fn test_beam_angles_are_evenly_spaced() {
        let (world, agent) = world_with_agent();
        let mut sensor = UltrasonicArray::new(10, 1.0, agent);

        for i in 0..10 {
            let reading = sensor.sense_one(&world);
            let expected = i as f32 * std::f32::consts::TAU / 10.0;
            assert!(
                (reading.angle - expected).abs() < 1e-5,
                "beam {} angle {} != {}",
                i,
                reading.angle,
                expected
            );
            assert_eq!(reading.distance, 0.0);
        }

        let readings = sensor.sense_all(&world);
        assert_eq!(readings.len(), 10);
        for (i, reading) in readings.iter().enumerate() {
            let expected = i as f32 * std::f32::consts::TAU / 10.0;
            assert!((reading.angle - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_raycasts_report_local_hit_distance() {
        let (mut world, agent) = world_with_agent();

        // Detected at (1, 0).
        let near = world.create_body(BodyKind::Static, Vec2::new(2.0, 0.0), 0.0);
        world.attach_fixture(near, circle_fixture(1.0));

        // Detected at (0, 5).
        let above = world.create_body(BodyKind::Static, Vec2::new(0.0, 6.0), 0.0);
        world.attach_fixture(above, circle_fixture(1.0));

        // Just outside the 10-unit range.
        let far = world.create_body(BodyKind::Static, Vec2::new(-11.001, 0.0), 0.0);
        world.attach_fixture(far, circle_fixture(1.0));

        let mut sensor = UltrasonicArray::new(4, 10.0, agent);

        let reading = sensor.sense_one(&world);
        assert_eq!(reading.angle, 0.0);
        assert!((reading.distance - 1.0).abs() < 1e-3);

        let reading = sensor.sense_one(&world);
        assert!((reading.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((reading.distance - 5.0).abs() < 1e-3);

        let reading = sensor.sense_one(&world);
        assert!((reading.angle - std::f32::consts::PI).abs() < 1e-5);
        assert_eq!(reading.distance, 0.0);

        let reading = sensor.sense_one(&world);
        assert!((reading.angle - 3.0 * std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(reading.distance, 0.0);
    }

    #[test]
    fn test_round_robin_index_carries_across_calls() {
        let (world, agent) = world_with_agent();
        let mut sensor = UltrasonicArray::new(4, 5.0, agent);

        // One single shot leaves the ring pointing at beam 1, so a full
        // sweep starts there and wraps.
        let first = sensor.sense_one(&world);
        assert_eq!(first.angle, 0.0);

        let readings = sensor.sense_all(&world);
        assert_eq!(readings.len(), 4);
        assert!((readings[0].angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((readings[3].angle - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_own_fixtures_are_ignored() {
        let mut world = World::new();
        let agent = world.create_body(BodyKind::Static, Vec2::ZERO, 0.0);
        world.attach_fixture(agent, circle_fixture(2.0));

        let mut sensor = UltrasonicArray::new(4, 10.0, agent);
        for _ in 0..4 {
            assert_eq!(sensor.sense_one(&world).distance, 0.0);
        }
    }

    #[test]
    fn test_rotated_body_senses_in_local_frame() {
        let mut world = World::new();
        // Body facing +y: its 0-radian beam points along world +y.
        let agent = world.create_body(
            BodyKind::Static,
            Vec2::ZERO,
            std::f32::consts::FRAC_PI_2,
        );
        world.attach_fixture(agent, circle_fixture(0.1));

        let ahead = world.create_body(BodyKind::Static, Vec2::new(0.0, 3.0), 0.0);
        world.attach_fixture(ahead, circle_fixture(1.0));

        let mut sensor = UltrasonicArray::new(1, 10.0, agent);
        let reading = sensor.sense_one(&world);
        assert_eq!(reading.angle, 0.0);
        assert!((reading.distance - 2.0).abs() < 1e-3);
    }
}
