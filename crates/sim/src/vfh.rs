//! The two-stage VFH pipeline: polar obstacle histogram construction,
//! triangular smoothing, and valley-based steering selection.
//!
//! All functions here are pure transformations over buffers; the agent layer
//! owns the grid and the world access.

use glam::Vec2;
use vfh_shared::{
    SteeringCommand, MAX_VALLEY_SECTORS, SECTOR_COUNT, SECTOR_WIDTH, SMOOTH_HALF_WIDTH,
    SPEED_MARGIN, VECTOR_INTERCEPT, VECTOR_SLOPE,
};

pub type PolarHistogram = [f32; SECTOR_COUNT];

/// Normalize an angle to [0, 2*pi).
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Sector index of an angle: round(angle / alpha) mod K.
#[inline]
pub fn sector_of(angle: f32) -> usize {
    (normalize_angle(angle) / SECTOR_WIDTH).round() as usize % SECTOR_COUNT
}

/// The sector the goal direction falls in, from the goal position in the
/// agent's local frame.
pub fn target_sector(goal_local: Vec2) -> usize {
    sector_of(goal_local.y.atan2(goal_local.x))
}

/// Build the K-sector obstacle density histogram from a square active
/// window of certainty values (row-major, side `size`, agent at the
/// center cell).
pub fn build_polar_histogram(window: &[u8], size: usize) -> PolarHistogram {
    debug_assert_eq!(window.len(), size * size);

    let offset = if size % 2 == 1 { 0 } else { 1 };
    let half = (size / 2) as i32;

    let mut histogram = [0.0f32; SECTOR_COUNT];
    for i in 0..size {
        for j in 0..size {
            let x = offset + j as i32 - half;
            let y = offset + i as i32 - half;
            if x == 0 && y == 0 {
                continue;
            }

            let cv = f32::from(window[i * size + j]);
            if cv == 0.0 {
                continue;
            }

            let beta = (y as f32).atan2(x as f32);
            let distance = ((x * x + y * y) as f32).sqrt();
            let magnitude = cv * cv * (VECTOR_INTERCEPT - VECTOR_SLOPE * distance);
            histogram[sector_of(beta)] += magnitude;
        }
    }
    histogram
}

/// Smooth with a symmetric triangular kernel of half-width L:
/// H'[i] = sum_l H[(i+l) mod K] * (1 + L - |l|) / (2L + 1).
pub fn smooth_polar_histogram(histogram: &PolarHistogram) -> PolarHistogram {
    const K: i32 = SECTOR_COUNT as i32;
    const L: i32 = SMOOTH_HALF_WIDTH as i32;

    let mut smoothed = [0.0f32; SECTOR_COUNT];
    for (i, out) in smoothed.iter_mut().enumerate() {
        let mut acc = 0.0;
        for l in -L..=L {
            let index = (i as i32 + l).rem_euclid(K) as usize;
            acc += histogram[index] * (1 + L - l.abs()) as f32;
        }
        *out = acc / (2 * L + 1) as f32;
    }
    smoothed
}

/// Pick a steering command from the smoothed histogram: the target sector if
/// it lies in a valley, otherwise the midpoint of the nearest valley capped
/// at MAX_VALLEY_SECTORS. Returns the hold command when every sector is
/// above the threshold.
pub fn select_steering(
    smoothed: &PolarHistogram,
    target: usize,
    valley_threshold: f32,
    max_speed: f32,
) -> SteeringCommand {
    let Some(heading) = select_heading_sector(smoothed, target, valley_threshold) else {
        return SteeringCommand::hold();
    };
    SteeringCommand {
        angle: heading as f32 * SECTOR_WIDTH,
        speed: sector_speed(smoothed[heading], valley_threshold, max_speed),
    }
}

/// Speed law: full speed in an empty sector, zero at SPEED_MARGIN times the
/// threshold, clamped to [0, max_speed].
pub fn sector_speed(density: f32, valley_threshold: f32, max_speed: f32) -> f32 {
    (max_speed * (1.0 - density / (SPEED_MARGIN * valley_threshold))).clamp(0.0, max_speed)
}

fn select_heading_sector(
    smoothed: &PolarHistogram,
    target: usize,
    threshold: f32,
) -> Option<usize> {
    const K: i32 = SECTOR_COUNT as i32;
    let wrap = |k: i32| k.rem_euclid(K);
    let target = target % SECTOR_COUNT;

    if smoothed[target] <= threshold {
        return Some(target);
    }

    // Nearest below-threshold sector scanning left (decreasing index) and
    // right (increasing). If the left scan comes back empty every sector is
    // blocked.
    let mut left = None;
    for step in 1..K {
        let k = wrap(target as i32 - step);
        if smoothed[k as usize] <= threshold {
            left = Some(k);
            break;
        }
    }
    let left = left?;
    let mut right = left;
    for step in 1..K {
        let k = wrap(target as i32 + step);
        if smoothed[k as usize] <= threshold {
            right = k;
            break;
        }
    }

    let distance_left = wrap(target as i32 - left);
    let distance_right = wrap(right - target as i32);
    let (near, direction) = if distance_left <= distance_right {
        (left, -1)
    } else {
        (right, 1)
    };

    // Walk the valley away from the target; one step before the first
    // above-threshold sector is the far edge.
    let mut width = 0;
    while width < K - 1 {
        let next = wrap(near + direction * (width + 1));
        if smoothed[next as usize] > threshold {
            break;
        }
        width += 1;
    }
    width = width.min(MAX_VALLEY_SECTORS as i32);

    let half = (width as f32 / 2.0).round() as i32;
    Some(wrap(near + direction * half) as usize)
}
