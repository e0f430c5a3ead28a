//! Certainty-value occupancy grid.
//!
//! The grid accumulates evidence from range percepts: every cell holds a
//! saturating counter in [CV_MIN, CV_MAX]. Cells crossed by a ray lose
//! evidence, the hit cell at the endpoint gains it.

use vfh_shared::{Percept, CV_DEC, CV_INC, CV_MAX};

/// A rectangular grid of 8-bit certainty values addressed by signed
/// Cartesian coordinates centered on the origin.
///
/// For odd sizes the extents are symmetric; for even sizes one row/column
/// is lost on the negative side so that (0, 0) stays addressable:
/// a width-4 axis spans `(-1) -- (0) -- (1) -- (2)`.
#[derive(Debug, Clone)]
pub struct HistogramGrid {
    data: Vec<u8>,
    width: usize,
    height: usize,
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
}

impl HistogramGrid {
    pub fn new(width: usize, height: usize) -> Self {
        let x_max = (width / 2) as i32;
        let y_max = (height / 2) as i32;
        let x_min = if width % 2 == 1 { -x_max } else { -(x_max - 1) };
        let y_min = if height % 2 == 1 { -y_max } else { -(y_max - 1) };
        Self {
            data: vec![0; width * height],
            width,
            height,
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw row-major buffer, row index `y - y_min`, column `x - x_min`.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn within_bounds(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Bounds-checked read.
    pub fn at(&self, x: i32, y: i32) -> Option<u8> {
        if !self.within_bounds(x, y) {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        let col = (x - self.x_min) as usize;
        let row = (y - self.y_min) as usize;
        row * self.width + col
    }

    /// Copy the `width` x `height` window centered on (x, y) into `out`,
    /// row-major. Centering follows the grid's own odd/even rule. Returns
    /// false without touching `out` if any corner falls outside the grid.
    pub fn copy_window_into(
        &self,
        width: usize,
        height: usize,
        x: i32,
        y: i32,
        out: &mut Vec<u8>,
    ) -> bool {
        let half_w = (width / 2) as i32;
        let half_h = (height / 2) as i32;
        let x_lo = if width % 2 == 1 { x - half_w } else { x - (half_w - 1) };
        let y_lo = if height % 2 == 1 { y - half_h } else { y - (half_h - 1) };
        let x_hi = x + half_w;
        let y_hi = y + half_h;

        if !self.within_bounds(x_lo, y_lo) || !self.within_bounds(x_hi, y_hi) {
            return false;
        }

        out.clear();
        out.reserve(width * height);
        for row_y in y_lo..=y_hi {
            let start = self.index(x_lo, row_y);
            out.extend_from_slice(&self.data[start..start + width]);
        }
        true
    }

    /// As [`copy_window_into`](Self::copy_window_into), allocating the
    /// window buffer.
    pub fn subgrid(&self, width: usize, height: usize, x: i32, y: i32) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        self.copy_window_into(width, height, x, y, &mut out)
            .then_some(out)
    }

    /// Integrate one percept: decrement every cell the ray crosses, then
    /// increment the endpoint if it was a hit (decrement it too on a
    /// max-range pass). Returns false if the origin lies outside the grid.
    pub fn add_percept(&mut self, percept: Percept) -> bool {
        let Percept {
            x: x0,
            y: y0,
            angle,
            distance,
            detected,
        } = percept;

        if !self.within_bounds(x0, y0) {
            return false;
        }

        let mut x1 = x0 + (distance * angle.cos()).round() as i32;
        let mut y1 = y0 + (distance * angle.sin()).round() as i32;

        if !self.within_bounds(x1, y1) {
            // Clip the endpoint to the grid rectangle along y = m*x + b:
            // clamp x and recompute y, then clamp y and recompute x if the
            // first pass was not enough. Recomputed coordinates truncate
            // toward zero.
            let m = f64::from(angle).tan();
            let b = f64::from(y0) - m * f64::from(x0);

            x1 = x1.clamp(self.x_min, self.x_max);
            y1 = (m * f64::from(x1) + b) as i32;
            if y1 < self.y_min || y1 > self.y_max {
                y1 = y1.clamp(self.y_min, self.y_max);
                x1 = ((f64::from(y1) - b) / m) as i32;
            }
            x1 = x1.clamp(self.x_min, self.x_max);
            y1 = y1.clamp(self.y_min, self.y_max);
        }

        self.trace_ray(x0, y0, x1, y1, detected);
        true
    }

    /// Bresenham walk from (x0, y0) to (x1, y1). Intermediate coordinates
    /// are clamped to the extents as a guard against boundary endpoints.
    fn trace_ray(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, detected: bool) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;
        loop {
            if x == x1 && y == y1 {
                if detected {
                    self.increment_cell(x, y);
                } else {
                    self.decrement_cell(x, y);
                }
                return;
            }
            self.decrement_cell(x, y);

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x = (x + sx).clamp(self.x_min, self.x_max);
            }
            if e2 <= dx {
                err += dx;
                y = (y + sy).clamp(self.y_min, self.y_max);
            }
        }
    }

    #[inline]
    fn increment_cell(&mut self, x: i32, y: i32) {
        let i = self.index(x, y);
        self.data[i] = (self.data[i] + CV_INC).min(CV_MAX);
    }

    #[inline]
    fn decrement_cell(&mut self, x: i32, y: i32) {
        let i = self.index(x, y);
        self.data[i] = self.data[i].saturating_sub(CV_DEC);
    }
}
