// Certainty values (evidence counters stored in the histogram grid)
pub const CV_MIN: u8 = 0;
pub const CV_MAX: u8 = 15;
pub const CV_INC: u8 = 3;
pub const CV_DEC: u8 = 1;

// Active window (square subgrid the polar histogram is built from)
pub const WINDOW_SIZE: usize = 30;

// Polar histogram
pub const ALPHA_DEG: usize = 5;
pub const SECTOR_COUNT: usize = 360 / ALPHA_DEG; // 72
pub const SECTOR_WIDTH: f32 = std::f32::consts::TAU / SECTOR_COUNT as f32;

// Obstacle vector magnitude m = cv^2 * (A - B*d). The intercept is derived
// from the full WINDOW_SIZE rather than WINDOW_SIZE - 1 so the magnitude
// stays non-negative out to the window corners even for even sizes.
pub const VECTOR_SLOPE: f32 = 500.0;
pub const VECTOR_INTERCEPT: f32 =
    VECTOR_SLOPE * std::f32::consts::SQRT_2 * WINDOW_SIZE as f32 / 2.0;

// Smoothing kernel half-width; H'[i] averages 2L+1 sectors with
// triangular weights 1 + L - |l|
pub const SMOOTH_HALF_WIDTH: usize = 5;

// Widest valley considered when steering, in sectors
pub const MAX_VALLEY_SECTORS: usize = 18;

// Speed law: v = v_max * (1 - H'[heading] / (SPEED_MARGIN * threshold)).
// The margin keeps v > 0 for every sector inside a valley.
pub const SPEED_MARGIN: f32 = 1.1;

// Run defaults
pub const DEFAULT_TICK_RATE: u32 = 60;
pub const DEFAULT_DT: f32 = 1.0 / DEFAULT_TICK_RATE as f32;
pub const DEFAULT_MAX_TICKS: u32 = 600;
pub const DEFAULT_SPEED: f32 = 1.0;
pub const DEFAULT_DENSITY: f32 = 1.0;
pub const DEFAULT_GOAL_TOLERANCE: f32 = 0.1;
