//! Global constants for ik-core

use std::f64::consts::FRAC_PI_2;

/// Per-axis distance from the goal at which the end effector counts as arrived
pub const DEFAULT_TOLERANCE: f64 = 5.0;

/// Per-axis end effector displacement below which a step counts as stalled
pub const DEFAULT_STALL_EPSILON: f64 = 0.001;

/// Damping factor applied to each CCD joint correction
pub const DEFAULT_CCD_STEP: f64 = 0.1;

/// Damping factor applied to each Jacobian-transpose joint correction
pub const DEFAULT_JACOBIAN_STEP: f64 = 0.03;

/// Divisor applied to pivot-to-tip vectors when building Jacobian rows
pub const DEFAULT_JACOBIAN_SCALE: f64 = 100.0;

/// Angle of a freshly added segment (straight down with y pointing down)
pub const INITIAL_SEGMENT_ANGLE: f64 = FRAC_PI_2;

/// Vectors shorter than this have no usable direction
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// Default viewport width
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

/// Default viewport height
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Default number of segments in each chain
pub const DEFAULT_SEGMENTS_PER_CHAIN: usize = 3;

/// Viewport height divided by this gives the default link length
pub const LINK_LENGTH_DIVISOR: f64 = 8.0;

/// Half the side of the square drawn around each goal
pub const GOAL_MARKER_HALF_SIZE: f64 = 5.0;

/// Default number of frames the driver runs
pub const DEFAULT_FRAME_COUNT: u32 = 600;
