//! Constants used throughout the application

/// Number of frames averaged by the geometry smoother
pub const MOVING_AVERAGE_FRAME: usize = 10;

/// Extra samples kept past the averaging window before the oldest one is dropped
pub const MOVING_AVERAGE_TRIM_SLACK: usize = 3;

/// Landmark index used as the frontal reference point (nose tip)
pub const REFERENCE_LANDMARK_INDEX: usize = 1;

/// Scale applied to the displacement norm before it becomes a size rate
pub const DISPLACEMENT_RATE_SCALE: f64 = 150.0;

/// Magnification of the displacement when the window is moved
pub const DISTANCE_RATE_MOVE: f64 = 10_000.0;

/// Offsets used when the window position is not driven by head orientation
pub const DEFAULT_TOP_DIFF: f64 = 0.0;
pub const DEFAULT_LEFT_DIFF: f64 = 0.0;

/// Border alpha bounds
pub const BORDER_ALPHA_MIN: f64 = 0.0;
pub const BORDER_ALPHA_MAX: f64 = 1.0;

/// Border alpha below this value snaps to `BORDER_ALPHA_MIN`
pub const BORDER_ALPHA_MIN_THRESHOLD: f64 = 0.015;

/// Fraction of the MIN..MAX span used for discrete sizing and gaze classification
pub const GAZE_MARGIN_RATE: f64 = 0.1;

/// Ratio of the minimum window size to the screen size
pub const WINDOW_MIN_RATIO: f64 = 0.8;

/// Default viewport size used when no configuration is supplied
pub const DEFAULT_SCREEN_WIDTH: f64 = 1280.0;
pub const DEFAULT_SCREEN_HEIGHT: f64 = 720.0;

/// Default border colour (RGB)
pub const BORDER_GREEN: (u8, u8, u8) = (83, 253, 49);

/// Participant ID written for rows whose participant is unknown
pub const UNKNOWN_PARTICIPANT_ID: i64 = -1;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
