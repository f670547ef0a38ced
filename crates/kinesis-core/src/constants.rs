use std::time::Duration;

// Shared defaults and tuning constants used by the core and the web binding.

// Container defaults
pub const DEFAULT_DURATION_MS: u32 = 1000;
pub const DEFAULT_EASING: &str = "cubic-bezier(0.23, 1, 0.32, 1)";
pub const DEFAULT_PATH_EASING: &str = "ease";
pub const DEFAULT_PERSPECTIVE_PX: u32 = 1000;
pub const DEFAULT_TRANSFORM_ORIGIN: &str = "center";
pub const DEFAULT_THROTTLE_MS: u32 = 100;

// Strength defaults per modality
pub const DEFAULT_STRENGTH: f32 = 10.0; // transformer + audio elements
pub const DEFAULT_PROXIMITY_STRENGTH: f32 = 20.0;
pub const DEFAULT_PATH_STRENGTH: f32 = 1.0;

// Depth
pub const DEFAULT_SENSITIVITY: f32 = 40.0;
pub const DEFAULT_DEPTH_PX: f32 = 10.0;

// Proximity
pub const DEFAULT_START_DISTANCE_PX: f32 = 100.0;
pub const STICKING_THRESHOLD_PX: f32 = 5.0; // attraction switches to 1:1 follow inside this

// Axis model
pub const CONSTRAINT_COMPENSATION: f32 = 2.0;

// Scale profiles
pub const SCALE_FACTOR_COARSE: f32 = 0.1;
pub const SCALE_FACTOR_FINE: f32 = 0.01;

// Audio
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.8;
pub const DEFAULT_AUDIO_BIN: usize = 50;
pub const SPECTRUM_MAX: f32 = 255.0;
pub const ATTACK_TRANSITION: Duration = Duration::from_millis(50);
pub const DECAY_TRANSITION: Duration = Duration::from_millis(300);
pub const RESET_TRANSITION: Duration = Duration::from_millis(500);

