use glam::DVec3;

// Tuning constants shared by the simulation, the tween machine and the front-ends.

// Frame timing (milliseconds)
pub const MIN_FRAME_TIME: f64 = 16.0; // floor keeps the damping factor <= 1/8
pub const MAX_FRAME_TIME: f64 = 32.0; // ceiling absorbs backgrounded tabs

// Damping
pub const DAMPING_NUMERATOR: f64 = 2.0; // factor = 2 / lastFrameTime
pub const ZOOM_EPSILON: f64 = 0.001;
pub const LOOK_DIFFERENTIAL_THRESHOLD: f64 = 2.0; // squared distance

// Resting points
pub const DEFAULT_CENTER: DVec3 = DVec3::new(0.0, 0.0, 0.0);
pub const DEFAULT_LOOK: DVec3 = DVec3::new(0.0, 0.0, -800.0);
pub const WORLD_UP: DVec3 = DVec3::new(0.0, 1.0, 0.0);

// Ambient motion. Empirically tuned; keep verbatim.
pub const AMBIENT_PHASE_SCALE: f64 = 0.0001;
pub const AMBIENT_MOD_FREQUENCY: f64 = 3.542;
pub const AMBIENT_MOD_OFFSET: f64 = 1234.5;
pub const AMBIENT_X_FREQUENCY: f64 = 0.5;
pub const AMBIENT_Y_FREQUENCY: f64 = 2.0;
pub const AMBIENT_RADIUS_PER_INTENSITY: f64 = 10.0;

// Highlight gradient
pub const SHINE_OPACITY_PER_UNIT: f64 = 0.002;
pub const SHINE_MIN_OPACITY: f64 = 0.01;

// Interaction (milliseconds)
pub const GEOMETRY_DEBOUNCE_MS: f64 = 300.0;
pub const RESET_DELAY_MS: f64 = 100.0;

// Enlarge tween
pub const ENLARGE_DURATION_MS: f64 = 1500.0;
pub const COLLAPSE_DURATION_MS: f64 = 1000.0;
pub const TOGGLE_COOLDOWN_MS: f64 = 1000.0;
pub const ENLARGE_VIEWPORT_FILL: f64 = 0.7; // share of the binding viewport dimension
pub const FLIP_LOOK_DISTANCE: f64 = -800.0;

// Configuration defaults
pub const DEFAULT_ZOOM_SIZE: f64 = 40.0;
pub const DEFAULT_INTENSITY: f64 = 10.0;
