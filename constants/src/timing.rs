/// Seconds between simulation advance requests.
pub const DEFAULT_POLL_INTERVAL_SECS: f32 = 0.5;

/// Seconds to wait before retrying a failed session bootstrap.
pub const BOOTSTRAP_RETRY_SECS: f32 = 2.0;

/// Per-request timeout for calls to the simulation server.
pub const REQUEST_TIMEOUT_SECS: f32 = 5.0;

/// Rotation runs this many times faster than translation within a poll interval,
/// so a car has finished turning before it has finished moving.
pub const ROTATION_SPEEDUP: f32 = 2.0;

/// A traffic light flip finishes blending after `1 / TRAFFIC_LIGHT_BLEND_SPEEDUP`
/// of a poll interval.
pub const TRAFFIC_LIGHT_BLEND_SPEEDUP: f32 = 2.0;

/// Horizontal displacement below which a car counts as stationary for heading purposes.
pub const MOVEMENT_EPSILON: f32 = 1e-3;
