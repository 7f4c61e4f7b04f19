use std::f32::consts::FRAC_PI_2;

/// Closest the orbit camera may get to its target.
pub const MIN_DISTANCE: f32 = 2.0;

/// Keeps elevation strictly inside (0, π/2) so the view never flips over the pole.
pub const ELEVATION_EPSILON: f32 = 0.01;
pub const MIN_ELEVATION: f32 = ELEVATION_EPSILON;
pub const MAX_ELEVATION: f32 = FRAC_PI_2 - ELEVATION_EPSILON;

pub const DEFAULT_DISTANCE: f32 = 40.0;
pub const DEFAULT_AZIMUTH: f32 = 0.8;
pub const DEFAULT_ELEVATION: f32 = 0.9;
pub const DEFAULT_TARGET: [f32; 3] = [12.0, 0.0, 12.0];
pub const DEFAULT_FOV_DEGREES: f32 = 60.0;

// Input sensitivities
pub const ORBIT_MOUSE_SENSITIVITY: f32 = 0.005;
pub const ORBIT_KEY_SPEED: f32 = 1.2; // radians per second
pub const ZOOM_KEY_SPEED: f32 = 20.0; // units per second
pub const ZOOM_WHEEL_STEP: f32 = 0.1; // fraction of distance per wheel line
pub const PAN_MOUSE_SENSITIVITY: f32 = 0.002; // scaled by distance

// Control panel step sizes
pub const PANEL_DISTANCE_STEP: f32 = 2.0;
pub const PANEL_ANGLE_STEP: f32 = 0.05;
pub const PANEL_TARGET_STEP: f32 = 1.0;
