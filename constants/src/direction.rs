use std::f32::consts::{FRAC_PI_2, PI};

/// Compass headings reported by the simulation and the yaw each one maps to.
///
/// Yaw is measured as `atan2(dx, dz)`, so a model facing +Z at yaw 0 faces
/// "Up" (grid +y, world +z).
pub const DIRECTION_ANGLES: &[(&str, f32)] = &[
    ("Up", 0.0),
    ("Right", FRAC_PI_2),
    ("Down", PI),
    ("Left", -FRAC_PI_2),
];

/// Yaw for a reported direction name, matched case-insensitively.
pub fn direction_angle(name: &str) -> Option<f32> {
    DIRECTION_ANGLES
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(name.trim()))
        .map(|(_, angle)| *angle)
}
