use bevy::prelude::*;
use constants::timing::{MOVEMENT_EPSILON, ROTATION_SPEEDUP, TRAFFIC_LIGHT_BLEND_SPEEDUP};
use std::f32::consts::{PI, TAU};

use crate::engine::scene::entity::SurfaceMaterial;

/// Progress between the last two snapshots, clamped to `[0, 1]`.
pub fn interpolation_fraction(elapsed: f32, interval: f32) -> f32 {
    if interval <= 0.0 || !elapsed.is_finite() {
        return 1.0;
    }
    (elapsed / interval).clamp(0.0, 1.0)
}

/// Wrap an angle into `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Interpolate from `from` to `to` along the shorter arc.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = wrap_angle(to - from);
    wrap_angle(from + delta * t)
}

/// Exact at both ends, unlike `a + (b - a) * t`.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Yaw facing along a horizontal displacement, if it is long enough to trust.
pub fn displacement_yaw(from: Vec3, to: Vec3) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    (dx.hypot(dz) > MOVEMENT_EPSILON).then(|| dx.atan2(dz))
}

/// Two-sample motion buffer of a car.
#[derive(Debug, Clone, PartialEq)]
pub struct CarMotion {
    pub previous: Vec3,
    pub current: Vec3,
    pub previous_yaw: f32,
    pub target_yaw: f32,
    /// Last heading the simulation reported, if any.
    pub heading_yaw: Option<f32>,
    pub lookahead: Option<Vec3>,
}

impl CarMotion {
    /// First sighting: both samples at `position`, so nothing moves until the next snapshot.
    pub fn new(position: Vec3, heading_yaw: Option<f32>, lookahead: Option<Vec3>) -> Self {
        let yaw = heading_yaw
            .or_else(|| lookahead.and_then(|ahead| displacement_yaw(position, ahead)))
            .unwrap_or(0.0);
        Self {
            previous: position,
            current: position,
            previous_yaw: yaw,
            target_yaw: yaw,
            heading_yaw,
            lookahead,
        }
    }

    /// Shift in a new reported sample.
    ///
    /// Target yaw comes from the observed displacement; a stationary car
    /// falls back to the reported heading, then to its look-ahead hint, and
    /// otherwise keeps facing the way it was.
    pub fn observe(&mut self, position: Vec3, heading_yaw: Option<f32>, lookahead: Option<Vec3>) {
        self.previous = self.current;
        self.current = position;
        if heading_yaw.is_some() {
            self.heading_yaw = heading_yaw;
        }
        self.lookahead = lookahead;

        self.previous_yaw = self.target_yaw;
        self.target_yaw = displacement_yaw(self.previous, self.current)
            .or(self.heading_yaw)
            .or_else(|| lookahead.and_then(|ahead| displacement_yaw(self.current, ahead)))
            .unwrap_or(self.target_yaw);
    }

    /// Render position and yaw at fraction `f`.
    ///
    /// Height is taken from the current sample. Rotation runs
    /// [`ROTATION_SPEEDUP`] times faster than translation.
    pub fn sample(&self, f: f32) -> (Vec3, f32) {
        let f = f.clamp(0.0, 1.0);
        let position = Vec3::new(
            lerp(self.previous.x, self.current.x, f),
            self.current.y,
            lerp(self.previous.z, self.current.z, f),
        );
        let turn = (f * ROTATION_SPEEDUP).min(1.0);
        (position, lerp_angle(self.previous_yaw, self.target_yaw, turn))
    }

    /// Restart from what is drawn at fraction `f` without taking a new sample.
    ///
    /// The car keeps heading for `current`, so restarting the interpolation
    /// clock moves it neither back nor forward.
    pub fn hold(&mut self, f: f32) {
        let (position, yaw) = self.sample(f);
        self.previous = position;
        self.previous_yaw = yaw;
    }
}

/// On/off state of a traffic light and the surfaces for each state.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSignal {
    pub on: bool,
    pub previous_on: bool,
    pub on_surface: SurfaceMaterial,
    pub off_surface: SurfaceMaterial,
}

impl LightSignal {
    pub fn new(on: bool, on_surface: SurfaceMaterial, off_surface: SurfaceMaterial) -> Self {
        Self {
            on,
            previous_on: on,
            on_surface,
            off_surface,
        }
    }

    pub fn surface_for(&self, on: bool) -> SurfaceMaterial {
        if on { self.on_surface } else { self.off_surface }
    }

    pub fn observe(&mut self, on: bool) {
        self.previous_on = self.on;
        self.on = on;
    }

    /// Surface at fraction `f`, blending a flip over the start of the interval.
    pub fn sample(&self, f: f32) -> SurfaceMaterial {
        let target = self.surface_for(self.on);
        if self.previous_on == self.on {
            return target;
        }
        let blend = (f.clamp(0.0, 1.0) * TRAFFIC_LIGHT_BLEND_SPEEDUP).min(1.0);
        self.surface_for(self.previous_on).lerp(&target, blend)
    }

    /// Settle on the current state without a new observation.
    pub fn hold(&mut self) {
        self.previous_on = self.on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn angle_lerp_takes_short_way_round() {
        let mid = lerp_angle(3.0, -3.0, 0.5);
        assert!(mid.abs() > 3.0, "went through zero: {mid}");
        let mut previous = 3.0_f32;
        for step in 1..=20 {
            let next = lerp_angle(3.0, -3.0, step as f32 / 20.0);
            assert!(wrap_angle(next - previous).abs() < 0.05);
            previous = next;
        }
        assert!(approx_eq(previous, -3.0));
    }

    #[test]
    fn wrap_angle_range_is_half_open() {
        assert!(approx_eq(wrap_angle(-PI), PI));
        assert!(approx_eq(wrap_angle(PI), PI));
        assert!(approx_eq(wrap_angle(3.0 * PI / 2.0), -FRAC_PI_2));
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(interpolation_fraction(-1.0, 0.5), 0.0);
        assert_eq!(interpolation_fraction(0.25, 0.5), 0.5);
        assert_eq!(interpolation_fraction(3.0, 0.5), 1.0);
        assert_eq!(interpolation_fraction(0.1, 0.0), 1.0);
    }

    #[test]
    fn sample_is_exact_at_both_ends() {
        let mut motion = CarMotion::new(Vec3::new(0.1, 1.0, 0.7), None, None);
        motion.observe(Vec3::new(0.3, 1.0, 2.9), None, None);
        assert_eq!(motion.sample(0.0).0, Vec3::new(0.1, 1.0, 0.7));
        assert_eq!(motion.sample(1.0).0, Vec3::new(0.3, 1.0, 2.9));
    }

    #[test]
    fn stationary_car_falls_back_to_heading() {
        let mut motion = CarMotion::new(Vec3::ZERO, None, None);
        motion.observe(Vec3::ZERO, Some(FRAC_PI_2), None);
        assert!(approx_eq(motion.target_yaw, FRAC_PI_2));
        motion.observe(Vec3::new(0.0, 0.0, 1.0), None, None);
        assert!(approx_eq(motion.target_yaw, 0.0));
        assert!(approx_eq(motion.previous_yaw, FRAC_PI_2));
    }

    #[test]
    fn stationary_car_without_heading_keeps_yaw() {
        let mut motion = CarMotion::new(Vec3::ZERO, Some(PI), None);
        motion.observe(Vec3::ZERO, None, None);
        assert!(approx_eq(motion.target_yaw, PI));
    }

    #[test]
    fn lookahead_orients_a_new_car() {
        let motion = CarMotion::new(Vec3::ZERO, None, Some(Vec3::new(-1.0, 0.0, 0.0)));
        assert!(approx_eq(motion.target_yaw, -FRAC_PI_2));
    }

    #[test]
    fn height_uses_current_sample() {
        let mut motion = CarMotion::new(Vec3::new(0.0, 0.0, 0.0), None, None);
        motion.observe(Vec3::new(2.0, 5.0, 0.0), None, None);
        let (position, _) = motion.sample(0.5);
        assert_eq!(position.y, 5.0);
        assert!(approx_eq(position.x, 1.0));
    }

    #[test]
    fn light_flip_blends_until_half_interval() {
        let on = SurfaceMaterial {
            diffuse: Vec3::new(0.0, 1.0, 0.0),
            ..default()
        };
        let off = SurfaceMaterial {
            diffuse: Vec3::new(1.0, 0.0, 0.0),
            ..default()
        };
        let mut signal = LightSignal::new(false, on, off);
        assert_eq!(signal.sample(0.0), off);
        signal.observe(true);
        assert_eq!(signal.sample(0.0), off);
        let done = 1.0 / TRAFFIC_LIGHT_BLEND_SPEEDUP;
        assert!(approx_eq(signal.sample(done * 0.5).diffuse.x, 0.5));
        assert_eq!(signal.sample(done), on);
        signal.observe(true);
        assert_eq!(signal.sample(0.0), on);
    }

    #[test]
    fn held_car_restarts_where_it_is_drawn() {
        let mut motion = CarMotion::new(Vec3::ZERO, None, None);
        motion.observe(Vec3::new(4.0, 0.0, 0.0), None, None);
        let drawn = motion.sample(0.25);
        motion.hold(0.25);
        assert!(motion.sample(0.0).0.abs_diff_eq(drawn.0, 1e-5));
        assert!(approx_eq(motion.sample(0.0).1, drawn.1));
        assert_eq!(motion.sample(1.0).0, Vec3::new(4.0, 0.0, 0.0));

        motion.hold(1.0);
        assert_eq!(motion.sample(0.0).0, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn held_light_stays_on_its_state() {
        let on = SurfaceMaterial {
            diffuse: Vec3::new(0.0, 1.0, 0.0),
            ..default()
        };
        let off = SurfaceMaterial::default();
        let mut signal = LightSignal::new(false, on, off);
        signal.observe(true);
        signal.hold();
        assert_eq!(signal.sample(0.0), on);
    }
}
