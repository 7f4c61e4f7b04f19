use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::camera::*;
use std::f32::consts::TAU;

use crate::engine::assets::scene_config::CameraConfig;
use crate::engine::scene::scene_graph::SceneGraph;

/// Spherical orbit around a target point, plus a pan offset.
///
/// Fields are private so every edit goes through the clamping setters:
/// distance stays at or above [`MIN_DISTANCE`], elevation inside
/// `[MIN_ELEVATION, MAX_ELEVATION]` and azimuth in `[0, 2π)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    distance: f32,
    azimuth: f32,
    elevation: f32,
    target: Vec3,
    pan: Vec3,
    fov_degrees: f32,
    defaults: CameraConfig,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            distance: MIN_DISTANCE,
            azimuth: 0.0,
            elevation: MIN_ELEVATION,
            target: Vec3::ZERO,
            pan: Vec3::ZERO,
            fov_degrees: config.fov_degrees,
            defaults: config.clone(),
        };
        camera.reset();
        camera
    }

    /// Restore the configured defaults and clear the pan offset.
    pub fn reset(&mut self) {
        let defaults = self.defaults.clone();
        self.set_distance(defaults.distance);
        self.set_azimuth(defaults.azimuth);
        self.set_elevation(defaults.elevation);
        self.set_target(Vec3::from_array(defaults.target));
        self.pan = Vec3::ZERO;
        self.fov_degrees = defaults.fov_degrees;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn pan(&self) -> Vec3 {
        self.pan
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.distance = distance.max(MIN_DISTANCE);
        }
    }

    pub fn set_azimuth(&mut self, azimuth: f32) {
        if azimuth.is_finite() {
            self.azimuth = azimuth.rem_euclid(TAU);
        }
    }

    pub fn set_elevation(&mut self, elevation: f32) {
        if elevation.is_finite() {
            self.elevation = elevation.clamp(MIN_ELEVATION, MAX_ELEVATION);
        }
    }

    pub fn set_target(&mut self, target: Vec3) {
        if target.is_finite() {
            self.target = target;
        }
    }

    pub fn set_pan(&mut self, pan: Vec3) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }

    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.set_azimuth(self.azimuth + delta_azimuth);
        self.set_elevation(self.elevation + delta_elevation);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.set_distance(self.distance + delta);
    }

    /// Move the pan offset in the camera's horizontal frame.
    pub fn pan_by(&mut self, right: f32, forward: f32) {
        let (sin, cos) = self.azimuth.sin_cos();
        // Camera looks along -offset, so its forward on the ground is (-sin, -cos).
        let forward_dir = Vec3::new(-sin, 0.0, -cos);
        let right_dir = Vec3::new(cos, 0.0, -sin);
        self.set_pan(self.pan + right_dir * right + forward_dir * forward);
    }

    /// Offset of the eye from the look-at point.
    pub fn orbit_offset(&self) -> Vec3 {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        self.distance * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn look_at_point(&self) -> Vec3 {
        self.target + self.pan
    }

    pub fn eye(&self) -> Vec3 {
        self.look_at_point() + self.orbit_offset()
    }

    /// World-to-view matrix, right-handed, Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.look_at_point(), Vec3::Y)
    }

    /// Camera transform for the Bevy camera entity.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.look_at_point(), Vec3::Y)
    }
}

/// Marks the single 3D camera driven by [`OrbitCamera`].
#[derive(Component)]
pub struct OrbitCameraRig;

/// Keyboard and mouse input for the orbit camera.
pub fn orbit_camera_controller(
    mut scene: ResMut<SceneGraph>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let camera = scene.camera_mut();
    let dt = time.delta_secs();

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Right) {
            camera.orbit(
                -mouse_delta.x * ORBIT_MOUSE_SENSITIVITY,
                mouse_delta.y * ORBIT_MOUSE_SENSITIVITY,
            );
        } else if mouse_button.pressed(MouseButton::Middle) {
            let scale = camera.distance() * PAN_MOUSE_SENSITIVITY;
            camera.pan_by(-mouse_delta.x * scale, mouse_delta.y * scale);
        }
    }

    let mut scroll = 0.0;
    for event in scroll_events.read() {
        scroll += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.05,
        };
    }
    if scroll.abs() > f32::EPSILON {
        let distance = camera.distance();
        camera.set_distance(distance * (1.0 - scroll * ZOOM_WHEEL_STEP));
    }

    let mut orbit = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        orbit.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        orbit.x += 1.0;
    }
    if keyboard.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]) {
        orbit.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]) {
        orbit.y -= 1.0;
    }
    if orbit != Vec2::ZERO {
        camera.orbit(orbit.x * ORBIT_KEY_SPEED * dt, orbit.y * ORBIT_KEY_SPEED * dt);
    }

    if keyboard.pressed(KeyCode::KeyQ) {
        camera.zoom(-ZOOM_KEY_SPEED * dt);
    }
    if keyboard.pressed(KeyCode::KeyE) {
        camera.zoom(ZOOM_KEY_SPEED * dt);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        camera.reset();
    }
}

/// Copy the orbit state onto the camera entity. Runs every frame.
pub fn apply_orbit_camera(
    scene: Res<SceneGraph>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<OrbitCameraRig>>,
) {
    if let Ok((mut transform, mut projection)) = camera_query.single_mut() {
        let camera = scene.camera();
        *transform = camera.transform();
        if let Projection::Perspective(perspective) = projection.as_mut() {
            let fov = camera.fov_degrees().to_radians();
            if (perspective.fov - fov).abs() > f32::EPSILON {
                perspective.fov = fov;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn setters_clamp() {
        let mut camera = OrbitCamera::default();
        camera.set_distance(-10.0);
        assert_eq!(camera.distance(), MIN_DISTANCE);
        camera.set_elevation(10.0);
        assert_eq!(camera.elevation(), MAX_ELEVATION);
        camera.set_elevation(-1.0);
        assert_eq!(camera.elevation(), MIN_ELEVATION);
        camera.set_azimuth(-0.5);
        assert!(approx_eq(camera.azimuth(), TAU - 0.5));
        camera.set_distance(f32::NAN);
        assert_eq!(camera.distance(), MIN_DISTANCE);
    }

    #[test]
    fn eye_follows_spherical_placement_and_pan() {
        let mut camera = OrbitCamera::default();
        camera.set_target(Vec3::new(1.0, 0.0, 1.0));
        camera.set_distance(10.0);
        camera.set_azimuth(0.0);
        camera.set_elevation(std::f32::consts::FRAC_PI_4);
        camera.set_pan(Vec3::new(2.0, 0.0, 0.0));

        let eye = camera.eye();
        let expected = Vec3::new(3.0, 0.0, 1.0)
            + Vec3::new(0.0, 10.0 * 0.70710677, 10.0 * 0.70710677);
        assert!(eye.abs_diff_eq(expected, 1e-4));
        assert!(camera.look_at_point().abs_diff_eq(Vec3::new(3.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn view_matrix_maps_look_at_point_onto_forward_axis() {
        let camera = OrbitCamera::default();
        let view_space = camera.view_matrix().transform_point3(camera.look_at_point());
        assert!(approx_eq(view_space.x, 0.0));
        assert!(approx_eq(view_space.y, 0.0));
        assert!(approx_eq(view_space.z, -camera.distance()));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut camera = OrbitCamera::default();
        let pristine = camera.clone();
        camera.orbit(1.0, 0.3);
        camera.zoom(25.0);
        camera.pan_by(3.0, -2.0);
        camera.reset();
        assert_eq!(camera, pristine);
    }
}
