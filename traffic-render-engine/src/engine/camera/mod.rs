//! Orbit camera for the traffic scene.
//!
//! A spherical viewpoint around a target point with a pan offset, driven by
//! keyboard, mouse and the control panel through clamping setters.

/// Orbit camera state, input controller and camera-entity sync.
pub mod orbit_camera;
