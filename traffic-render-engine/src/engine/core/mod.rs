//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions
//! and plugin initialisation.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the scene renderer, config loading, the
/// simulation link and the control panel.
pub mod app_setup;

/// Application state machine for the session lifecycle.
pub mod app_state;

/// Window configuration.
pub mod window_config;
