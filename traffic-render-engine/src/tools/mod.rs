//! Interactive tools layered over the scene.

/// Collapsible side panel for camera parameters and simulation metrics.
pub mod control_panel;
