//! In-window control panel for the orbit camera and simulation readouts.
//!
//! ## Layout
//!
//! ```text
//! ControlPanelRoot
//!   ├─> Header: title + collapse chevron
//!   └─> Body
//!       ├─> Status (session state, object count)
//!       ├─> Metrics (step, active, spawned, arrived)
//!       ├─> Camera rows: label  [-]  value  [+]
//!       ├─> Reset Camera
//!       └─> FPS
//! ```
//!
//! Every edit goes through the orbit camera's clamping setters, so the panel
//! can never push distance or elevation out of range. `C` toggles the panel.

/// Button and keyboard handlers.
pub mod interactions;

/// Panel state, editable camera parameters and marker components.
pub mod state;

/// Panel spawning and readout refresh systems.
pub mod ui;

use bevy::prelude::*;

use interactions::{
    collapse_button_interaction, reset_button_interaction, step_button_interaction,
    toggle_panel_shortcut,
};
use state::ControlPanelState;
use ui::{
    apply_collapse_state, reflect_camera_values, reflect_metrics, reflect_status,
    spawn_control_panel_ui,
};

// Registers the Control Panel, its state and systems.
pub struct ControlPanelPlugin;

impl Plugin for ControlPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlPanelState>()
            .add_systems(Startup, spawn_control_panel_ui)
            .add_systems(
                Update,
                (
                    collapse_button_interaction,
                    toggle_panel_shortcut,
                    apply_collapse_state,
                    step_button_interaction,
                    reset_button_interaction,
                    reflect_camera_values,
                    reflect_metrics,
                    reflect_status,
                )
                    .chain(),
            );
    }
}
