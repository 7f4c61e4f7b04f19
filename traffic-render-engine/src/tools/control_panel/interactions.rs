use bevy::prelude::*;

use super::state::*;
use crate::engine::scene::scene_graph::SceneGraph;

// Handles interactions for the Control Panel buttons
// Chevron icon toggles collapse state
pub fn collapse_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<CollapseButton>)>,
    mut state: ResMut<ControlPanelState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => { state.collapsed = !state.collapsed; *bg = BackgroundColor(Color::srgb(0.18, 0.20, 0.24)); }
            Interaction::Hovered => *bg = BackgroundColor(Color::srgb(0.26, 0.28, 0.32)),
            Interaction::None    => *bg = BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
        }
    }
}

// C key toggles the panel
pub fn toggle_panel_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<ControlPanelState>,
) {
    if keyboard.just_pressed(KeyCode::KeyC) {
        state.collapsed = !state.collapsed;
    }
}

// -/+ buttons nudge one camera parameter per press
pub fn step_button_interaction(
    mut q: Query<(&Interaction, &ParamStepButton, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    mut scene: ResMut<SceneGraph>,
) {
    for (interaction, step, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                step.param.nudge(scene.camera_mut(), step.direction);
                *bg = BackgroundColor(Color::srgb(0.18, 0.20, 0.24));
            }
            Interaction::Hovered => *bg = BackgroundColor(Color::srgb(0.26, 0.28, 0.32)),
            Interaction::None    => *bg = BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
        }
    }
}

// Reset restores the configured camera defaults
pub fn reset_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<ResetCameraButton>)>,
    mut scene: ResMut<SceneGraph>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                scene.camera_mut().reset();
                info!("Camera reset to defaults");
                *bg = BackgroundColor(Color::srgb(0.18, 0.20, 0.24));
            }
            Interaction::Hovered => *bg = BackgroundColor(Color::srgb(0.26, 0.28, 0.32)),
            Interaction::None    => *bg = BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
        }
    }
}
