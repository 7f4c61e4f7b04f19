use bevy::prelude::*;

use crate::engine::loading::progress::SessionProgress;

/// Session lifecycle: read the config, bootstrap the simulation, then poll.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    LoadingConfig,
    Connecting,
    Running,
}

impl AppState {
    pub fn label(self) -> &'static str {
        match self {
            AppState::LoadingConfig => "Loading config",
            AppState::Connecting => "Connecting",
            AppState::Running => "Running",
        }
    }
}

#[derive(Component)]
pub struct FpsText;

pub fn log_state_transitions(state: Res<State<AppState>>, progress: Res<SessionProgress>) {
    if state.is_changed() {
        info!(
            "State: {} (bootstrap attempts: {}, static layers: {})",
            state.get().label(),
            progress.bootstrap_attempts,
            progress.static_layers
        );
    }
}
