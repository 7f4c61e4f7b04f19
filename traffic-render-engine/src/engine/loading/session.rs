use bevy::prelude::*;

use crate::client::poller::SimulationLink;
use crate::engine::assets::scene_config::SceneConfig;
use crate::engine::loading::progress::SessionProgress;

/// Issue the bootstrap request, waiting out the retry delay after a failure.
pub fn request_bootstrap_system(
    time: Res<Time>,
    config: Res<SceneConfig>,
    mut link: ResMut<SimulationLink>,
    mut progress: ResMut<SessionProgress>,
) {
    if progress.bootstrap_pending {
        return;
    }
    if progress.retry_in > 0.0 {
        progress.retry_in -= time.delta_secs();
        return;
    }

    progress.bootstrap_attempts += 1;
    progress.bootstrap_pending = true;
    let sequence = link.request_bootstrap(config.initial_agents);
    info!(
        "Bootstrapping simulation with {} agents (attempt {}, request {})",
        config.initial_agents, progress.bootstrap_attempts, sequence
    );
}
