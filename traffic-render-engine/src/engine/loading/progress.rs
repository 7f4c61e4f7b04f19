use bevy::prelude::*;

/// Milestones of the session start-up, read by state transitions and the panel.
#[derive(Resource, Default, Debug)]
pub struct SessionProgress {
    pub config_loaded: bool,
    pub bootstrap_attempts: u32,
    pub bootstrap_pending: bool,
    /// Seconds until the next bootstrap attempt is allowed.
    pub retry_in: f32,
    pub static_layers: usize,
}
