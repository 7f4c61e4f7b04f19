//! Shared tunables for the traffic visualisation client.

pub mod camera;
pub mod direction;
pub mod endpoints;
pub mod models;
pub mod render_settings;
pub mod timing;
