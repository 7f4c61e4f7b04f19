//! Snapshot reconciliation and motion interpolation.
//!
//! ## Per-Frame Flow
//!
//! ```text
//! tick_sync_clock ──> receive_simulation_updates ──> interpolate_scene ──> mirror
//!   poll due?           stale seq ⇒ drop               f = since_snapshot / interval
//!   request_poll        retire / update / create       cars: lerp x,z and yaw
//!                       clock.snapshot_applied()       lights: blend surfaces
//! ```

/// Car motion buffers, light signals and the angle/fraction helpers.
pub mod motion;

/// Snapshot diffing, static layers and the poll/interpolation clock.
pub mod reconcile;

/// Bevy systems driving the sync loop.
pub mod systems;
