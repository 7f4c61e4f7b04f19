//! Runtime diagnostics.

/// Frame rate readout for the control panel and the log.
pub mod fps_tracking;
