//! Session start-up: configuration loading and simulation bootstrap.
//!
//! `LoadingConfig` waits for `config/scene.json` and installs the session
//! resources; `Connecting` keeps issuing the bootstrap request until the
//! simulation answers.

/// Scene config loading and session resource installation.
pub mod config_loader;

/// Start-up progress resource.
pub mod progress;

/// Bootstrap request scheduling with retry.
pub mod session;
