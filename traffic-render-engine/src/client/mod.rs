//! Snapshot client for the remote traffic simulation.
//!
//! The simulation server owns all agent state. This module talks to it over
//! HTTP/JSON, normalises every category response into a [`snapshot::Snapshot`]
//! and hands finished requests back to the render thread through a channel.
//!
//! ## Request Flow
//!
//! ```text
//! render thread                         worker thread
//!      │                                      │
//!      ├─ SimulationLink::request_poll(seq) ──>│ advance, cars, lights, metrics
//!      │        (never waits)                 │
//!      │ <──────────── LinkMessage::Poll(seq) ─┤
//!      ├─ SimulationLink::accept(seq)          │
//!      │    stale sequence ⇒ discarded         │
//! ```

/// Remote simulation trait and the HTTP implementation.
pub mod backend;

/// Client-side error types.
pub mod error;

/// Request dispatch, result channel and sequence ordering.
pub mod poller;

/// Typed, normalised category snapshots and simulation metrics.
pub mod snapshot;
