//! Client for a polled traffic simulation: fetches entity snapshots over
//! HTTP, reconciles them into a scene graph and renders it with an orbit
//! camera, interpolating motion between polls.

pub mod client;
pub mod engine;
pub mod tools;
