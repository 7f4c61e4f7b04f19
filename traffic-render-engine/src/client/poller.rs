use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;

use super::backend::SimulationBackend;
use super::snapshot::{EntityCategory, SimulationMetrics, Snapshot};

/// Result of one advance-and-fetch round trip.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub sequence: u64,
    pub step: Option<u64>,
    pub cars: Option<Snapshot>,
    pub lights: Option<Snapshot>,
    pub metrics: Option<SimulationMetrics>,
}

impl PollOutcome {
    pub fn empty(sequence: u64) -> Self {
        Self {
            sequence,
            step: None,
            cars: None,
            lights: None,
            metrics: None,
        }
    }

    pub fn dynamic_snapshots(self) -> impl Iterator<Item = Snapshot> {
        self.cars.into_iter().chain(self.lights)
    }
}

/// Result of the session bootstrap: init, static layers, first dynamic state.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub sequence: u64,
    /// `false` when the init call failed and the bootstrap must be retried.
    pub initialised: bool,
    pub statics: Vec<Snapshot>,
    pub cars: Option<Snapshot>,
    pub lights: Option<Snapshot>,
    pub metrics: Option<SimulationMetrics>,
}

impl BootstrapOutcome {
    /// A bootstrap that never reached the server; it is retried.
    pub fn uninitialised(sequence: u64) -> Self {
        Self {
            sequence,
            initialised: false,
            statics: Vec::new(),
            cars: None,
            lights: None,
            metrics: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LinkMessage {
    Bootstrap(BootstrapOutcome),
    Poll(PollOutcome),
}

impl LinkMessage {
    pub fn sequence(&self) -> u64 {
        match self {
            LinkMessage::Bootstrap(outcome) => outcome.sequence,
            LinkMessage::Poll(outcome) => outcome.sequence,
        }
    }
}

fn fetch_logged(backend: &dyn SimulationBackend, category: EntityCategory) -> Option<Snapshot> {
    match backend.fetch(category) {
        Ok(snapshot) => {
            if snapshot.skipped > 0 {
                warn!(
                    "Skipped {} malformed {} entries",
                    snapshot.skipped,
                    category.label()
                );
            }
            Some(snapshot)
        }
        Err(error) => {
            warn!("Fetching {} failed: {}", category.label(), error);
            None
        }
    }
}

fn metrics_logged(backend: &dyn SimulationBackend) -> Option<SimulationMetrics> {
    backend
        .metrics()
        .map_err(|error| debug!("Metrics unavailable: {}", error))
        .ok()
}

/// Advance the simulation and fetch the dynamic categories.
///
/// A failed advance still fetches, so the scene converges on whatever the
/// server currently reports.
pub fn run_poll(backend: &dyn SimulationBackend, sequence: u64) -> PollOutcome {
    let step = match backend.advance() {
        Ok(step) => step,
        Err(error) => {
            warn!("Advancing simulation failed: {}", error);
            None
        }
    };

    PollOutcome {
        sequence,
        step,
        cars: fetch_logged(backend, EntityCategory::Car),
        lights: fetch_logged(backend, EntityCategory::TrafficLight),
        metrics: metrics_logged(backend),
    }
}

pub fn run_bootstrap(
    backend: &dyn SimulationBackend,
    agent_count: u32,
    sequence: u64,
) -> BootstrapOutcome {
    let mut outcome = BootstrapOutcome::uninitialised(sequence);

    match backend.init(agent_count) {
        Ok(message) => info!("Simulation initialised: {}", message),
        Err(error) => {
            warn!("Simulation init failed: {}", error);
            return outcome;
        }
    }
    outcome.initialised = true;

    outcome.statics = EntityCategory::STATIC
        .iter()
        .filter_map(|&category| fetch_logged(backend, category))
        .collect();
    outcome.cars = fetch_logged(backend, EntityCategory::Car);
    outcome.lights = fetch_logged(backend, EntityCategory::TrafficLight);
    outcome.metrics = metrics_logged(backend);
    outcome
}

/// How requests are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// One worker thread per request; the render thread never blocks.
    #[default]
    Thread,
    /// Run on the calling thread. Used by tests and headless tools.
    Inline,
}

/// Non-blocking connection to the simulation.
///
/// Every request carries a sequence number. Finished requests arrive through a
/// channel in completion order and [`SimulationLink::accept`] rejects any that
/// is older than the last one applied.
#[derive(Resource)]
pub struct SimulationLink {
    backend: Arc<dyn SimulationBackend>,
    dispatch: Dispatch,
    sender: Sender<LinkMessage>,
    receiver: Receiver<LinkMessage>,
    next_sequence: u64,
    last_applied: Option<u64>,
    in_flight: usize,
}

impl SimulationLink {
    pub fn new(backend: Arc<dyn SimulationBackend>) -> Self {
        Self::with_dispatch(backend, Dispatch::Thread)
    }

    pub fn with_dispatch(backend: Arc<dyn SimulationBackend>, dispatch: Dispatch) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            backend,
            dispatch,
            sender,
            receiver,
            next_sequence: 0,
            last_applied: None,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Issue an advance-and-fetch request. Returns its sequence number.
    pub fn request_poll(&mut self) -> u64 {
        let sequence = self.next_sequence();
        let fallback = LinkMessage::Poll(PollOutcome::empty(sequence));
        self.spawn("sim-poll", fallback, move |backend| {
            LinkMessage::Poll(run_poll(backend, sequence))
        });
        sequence
    }

    pub fn request_bootstrap(&mut self, agent_count: u32) -> u64 {
        let sequence = self.next_sequence();
        let fallback = LinkMessage::Bootstrap(BootstrapOutcome::uninitialised(sequence));
        self.spawn("sim-bootstrap", fallback, move |backend| {
            LinkMessage::Bootstrap(run_bootstrap(backend, agent_count, sequence))
        });
        sequence
    }

    /// Run `job` per the dispatch mode. If no worker can be started,
    /// `fallback` is delivered instead so every request gets an answer.
    fn spawn<F>(&mut self, name: &str, fallback: LinkMessage, job: F)
    where
        F: FnOnce(&dyn SimulationBackend) -> LinkMessage + Send + 'static,
    {
        self.in_flight += 1;
        match self.dispatch {
            Dispatch::Inline => {
                // Receiver is owned by self, the send cannot fail here.
                let _ = self.sender.send(job(self.backend.as_ref()));
            }
            Dispatch::Thread => {
                let backend = Arc::clone(&self.backend);
                let sender = self.sender.clone();
                let spawned = std::thread::Builder::new()
                    .name(name.to_string())
                    .spawn(move || {
                        // The link may be gone after teardown; nothing to deliver to then.
                        let _ = sender.send(job(backend.as_ref()));
                    });
                if let Err(error) = spawned {
                    self.worker_failed(name, &error, fallback);
                }
            }
        }
    }

    fn worker_failed(&self, name: &str, error: &std::io::Error, fallback: LinkMessage) {
        error!("Could not start {} worker: {}", name, error);
        let _ = self.sender.send(fallback);
    }

    /// Drain every finished request without blocking.
    pub fn drain(&mut self) -> Vec<LinkMessage> {
        let messages: Vec<LinkMessage> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(messages.len());
        messages
    }

    /// Whether a result with `sequence` may be applied. Marks it applied if so.
    pub fn accept(&mut self, sequence: u64) -> bool {
        if self.last_applied.is_some_and(|last| sequence < last) {
            debug!(
                "Discarding stale response {} (last applied {:?})",
                sequence, self.last_applied
            );
            return false;
        }
        self.last_applied = Some(sequence);
        true
    }
}
