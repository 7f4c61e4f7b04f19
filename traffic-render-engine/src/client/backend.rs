use constants::endpoints;
use serde_json::{Value, json};
use std::time::Duration;

use super::error::ClientError;
use super::snapshot::{EntityCategory, SimulationMetrics, Snapshot};

/// Request/response boundary to the remote simulation.
///
/// Implementations block; callers run them off the render thread.
pub trait SimulationBackend: Send + Sync {
    /// Initialise the simulation with `agent_count` dynamic agents.
    fn init(&self, agent_count: u32) -> Result<String, ClientError>;

    /// Fetch the current snapshot of one category.
    fn fetch(&self, category: EntityCategory) -> Result<Snapshot, ClientError>;

    /// Advance the simulation one tick, returning the new step number when reported.
    fn advance(&self) -> Result<Option<u64>, ClientError>;

    fn metrics(&self) -> Result<SimulationMetrics, ClientError>;
}

/// JSON-over-HTTP backend for the traffic simulation server.
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: f32) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs_f32(timeout_secs.max(0.1)))
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn get_json(&self, endpoint: &str) -> Result<Value, ClientError> {
        let response = self
            .agent
            .get(&self.url(endpoint))
            .call()
            .map_err(|source| transport(endpoint, source))?;
        response
            .into_json::<Value>()
            .map_err(|source| ClientError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

fn transport(endpoint: &str, source: ureq::Error) -> ClientError {
    ClientError::Transport {
        endpoint: endpoint.to_string(),
        source: Box::new(source),
    }
}

impl SimulationBackend for HttpBackend {
    fn init(&self, agent_count: u32) -> Result<String, ClientError> {
        let body = json!({ endpoints::INIT_AGENT_COUNT_FIELD: agent_count });
        let response = self
            .agent
            .post(&self.url(endpoints::INIT))
            .send_json(body)
            .map_err(|source| transport(endpoints::INIT, source))?;
        let reply = response
            .into_json::<Value>()
            .map_err(|source| ClientError::Decode {
                endpoint: endpoints::INIT.to_string(),
                source,
            })?;
        Ok(reply
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    fn fetch(&self, category: EntityCategory) -> Result<Snapshot, ClientError> {
        let endpoint = category.endpoint();
        let payload = self.get_json(endpoint)?;
        Snapshot::from_json(category, &payload).map_err(|source| ClientError::Snapshot {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn advance(&self) -> Result<Option<u64>, ClientError> {
        let reply = self.get_json(endpoints::UPDATE)?;
        Ok(reply.get("currentStep").and_then(Value::as_u64))
    }

    fn metrics(&self) -> Result<SimulationMetrics, ClientError> {
        let reply = self.get_json(endpoints::METRICS)?;
        serde_json::from_value(reply).map_err(|source| ClientError::Decode {
            endpoint: endpoints::METRICS.to_string(),
            source: source.into(),
        })
    }
}
