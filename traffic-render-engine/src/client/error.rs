use thiserror::Error;

/// Malformed top-level snapshot payload.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("response has no `positions` field")]
    MissingPositions,
    #[error("`positions` is not an array")]
    NotAnArray,
}

/// Failure of a single call to the simulation server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot from {endpoint}: {source}")]
    Snapshot {
        endpoint: String,
        #[source]
        source: SnapshotError,
    },
}
