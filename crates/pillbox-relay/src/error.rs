use thiserror::Error;

/// Relay errors are terminal for a single message only — the receive loop
/// logs them and moves on.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Inbound payload was not the expected JSON shape.
    #[error("Malformed sync request: {0}")]
    Parse(String),

    /// The MQTT client could not hand the message to its event loop.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Schedule lookup failed while answering a sync request.
    #[error(transparent)]
    Store(#[from] pillbox_store::StoreError),
}
