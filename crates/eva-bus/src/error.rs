//! Error types for the bus channel.

use thiserror::Error;

/// Errors that can occur while publishing an RPC envelope.
///
/// Everything here is fatal for the invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum BusError {
    /// The broker did not acknowledge the message within the bound.
    #[error("broker did not acknowledge within {timeout_ms} ms")]
    PublishTimeout {
        /// The acknowledgment bound that expired.
        timeout_ms: u64,
    },

    /// Any other broker or client error.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// Envelope serialization failed.
    #[error("failed to encode RPC envelope: {0}")]
    Json(#[from] serde_json::Error),
}

impl BusError {
    /// Process exit code: every publish failure exits with 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }
}
