//! Kafka publisher for RPC envelopes.

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use tracing::{debug, info};
use uuid::Uuid;

use crate::envelope::RpcEnvelope;
use crate::error::BusError;

/// How long to wait for broker acknowledgment before giving up.
pub const ACK_TIMEOUT_MS: u64 = 5000;

/// Well-known topic carrying EVA RPC messages.
pub const DEFAULT_TOPIC: &str = "eva.rpc";

/// Broker acknowledgment for a published message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Topic the message was stored on.
    pub topic: String,
    /// Partition assigned by the broker.
    pub partition: i32,
    /// Offset assigned by the broker.
    pub offset: i64,
}

/// Publishes RPC envelopes to a Kafka topic.
///
/// Each invocation gets a fresh random client id; no connection state
/// survives across invocations.
pub struct BusPublisher {
    producer: FutureProducer,
    topic: String,
}

impl BusPublisher {
    /// Connect a producer to `brokers` for `topic`.
    pub fn new(brokers: &[String], topic: impl Into<String>) -> Result<Self, BusError> {
        let client_id = format!("eva-rpc-{}", Uuid::new_v4());
        debug!(%client_id, brokers = %brokers.join(","), "creating Kafka producer");

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("client.id", &client_id)
            .set("message.timeout.ms", ACK_TIMEOUT_MS.to_string())
            .create()?;

        Ok(Self {
            producer,
            topic: topic.into(),
        })
    }

    /// Publish an envelope and wait for the broker acknowledgment, bounded
    /// by [`ACK_TIMEOUT_MS`].
    ///
    /// The receipt is advisory only: the broker stored the message, but
    /// nothing here says any instance matched `instance_id` or executed the
    /// function.
    pub async fn publish(&self, envelope: &RpcEnvelope) -> Result<Receipt, BusError> {
        let bytes = envelope.to_bytes()?;
        let record: FutureRecord<'_, (), Vec<u8>> = FutureRecord::to(&self.topic).payload(&bytes);

        let (partition, offset) = self
            .producer
            .send(record, Timeout::After(Duration::from_millis(ACK_TIMEOUT_MS)))
            .await
            .map_err(|(err, _message)| match err {
                KafkaError::MessageProduction(RDKafkaErrorCode::MessageTimedOut) => {
                    BusError::PublishTimeout {
                        timeout_ms: ACK_TIMEOUT_MS,
                    }
                }
                other => BusError::Kafka(other),
            })?;

        info!(
            topic = %self.topic,
            partition,
            offset,
            function = %envelope.function,
            "RPC message sent successfully"
        );

        Ok(Receipt {
            topic: self.topic.clone(),
            partition,
            offset,
        })
    }
}
