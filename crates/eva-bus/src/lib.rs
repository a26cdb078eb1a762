//! # EVA Bus
//!
//! Fire-and-forget RPC channel over Kafka for EVA event-processing
//! instances.
//!
//! An [`RpcEnvelope`] names a remote function, positional arguments, and
//! keyword arguments, addressed to instances whose configured id matches the
//! `instance_id` regex. The [`BusPublisher`] serializes the envelope and
//! publishes it to a topic, waiting only for the broker acknowledgment
//! (topic/partition/offset) bounded by a fixed timeout. There is no
//! consumption path and no application-level reply: the publisher cannot
//! tell whether any instance matched or executed anything.

pub mod envelope;
pub mod error;
pub mod publisher;

pub use envelope::RpcEnvelope;
pub use error::BusError;
pub use publisher::{BusPublisher, Receipt, ACK_TIMEOUT_MS, DEFAULT_TOPIC};
