//! The RPC envelope published to the bus.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message-bus document describing a remote function invocation.
///
/// Serialized field order is declaration order: `type`, `instance_id`,
/// `function`, `args`, `kwargs`. The `instance_id` is a regular expression
/// evaluated by the *receiving* instances; this client performs no local
/// matching of any kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcEnvelope {
    /// Always `"rpc"`.
    #[serde(rename = "type")]
    pub message_type: String,
    /// Regex matched against instance ids by receivers.
    pub instance_id: String,
    /// Name of the remote function to invoke.
    pub function: String,
    /// Positional arguments, in order.
    pub args: Vec<String>,
    /// Keyword arguments, insertion-ordered.
    pub kwargs: Map<String, Value>,
}

impl RpcEnvelope {
    /// The envelope type discriminator.
    pub const MESSAGE_TYPE: &'static str = "rpc";

    /// Build an envelope addressed to instances matching `instance_id`.
    pub fn new(
        instance_id: impl Into<String>,
        function: impl Into<String>,
        args: Vec<String>,
        kwargs: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            message_type: Self::MESSAGE_TYPE.to_string(),
            instance_id: instance_id.into(),
            function: function.into(),
            args,
            kwargs: kwargs
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        }
    }

    /// Serialized form sent over the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
