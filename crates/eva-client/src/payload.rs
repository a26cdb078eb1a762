//! Request payloads for signed control commands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An insertion-ordered mapping of string keys to JSON values.
///
/// The serialized form is what gets signed, so the exact bytes matter:
/// `deserialize(serialize(payload))` must equal the original. Key order is
/// insertion order (`serde_json` with `preserve_order`). An empty payload is
/// valid and serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// An empty `{}` payload.
    #[must_use]
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Insert a key/value pair, keeping insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Canonical JSON serialization of this payload.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a payload back from its serialized form.
    pub fn deserialize(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Number of keys in the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty `{}` payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_serializes_to_braces() {
        assert_eq!(Payload::empty().serialize().unwrap(), "{}");
    }

    #[test]
    fn round_trip_preserves_contents_and_order() {
        let mut payload = Payload::empty();
        payload.insert("zeta", "last-first");
        payload.insert("adapter", "download");
        payload.insert("count", 3);

        let raw = payload.serialize().unwrap();
        assert_eq!(raw, r#"{"zeta":"last-first","adapter":"download","count":3}"#);

        let parsed = Payload::deserialize(&raw).unwrap();
        assert_eq!(parsed, payload);
        assert_eq!(parsed.serialize().unwrap(), raw);
    }

    #[test]
    fn empty_round_trip() {
        let parsed = Payload::deserialize("{}").unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed, Payload::empty());
    }
}
