//! Core types for supply-chain events
//!
//! The ledger treats payloads as opaque documents. [`SupplyChainEvent`] is the
//! typed shape callers usually record, but any `Serialize` value is accepted.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Opaque event document stored in a record
///
/// Objects are backed by a sorted map, so key order never depends on how the
/// document was built.
pub type Payload = serde_json::Value;

/// Previous fingerprint of the genesis record
pub const GENESIS_PREVIOUS_FINGERPRINT: &str = "0";

/// Payload of the genesis record
pub fn genesis_payload() -> Payload {
    json!({
        "event": "Genesis Block",
        "details": "Supply Chain Initiated",
    })
}

/// Current time as an ISO-8601 UTC timestamp with millisecond precision
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Supply-chain stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Product manufactured and packaged
    Manufactured,
    /// Product left a site
    Shipped,
    /// Product arrived at a site
    Received,
    /// Product handed to its final recipient
    Delivered,
}

impl EventKind {
    /// Display name, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Manufactured => "Manufactured",
            EventKind::Shipped => "Shipped",
            EventKind::Received => "Received",
            EventKind::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supply-chain event as recorded in a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyChainEvent {
    /// Stage reached
    pub event: EventKind,

    /// Where it happened
    pub location: String,

    /// Free-text details
    pub details: String,
}

impl SupplyChainEvent {
    /// Create new event
    pub fn new(event: EventKind, location: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            event,
            location: location.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_as_document() {
        let event = SupplyChainEvent::new(EventKind::Shipped, "Factory A to Distributor", "On truck");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "Shipped");
        assert_eq!(value["location"], "Factory A to Distributor");
        assert_eq!(value["details"], "On truck");
    }

    #[test]
    fn test_genesis_payload() {
        let payload = genesis_payload();
        assert_eq!(payload["event"], "Genesis Block");
        assert_eq!(payload["details"], "Supply Chain Initiated");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        // 2026-10-19T08:15:30.123Z
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::Delivered.to_string(), "Delivered");
        let value = serde_json::to_value(EventKind::Received).unwrap();
        assert_eq!(value, EventKind::Received.as_str());
    }
}
