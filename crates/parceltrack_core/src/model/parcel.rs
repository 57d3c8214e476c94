//! Parcel domain model.
//!
//! # Responsibility
//! - Define the canonical shipment record persisted by the store.
//! - Provide the lifecycle status enumeration shared by all callers.
//!
//! # Invariants
//! - `number` is unique, assigned exactly once by storage, never by callers.
//! - `client` and `created_at` are immutable after creation.
//! - `address` may only change while `status == Registered`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned unique parcel identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ParcelNumber = i64;

/// Identifier of the client who owns/sent a parcel.
pub type ClientId = i64;

/// Lifecycle stage of a parcel.
///
/// The store enforces no transition graph between these stages; only the
/// address-update and delete guards inspect the current stage at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted into the system; address is still editable.
    Registered,
    /// Handed over for delivery.
    Sent,
    /// Delivery confirmed.
    Delivered,
}

/// Canonical shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// `0` on a draft record; populated by the storage layer on insert.
    pub number: ParcelNumber,
    /// Owning client, set at creation and never mutated by the store.
    pub client: ClientId,
    /// Current lifecycle stage.
    pub status: ParcelStatus,
    /// Delivery address; mutable only while `status == Registered`.
    pub address: String,
    /// RFC 3339 UTC timestamp, set once at creation.
    pub created_at: String,
}

impl Parcel {
    /// Creates a draft record for a freshly registered parcel.
    ///
    /// # Invariants
    /// - `number` starts as `0` until the storage layer assigns one.
    /// - `status` starts as `Registered`.
    /// - `created_at` captures the current UTC time in RFC 3339 format.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Returns whether the guarded mutations (address update, delete) would
    /// currently take effect for this record.
    pub fn is_editable(&self) -> bool {
        self.status == ParcelStatus::Registered
    }
}

#[cfg(test)]
mod tests {
    use super::{Parcel, ParcelStatus};

    #[test]
    fn new_parcel_is_a_registered_draft() {
        let parcel = Parcel::new(42, "somewhere");
        assert_eq!(parcel.number, 0);
        assert_eq!(parcel.client, 42);
        assert_eq!(parcel.status, ParcelStatus::Registered);
        assert!(parcel.is_editable());
    }

    #[test]
    fn created_at_is_rfc3339_utc() {
        let parcel = Parcel::new(1, "addr");
        let parsed = chrono::DateTime::parse_from_rfc3339(&parcel.created_at)
            .expect("created_at should be valid RFC 3339");
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn status_serializes_as_snake_case_text() {
        let json = serde_json::to_string(&ParcelStatus::Registered).unwrap();
        assert_eq!(json, "\"registered\"");
        let status: ParcelStatus = serde_json::from_str("\"sent\"").unwrap();
        assert_eq!(status, ParcelStatus::Sent);
    }
}
