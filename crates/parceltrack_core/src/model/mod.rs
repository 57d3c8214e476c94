//! Domain model for parcel lifecycle tracking.
//!
//! # Responsibility
//! - Define the canonical parcel record and its status enumeration.
//!
//! # Invariants
//! - `number` is assigned by the storage layer and never reused.
//! - `created_at` is written once, as an RFC 3339 UTC timestamp.

pub mod parcel;
