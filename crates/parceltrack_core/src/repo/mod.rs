//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the parcel data access contract.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Guarded mutations report whether a row was affected instead of failing
//!   when a guard condition filters the row out.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod parcel_repo;
