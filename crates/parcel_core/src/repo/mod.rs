//! Persistence contracts and their SQLite implementation.
//!
//! # Responsibility
//! - Define the record-level operations callers use for parcels.
//! - Keep SQL inside the core persistence boundary.
//!
//! # Invariants
//! - "No such parcel" surfaces as `StoreError::NotFound`, never as a
//!   zero-valued record.
//! - Driver errors are carried unchanged inside `StoreError::Db`.

pub mod parcel_store;
