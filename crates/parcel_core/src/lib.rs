//! Core persistence and workflows for the parcel tracker.
//!
//! The crate owns the mapping between `Parcel` records and rows of the
//! SQLite `parcel` table; callers never touch storage directly.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::parcel::{now_rfc3339, ClientId, Parcel, ParcelNumber, ParcelStatus};
pub use repo::parcel_store::{ParcelStore, SqliteParcelStore, StoreError, StoreResult};
pub use service::parcel_service::{ParcelService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
