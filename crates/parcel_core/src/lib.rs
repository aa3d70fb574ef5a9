//! Core persistence logic for the parcel tracker.
//! This crate owns the parcel record shape and its SQLite storage contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parcel::{
    ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelValidationError,
};
pub use repo::parcel_repo::{ParcelStore, SqliteParcelStore, StoreError, StoreResult};
pub use service::parcel_service::{ParcelAction, ParcelService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
