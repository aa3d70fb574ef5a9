//! Repository layer: the parcel store contract and its SQLite implementation.
//!
//! # Responsibility
//! - Define the data access contract for parcel records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store APIs return a semantic `NotFound` distinct from transport errors.
//! - Stores borrow an already-open connection and never close it.

pub mod parcel_repo;
