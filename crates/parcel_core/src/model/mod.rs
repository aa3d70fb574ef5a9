//! Domain model for tracked parcels.
//!
//! # Responsibility
//! - Define the canonical parcel record shared by store and service layers.
//!
//! # Invariants
//! - A stored parcel is identified by a store-assigned `ParcelNumber`.
//! - Deletion is a hard delete; numbers are never reused.

pub mod parcel;
