//! Parcel use-case services.
//!
//! # Responsibility
//! - Enforce the parcel lifecycle above the store layer.
//! - Keep CLI callers decoupled from storage details.

pub mod parcel_service;
