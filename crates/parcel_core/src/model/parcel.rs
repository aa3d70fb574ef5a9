//! Parcel domain model.
//!
//! # Responsibility
//! - Define the record persisted for every tracked shipment.
//! - Provide the status lifecycle and timestamp helpers.
//!
//! # Invariants
//! - `number` is assigned by the store once and never changes.
//! - `created_at` is an RFC3339 UTC string and is never mutated.
//! - `ParcelStatus::next` defines lifecycle order; nothing here enforces it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned parcel identifier (SQLite rowid).
pub type ParcelNumber = i64;

/// Identifier of the client owning a parcel.
pub type ClientId = i64;

/// Shipment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted for shipping, not yet handed to a carrier.
    Registered,
    /// In transit.
    Sent,
    /// Handed to the recipient. Terminal.
    Delivered,
}

impl ParcelStatus {
    /// Canonical storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Parses a canonical storage label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "registered" => Some(Self::Registered),
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Returns the following lifecycle state, or `None` for terminal states.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for parcel records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelValidationError {
    /// `created_at` is not an RFC3339 timestamp.
    InvalidCreatedAt(String),
}

impl Display for ParcelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCreatedAt(value) => {
                write!(f, "created_at `{value}` is not an RFC3339 timestamp")
            }
        }
    }
}

impl Error for ParcelValidationError {}

/// Tracked shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Store-assigned identifier. Zero until the parcel is persisted.
    pub number: ParcelNumber,
    /// Owning client.
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-form delivery address.
    pub address: String,
    /// RFC3339 creation timestamp, e.g. `2024-01-01T00:00:00Z`.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved, freshly registered parcel stamped with the current
    /// UTC time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self::with_created_at(
            client,
            ParcelStatus::Registered,
            address,
            now_rfc3339(),
        )
    }

    /// Creates an unsaved parcel with caller-provided status and timestamp.
    ///
    /// Used by import paths and tests where creation time already exists.
    pub fn with_created_at(
        client: ClientId,
        status: ParcelStatus,
        address: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            number: 0,
            client,
            status,
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Validates fields that the storage schema cannot check.
    pub fn validate(&self) -> Result<(), ParcelValidationError> {
        if DateTime::parse_from_rfc3339(&self.created_at).is_err() {
            return Err(ParcelValidationError::InvalidCreatedAt(
                self.created_at.clone(),
            ));
        }
        Ok(())
    }

    /// Returns whether the parcel may still be edited or withdrawn.
    pub fn is_registered(&self) -> bool {
        self.status == ParcelStatus::Registered
    }
}

impl Display for Parcel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parcel #{} client={} status={} created_at={} address={}",
            self.number, self.client, self.status, self.created_at, self.address
        )
    }
}

/// Current UTC time formatted as RFC3339 with second precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
