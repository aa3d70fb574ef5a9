//! Parcel lifecycle service.
//!
//! # Responsibility
//! - Register parcels with the canonical initial state.
//! - Guard address changes, status transitions and withdrawals.
//!
//! # Invariants
//! - New parcels always start as `registered` with a current timestamp.
//! - Status only advances `registered -> sent -> delivered`.
//! - Address changes and deletion are allowed only while `registered`.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Lifecycle action rejected by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParcelAction {
    AdvanceStatus,
    ChangeAddress,
    Delete,
}

impl ParcelAction {
    /// Stable label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AdvanceStatus => "advance_status",
            Self::ChangeAddress => "change_address",
            Self::Delete => "delete",
        }
    }
}

impl Display for ParcelAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AdvanceStatus => "advance status",
            Self::ChangeAddress => "change address",
            Self::Delete => "delete",
        })
    }
}

/// Errors from parcel service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Target parcel does not exist.
    NotFound(ParcelNumber),
    /// Action is not allowed in the parcel's current status.
    InvalidTransition {
        number: ParcelNumber,
        status: ParcelStatus,
        action: ParcelAction,
    },
    /// Store-level failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidTransition {
                number,
                status,
                action,
            } => write!(
                f,
                "cannot {action} for parcel {number} in status `{status}`"
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(number) => Self::NotFound(number),
            other => Self::Store(other),
        }
    }
}

/// Use-case facade over a parcel store.
pub struct ParcelService<S: ParcelStore> {
    store: S,
}

impl<S: ParcelStore> ParcelService<S> {
    /// Creates service from store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new parcel and returns it with its assigned number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> ServiceResult<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.number = self.store.add(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    /// Loads one parcel.
    pub fn get(&self, number: ParcelNumber) -> ServiceResult<Parcel> {
        Ok(self.store.get(number)?)
    }

    /// Lists all parcels of one client in registration order.
    pub fn client_parcels(&self, client: ClientId) -> ServiceResult<Vec<Parcel>> {
        Ok(self.store.get_by_client(client)?)
    }

    /// Advances the parcel to its next status and returns the new status.
    pub fn next_status(&self, number: ParcelNumber) -> ServiceResult<ParcelStatus> {
        let parcel = self.store.get(number)?;
        let Some(next) = parcel.status.next() else {
            return Err(rejected(&parcel, ParcelAction::AdvanceStatus));
        };

        self.store.set_status(number, next)?;
        info!(
            "event=parcel_status module=service status=ok number={} from={} to={}",
            number, parcel.status, next
        );
        Ok(next)
    }

    /// Changes the delivery address of a registered parcel.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ServiceResult<()> {
        let parcel = self.store.get(number)?;
        if !parcel.is_registered() {
            return Err(rejected(&parcel, ParcelAction::ChangeAddress));
        }

        self.store.set_address(number, address)?;
        info!("event=parcel_address module=service status=ok number={number}");
        Ok(())
    }

    /// Withdraws a registered parcel.
    pub fn delete(&self, number: ParcelNumber) -> ServiceResult<()> {
        let parcel = self.store.get(number)?;
        if !parcel.is_registered() {
            return Err(rejected(&parcel, ParcelAction::Delete));
        }

        self.store.delete(number)?;
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }
}

fn rejected(parcel: &Parcel, action: ParcelAction) -> ServiceError {
    warn!(
        "event=parcel_transition module=service status=rejected number={} parcel_status={} action={}",
        parcel.number,
        parcel.status,
        action.as_str()
    );
    ServiceError::InvalidTransition {
        number: parcel.number,
        status: parcel.status,
        action,
    }
}
