//! Parcel tracking use-cases.
//!
//! # Responsibility
//! - Register parcels and walk them through `registered -> sent -> delivered`.
//! - Guard address changes and removal to parcels not yet dispatched.
//!
//! # Invariants
//! - The service never bypasses the `ParcelStore` contract.
//! - Lifecycle rules live here; the store accepts any status string.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_store::{ParcelStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    /// The operation is only allowed while the parcel is `registered`.
    NotRegistered {
        number: ParcelNumber,
        status: String,
    },
    /// The stored status is outside the known lifecycle.
    UnknownStatus {
        number: ParcelNumber,
        status: String,
    },
    /// The parcel is already delivered.
    FinalStatus(ParcelNumber),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NotRegistered { number, status } => write!(
                f,
                "parcel {number} has status `{status}`; only registered parcels can be changed"
            ),
            Self::UnknownStatus { number, status } => {
                write!(f, "parcel {number} has unknown status `{status}`")
            }
            Self::FinalStatus(number) => write!(f, "parcel {number} is already delivered"),
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
        Self::Store(value)
    }
}

/// Parcel tracker workflows on top of any `ParcelStore`.
pub struct ParcelService<S: ParcelStore> {
    store: S,
}

impl<S: ParcelStore> ParcelService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new parcel for `client` and returns it with its number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> ServiceResult<Parcel> {
        let mut parcel = Parcel::registered_now(client, address);
        parcel.number = self.store.add(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={client}",
            parcel.number
        );
        Ok(parcel)
    }

    pub fn parcel(&self, number: ParcelNumber) -> ServiceResult<Parcel> {
        Ok(self.store.get(number)?)
    }

    pub fn parcels_of(&self, client: ClientId) -> ServiceResult<Vec<Parcel>> {
        Ok(self.store.get_by_client(client)?)
    }

    /// Moves the parcel one step forward and returns the new status.
    pub fn advance_status(&self, number: ParcelNumber) -> ServiceResult<ParcelStatus> {
        let parcel = self.store.get(number)?;
        let current = parcel
            .known_status()
            .ok_or_else(|| ServiceError::UnknownStatus {
                number,
                status: parcel.status.clone(),
            })?;
        let next = current.next().ok_or(ServiceError::FinalStatus(number))?;

        self.store.set_status(number, next.as_str())?;
        info!("event=parcel_advance module=service status=ok number={number} from={current} to={next}");
        Ok(next)
    }

    /// Changes the delivery address of a parcel that has not been sent yet.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ServiceResult<()> {
        self.ensure_registered(number)?;
        self.store.set_address(number, address)?;
        Ok(())
    }

    /// Removes a parcel that has not been sent yet.
    pub fn remove(&self, number: ParcelNumber) -> ServiceResult<()> {
        self.ensure_registered(number)?;
        self.store.delete(number)?;
        info!("event=parcel_remove module=service status=ok number={number}");
        Ok(())
    }

    fn ensure_registered(&self, number: ParcelNumber) -> ServiceResult<()> {
        let parcel = self.store.get(number)?;
        if parcel.known_status() != Some(ParcelStatus::Registered) {
            return Err(ServiceError::NotRegistered {
                number,
                status: parcel.status,
            });
        }
        Ok(())
    }
}
