//! Parcel domain model.
//!
//! # Responsibility
//! - Define the record shape persisted by `ParcelStore`.
//! - Name the well-known delivery statuses.
//!
//! # Invariants
//! - `number == 0` means "not yet persisted"; stores assign non-zero values.
//! - `created_at` is fixed at creation and never rewritten.
//! - `status` is free text at this level; `ParcelStatus` only names the
//!   values the service layer understands.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Opaque client reference. Not validated against any client registry.
pub type ClientId = i64;

/// Well-known delivery statuses, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted and waiting for dispatch.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Reached the recipient.
    Delivered,
}

impl ParcelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Parses a stored status value; unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "registered" => Some(Self::Registered),
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Returns the status that follows this one, or `None` once delivered.
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

/// One tracked shipment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parcel {
    /// Zero until the store assigns one.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: String,
    pub address: String,
    /// RFC 3339 UTC timestamp, stored verbatim.
    pub created_at: String,
}

impl Parcel {
    /// Builds an unpersisted parcel in `registered` status.
    pub fn new(client: ClientId, address: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered.as_str().to_string(),
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Builds an unpersisted `registered` parcel stamped with the current UTC time.
    pub fn registered_now(client: ClientId, address: impl Into<String>) -> Self {
        Self::new(client, address, now_rfc3339())
    }

    pub fn is_persisted(&self) -> bool {
        self.number != 0
    }

    /// Interprets `status` as a well-known value, if it is one.
    pub fn known_status(&self) -> Option<ParcelStatus> {
        ParcelStatus::parse(&self.status)
    }
}

/// Current UTC time formatted as RFC 3339 with second precision (`...Z`).
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
