use common::{CustomerId, ShipmentId};
use thiserror::Error;

use crate::client::ClientError;

/// Errors raised by shipment repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced customer does not exist (foreign-key violation).
    #[error("Customer {0} does not exist")]
    MissingCustomer(CustomerId),

    /// The store could not serve the request.
    #[error("Shipment store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Errors returned by the shipment orchestrator.
///
/// Each workflow failure names the step that failed, so callers can tell an
/// unresolvable customer (nothing written) from an unwritable shipment
/// (customer written, shipment not).
#[derive(Debug, Error)]
pub enum ShipmentError {
    /// The request is malformed.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// No shipment exists with this id.
    #[error("Shipment not found: {0}")]
    NotFound(ShipmentId),

    /// The customer service could not resolve the customer; nothing was written.
    #[error("Customer resolution failed for idn '{idn}': {source}")]
    CustomerResolution {
        idn: String,
        #[source]
        source: ClientError,
    },

    /// A storage operation failed.
    #[error("Shipment store failed during '{step}': {source}")]
    Persistence {
        step: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ShipmentError {
    /// Returns true for errors caused by caller input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, ShipmentError::Validation(_))
    }

    /// Returns true when the requested shipment does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShipmentError::NotFound(_))
    }
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, ShipmentError>;
