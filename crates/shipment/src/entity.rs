//! Shipment entity and request types.

use chrono::{DateTime, Utc};
use common::{CustomerId, ShipmentId};
use serde::{Deserialize, Serialize};

use crate::error::ShipmentError;

/// Status assigned to every shipment at creation.
pub const INITIAL_STATUS: &str = "created";

/// A persisted shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub route: String,
    /// Price in currency minor units.
    pub price: i64,
    pub status: String,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a shipment; the store assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    pub route: String,
    pub price: i64,
    pub customer_id: CustomerId,
}

impl NewShipment {
    pub fn new(route: impl Into<String>, price: i64, customer_id: CustomerId) -> Self {
        Self {
            route: route.into(),
            price,
            customer_id,
        }
    }

    /// Materializes the row a store would write, with a fresh id and timestamp.
    pub fn into_shipment(self) -> Shipment {
        Shipment {
            id: ShipmentId::new(),
            route: self.route,
            price: self.price,
            status: INITIAL_STATUS.to_string(),
            customer_id: self.customer_id,
            created_at: Utc::now(),
        }
    }
}

/// Customer reference inside a creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub idn: String,
}

/// Inbound request to create a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShipmentRequest {
    pub route: String,
    pub price: i64,
    pub customer: CustomerRef,
}

impl CreateShipmentRequest {
    pub fn new(route: impl Into<String>, price: i64, customer_idn: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            price,
            customer: CustomerRef {
                idn: customer_idn.into(),
            },
        }
    }

    /// Rejects requests that could never produce a valid shipment.
    pub fn validate(&self) -> Result<(), ShipmentError> {
        if self.route.trim().is_empty() {
            return Err(ShipmentError::Validation(
                "route must not be empty".to_string(),
            ));
        }
        if self.price < 0 {
            return Err(ShipmentError::Validation(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        if self.customer.idn.trim().is_empty() {
            return Err(ShipmentError::Validation(
                "customer.idn must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
