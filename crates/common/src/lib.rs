//! Shared types for the customer and shipment services.

pub mod types;

pub use types::{CustomerId, IdParseError, ShipmentId};
