//! Shipment side of the system.
//!
//! The [`ShipmentOrchestrator`] creates a shipment in two ordered steps:
//! 1. Resolve the customer through the customer service
//! 2. Persist the shipment referencing the resolved customer id
//!
//! A failure in step 1 aborts before anything is written, so a shipment never
//! exists without a resolvable customer. A failure in step 2 leaves the
//! customer in place; resolution is idempotent, so the whole workflow can be
//! retried from the start.

pub mod client;
pub mod entity;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod postgres;
pub mod repository;

pub use client::{
    ClientError, CustomerServiceClient, HttpCustomerClient, InProcessCustomerClient, REQUEST_ID,
    REQUEST_ID_HEADER, current_request_id,
};
pub use common::ShipmentId;
pub use entity::{CreateShipmentRequest, CustomerRef, INITIAL_STATUS, NewShipment, Shipment};
pub use error::{ShipmentError, StoreError};
pub use memory::InMemoryShipmentRepository;
pub use orchestrator::ShipmentOrchestrator;
pub use postgres::PostgresShipmentRepository;
pub use repository::ShipmentRepository;
