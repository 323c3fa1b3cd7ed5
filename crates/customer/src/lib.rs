//! Customer identity component.
//!
//! Resolves a customer by its external identifier (`idn`). Resolution is an
//! idempotent upsert backed by a single atomic conditional insert, so
//! concurrent callers resolving the same identifier converge on one record.

pub mod entity;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod service;

pub use common::CustomerId;
pub use entity::{Customer, validate_idn};
pub use error::{CustomerError, Result};
pub use memory::InMemoryCustomerRepository;
pub use postgres::PostgresCustomerRepository;
pub use repository::CustomerRepository;
pub use service::CustomerIdentityService;
