use std::sync::Arc;

use async_trait::async_trait;

use crate::{Customer, Result};

/// Persistence contract for customer identities.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Returns the customer for `idn`, creating it if it does not exist.
    ///
    /// Must be a single atomic conditional insert: concurrent calls for the
    /// same identifier insert at most one row and all return the same id.
    /// An existing row is returned unchanged.
    async fn upsert_by_idn(&self, idn: &str) -> Result<Customer>;

    /// Looks up a customer by identifier without creating one.
    async fn get_by_idn(&self, idn: &str) -> Result<Option<Customer>>;
}

#[async_trait]
impl<T: CustomerRepository + ?Sized> CustomerRepository for Arc<T> {
    async fn upsert_by_idn(&self, idn: &str) -> Result<Customer> {
        (**self).upsert_by_idn(idn).await
    }

    async fn get_by_idn(&self, idn: &str) -> Result<Option<Customer>> {
        (**self).get_by_idn(idn).await
    }
}
