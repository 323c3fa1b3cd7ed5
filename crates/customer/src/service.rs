//! Identity resolution service wrapping a customer repository.

use crate::Customer;
use crate::entity::validate_idn;
use crate::error::{CustomerError, Result};
use crate::repository::CustomerRepository;

/// Resolves customers by external identifier.
///
/// Holds no state of its own; all shared state lives in the repository.
pub struct CustomerIdentityService<R: CustomerRepository> {
    repository: R,
}

impl<R: CustomerRepository> CustomerIdentityService<R> {
    /// Creates a new identity service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns the customer for `idn`, creating it on first sight.
    ///
    /// Idempotent: repeated and concurrent calls for the same identifier
    /// return the same customer id.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_by_identifier(&self, idn: &str) -> Result<Customer> {
        validate_idn(idn)?;

        let customer = self.repository.upsert_by_idn(idn).await.inspect_err(|e| {
            tracing::error!(error = %e, "customer upsert failed");
        })?;

        metrics::counter!("customer_upserts_total").increment(1);
        tracing::info!(
            customer_id = %customer.id,
            created_at = %customer.created_at,
            "customer resolved"
        );
        Ok(customer)
    }

    /// Looks up the customer for `idn` without creating one.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_identifier(&self, idn: &str) -> Result<Customer> {
        validate_idn(idn)?;

        let customer = self
            .repository
            .get_by_idn(idn)
            .await?
            .ok_or_else(|| CustomerError::NotFound {
                idn: idn.to_string(),
            })?;

        tracing::info!(customer_id = %customer.id, "customer found");
        Ok(customer)
    }
}
