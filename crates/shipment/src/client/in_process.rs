//! Customer client that calls a co-located identity service directly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use customer::{Customer, CustomerError, CustomerIdentityService, CustomerRepository};

use super::{ClientError, CustomerServiceClient};

/// Adapter exposing a [`CustomerIdentityService`] through the client contract.
///
/// Used for single-process deployments and tests. `set_unavailable` makes
/// every call fail as if the network were down.
pub struct InProcessCustomerClient<R: CustomerRepository> {
    service: Arc<CustomerIdentityService<R>>,
    unavailable: AtomicBool,
}

impl<R: CustomerRepository> InProcessCustomerClient<R> {
    pub fn new(service: Arc<CustomerIdentityService<R>>) -> Self {
        Self {
            service,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Returns the wrapped identity service.
    pub fn service(&self) -> &CustomerIdentityService<R> {
        &self.service
    }

    /// Simulates the customer service being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable(
                "customer service unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: CustomerRepository> CustomerServiceClient for InProcessCustomerClient<R> {
    async fn upsert_customer(&self, idn: &str) -> Result<Customer, ClientError> {
        self.check_available()?;
        Ok(self.service.resolve_by_identifier(idn).await?)
    }

    async fn get_customer(&self, idn: &str) -> Result<Customer, ClientError> {
        self.check_available()?;
        self.service
            .get_by_identifier(idn)
            .await
            .map_err(|e| match e {
                CustomerError::NotFound { idn } => ClientError::NotFound { idn },
                other => ClientError::Customer(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use customer::InMemoryCustomerRepository;

    fn client() -> InProcessCustomerClient<InMemoryCustomerRepository> {
        InProcessCustomerClient::new(Arc::new(CustomerIdentityService::new(
            InMemoryCustomerRepository::new(),
        )))
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let client = client();

        let created = client.upsert_customer("IDN123").await.unwrap();
        let fetched = client.get_customer("IDN123").await.unwrap();

        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn get_missing_maps_to_not_found() {
        let client = client();

        let err = client.get_customer("ghost").await.unwrap_err();

        assert!(matches!(err, ClientError::NotFound { ref idn } if idn == "ghost"));
    }

    #[tokio::test]
    async fn unavailable_fails_without_touching_store() {
        let client = client();
        client.set_unavailable(true);

        let err = client.upsert_customer("IDN123").await.unwrap_err();

        assert!(matches!(err, ClientError::Unavailable(_)));
        assert_eq!(client.service().repository().customer_count().await, 0);
    }
}
