//! Client side of the customer identity service.

pub mod http;
pub mod in_process;

use std::sync::Arc;

use async_trait::async_trait;
use customer::{Customer, CustomerError};
use thiserror::Error;

pub use http::HttpCustomerClient;
pub use in_process::InProcessCustomerClient;

/// Header carrying the correlation id between the services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    /// Correlation id of the inbound request currently being served.
    pub static REQUEST_ID: String;
}

/// Returns the correlation id in scope, if any.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Errors raised while calling the customer service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot be used.
    #[error("Invalid customer service URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (connect, timeout, decode).
    #[error("Customer service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service has no customer for this identifier.
    #[error("Customer not found for idn '{idn}'")]
    NotFound { idn: String },

    /// The service answered with a non-success status.
    #[error("Customer service returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// The service cannot be reached.
    #[error("Customer service unavailable: {0}")]
    Unavailable(String),

    /// The service returned a customer for a different identifier.
    #[error("Customer service returned idn '{returned}' for requested '{requested}'")]
    IdentityMismatch { requested: String, returned: String },

    /// Error raised by a co-located identity service.
    #[error(transparent)]
    Customer(#[from] CustomerError),
}

/// Remote contract of the customer identity service.
#[async_trait]
pub trait CustomerServiceClient: Send + Sync {
    /// Resolves or creates the customer for `idn`.
    async fn upsert_customer(&self, idn: &str) -> Result<Customer, ClientError>;

    /// Looks up the customer for `idn`; [`ClientError::NotFound`] if absent.
    async fn get_customer(&self, idn: &str) -> Result<Customer, ClientError>;
}

#[async_trait]
impl<T: CustomerServiceClient + ?Sized> CustomerServiceClient for Arc<T> {
    async fn upsert_customer(&self, idn: &str) -> Result<Customer, ClientError> {
        (**self).upsert_customer(idn).await
    }

    async fn get_customer(&self, idn: &str) -> Result<Customer, ClientError> {
        (**self).get_customer(idn).await
    }
}
