//! HTTP/JSON client for the customer service.

use std::time::Duration;

use async_trait::async_trait;
use customer::Customer;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClientError, CustomerServiceClient, REQUEST_ID_HEADER, current_request_id};

#[derive(Serialize)]
struct UpsertCustomerBody<'a> {
    idn: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to the customer service's `/customers` endpoints.
#[derive(Debug, Clone)]
pub struct HttpCustomerClient {
    client: Client,
    base_url: Url,
}

impl HttpCustomerClient {
    /// Creates a client for the service at `base_url` (e.g. `http://customer:9090`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn customers_url(&self, idn: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("customers");
            if let Some(idn) = idn {
                segments.push(idn);
            }
        }
        Ok(url)
    }

    /// Forwards the inbound correlation id, or starts a new one.
    fn with_request_id(builder: RequestBuilder) -> RequestBuilder {
        let request_id = current_request_id().unwrap_or_else(|| Uuid::new_v4().to_string());
        builder.header(REQUEST_ID_HEADER, request_id)
    }

    async fn read_customer(response: Response, idn: &str) -> Result<Customer, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Customer>().await?);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                idn: idn.to_string(),
            });
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%status, error = %e, "failed to read customer service error body");
                String::new()
            }
        };
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(ClientError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CustomerServiceClient for HttpCustomerClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn upsert_customer(&self, idn: &str) -> Result<Customer, ClientError> {
        let request = self
            .client
            .post(self.customers_url(None)?)
            .json(&UpsertCustomerBody { idn });
        let response = Self::with_request_id(request).send().await?;

        Self::read_customer(response, idn).await
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_customer(&self, idn: &str) -> Result<Customer, ClientError> {
        let request = self.client.get(self.customers_url(Some(idn))?);
        let response = Self::with_request_id(request).send().await?;

        Self::read_customer(response, idn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::REQUEST_ID;
    use httpmock::prelude::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn customer_json(idn: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "5f0c5a52-8c1e-4d4c-9a53-6f7a2a0e0b11",
            "idn": idn,
            "created_at": "2024-05-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn upsert_posts_idn_and_decodes_customer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/customers")
                    .json_body(serde_json::json!({ "idn": "IDN123" }));
                then.status(200).json_body(customer_json("IDN123"));
            })
            .await;

        let client = HttpCustomerClient::new(&server.base_url(), TIMEOUT).unwrap();
        let customer = client.upsert_customer("IDN123").await.unwrap();

        mock.assert_async().await;
        assert_eq!(customer.idn, "IDN123");
        assert_eq!(
            customer.id.to_string(),
            "5f0c5a52-8c1e-4d4c-9a53-6f7a2a0e0b11"
        );
    }

    #[tokio::test]
    async fn get_maps_404_to_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/customers/missing");
                then.status(404)
                    .json_body(serde_json::json!({ "error": "not found" }));
            })
            .await;

        let client = HttpCustomerClient::new(&server.base_url(), TIMEOUT).unwrap();
        let err = client.get_customer("missing").await.unwrap_err();

        assert!(matches!(err, ClientError::NotFound { ref idn } if idn == "missing"));
    }

    #[tokio::test]
    async fn server_error_carries_status_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/customers");
                then.status(500)
                    .json_body(serde_json::json!({ "error": "database down" }));
            })
            .await;

        let client = HttpCustomerClient::new(&server.base_url(), TIMEOUT).unwrap();
        let err = client.upsert_customer("IDN123").await.unwrap_err();

        match err {
            ClientError::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn forwards_request_id_in_scope() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/customers/IDN123")
                    .header(REQUEST_ID_HEADER, "req-42");
                then.status(200).json_body(customer_json("IDN123"));
            })
            .await;

        let client = HttpCustomerClient::new(&server.base_url(), TIMEOUT).unwrap();
        REQUEST_ID
            .scope("req-42".to_string(), client.get_customer("IDN123"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn starts_request_id_outside_a_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/customers")
                    .header_exists(REQUEST_ID_HEADER);
                then.status(200).json_body(customer_json("X"));
            })
            .await;

        let client = HttpCustomerClient::new(&server.base_url(), TIMEOUT).unwrap();
        client.upsert_customer("X").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_error_body_reports_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/customers");
                then.status(503).body("");
            })
            .await;

        let client = HttpCustomerClient::new(&server.base_url(), TIMEOUT).unwrap();
        let err = client.upsert_customer("X").await.unwrap_err();

        assert!(matches!(err, ClientError::Remote { status: 503, ref message } if message.is_empty()));
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpCustomerClient::new("not a url", TIMEOUT),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpCustomerClient::new("mailto:ops@example.com", TIMEOUT),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn base_path_is_preserved() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/identity/customers");
                then.status(200).json_body(customer_json("X"));
            })
            .await;

        let base = format!("{}/identity/", server.base_url());
        let client = HttpCustomerClient::new(&base, TIMEOUT).unwrap();
        client.upsert_customer("X").await.unwrap();

        mock.assert_async().await;
    }
}
