//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use customer::CustomerError;
use shipment::ShipmentError;

/// API-level error type that maps to HTTP responses.
///
/// Validation failures map to 400 and missing resources to 404. A customer
/// service failure during shipment creation maps to 502 and every other
/// failure to 500. Server-side failures are logged in full but answered with
/// a fixed message.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Customer identity error.
    Customer(CustomerError),
    /// Shipment workflow error.
    Shipment(ShipmentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, mut message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Customer(err) => customer_error_to_response(err),
            ApiError::Shipment(err) => shipment_error_to_response(err),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
            message = public_message(status).to_string();
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Body text for server-side failures.
fn public_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_GATEWAY => "customer service unavailable",
        _ => "internal error",
    }
}

fn customer_error_to_response(err: CustomerError) -> (StatusCode, String) {
    match &err {
        CustomerError::InvalidIdn => (StatusCode::BAD_REQUEST, err.to_string()),
        CustomerError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        CustomerError::Database(_) | CustomerError::Migration(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn shipment_error_to_response(err: ShipmentError) -> (StatusCode, String) {
    match &err {
        ShipmentError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        ShipmentError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        ShipmentError::CustomerResolution { .. } => (StatusCode::BAD_GATEWAY, err.to_string()),
        ShipmentError::Persistence { .. } => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        ApiError::Customer(err)
    }
}

impl From<ShipmentError> for ApiError {
    fn from(err: ShipmentError) -> Self {
        ApiError::Shipment(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
