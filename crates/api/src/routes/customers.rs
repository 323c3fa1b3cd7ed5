//! Customer identity endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use customer::{Customer, CustomerIdentityService, CustomerRepository};
use serde::Deserialize;

use crate::error::ApiError;

/// Shared state of the customer service.
pub struct CustomerState {
    pub identity: CustomerIdentityService<Arc<dyn CustomerRepository>>,
}

#[derive(Deserialize)]
pub struct UpsertCustomerRequest {
    pub idn: String,
}

/// POST /customers — resolve or create the customer for an identifier.
#[tracing::instrument(skip(state, payload))]
pub async fn upsert(
    State(state): State<Arc<CustomerState>>,
    payload: Result<Json<UpsertCustomerRequest>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    let Json(req) = payload?;
    let customer = state.identity.resolve_by_identifier(&req.idn).await?;
    Ok(Json(customer))
}

/// GET /customers/{idn} — look up a customer without creating it.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<CustomerState>>,
    Path(idn): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer = state.identity.get_by_identifier(&idn).await?;
    Ok(Json(customer))
}
