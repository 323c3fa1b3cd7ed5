//! Shipment creation and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ShipmentId;
use shipment::{
    CreateShipmentRequest, CustomerServiceClient, Shipment, ShipmentOrchestrator,
    ShipmentRepository,
};

use crate::error::ApiError;

/// Orchestrator over type-erased collaborators, chosen at startup.
pub type DynShipmentOrchestrator =
    ShipmentOrchestrator<Arc<dyn CustomerServiceClient>, Arc<dyn ShipmentRepository>>;

/// Shared state of the shipment service.
pub struct ShipmentState {
    pub orchestrator: DynShipmentOrchestrator,
}

/// POST /api/v1/shipments — create a shipment for a customer identifier.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<ShipmentState>>,
    payload: Result<Json<CreateShipmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Shipment>), ApiError> {
    let Json(req) = payload?;
    let shipment = state.orchestrator.create_shipment(req).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// GET /api/v1/shipments/{id} — load a shipment by id.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<ShipmentState>>,
    Path(id): Path<String>,
) -> Result<Json<Shipment>, ApiError> {
    let id: ShipmentId = id
        .parse()
        .map_err(|e: common::IdParseError| ApiError::BadRequest(e.to_string()))?;
    let shipment = state.orchestrator.get_shipment(id).await?;
    Ok(Json(shipment))
}
