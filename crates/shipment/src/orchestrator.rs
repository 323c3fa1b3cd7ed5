//! Shipment-creation workflow spanning the customer service and the shipment store.

use common::ShipmentId;

use crate::client::{ClientError, CustomerServiceClient};
use crate::entity::{CreateShipmentRequest, NewShipment, Shipment};
use crate::error::{Result, ShipmentError};
use crate::repository::ShipmentRepository;

/// Step name: resolve the customer through the customer service.
pub const STEP_RESOLVE_CUSTOMER: &str = "resolve_customer";

/// Step name: insert the shipment row.
pub const STEP_PERSIST_SHIPMENT: &str = "persist_shipment";

/// Step name: load a shipment by id.
pub const STEP_LOAD_SHIPMENT: &str = "load_shipment";

/// Sequences customer resolution and shipment persistence.
///
/// Holds no per-request state; concurrent requests share only the
/// customer service and the shipment store behind their traits. Dropping a
/// `create_shipment` future abandons the workflow at its next await point,
/// so a cancelled request never reaches a later step.
pub struct ShipmentOrchestrator<C, R>
where
    C: CustomerServiceClient,
    R: ShipmentRepository,
{
    customers: C,
    shipments: R,
}

impl<C, R> ShipmentOrchestrator<C, R>
where
    C: CustomerServiceClient,
    R: ShipmentRepository,
{
    /// Creates a new orchestrator.
    pub fn new(customers: C, shipments: R) -> Self {
        Self {
            customers,
            shipments,
        }
    }

    /// Returns the customer service client.
    pub fn customers(&self) -> &C {
        &self.customers
    }

    /// Returns the shipment repository.
    pub fn shipments(&self) -> &R {
        &self.shipments
    }

    /// Creates a shipment for the customer named by `request.customer.idn`.
    ///
    /// Steps run strictly in order:
    /// 1. Resolve (upsert) the customer remotely. On failure nothing is written.
    /// 2. Insert the shipment referencing the resolved customer id. On failure
    ///    the customer from step 1 remains; retrying the whole call is safe
    ///    because resolution is idempotent.
    ///
    /// The returned shipment is the row reported by the insert itself, so the
    /// caller always sees exactly what was persisted.
    #[tracing::instrument(
        skip(self, request),
        fields(route = %request.route, price = request.price, customer_idn = %request.customer.idn)
    )]
    pub async fn create_shipment(&self, request: CreateShipmentRequest) -> Result<Shipment> {
        request.validate()?;
        let started = std::time::Instant::now();
        let CreateShipmentRequest {
            route,
            price,
            customer: customer_ref,
        } = request;

        // 1. Resolve customer
        tracing::info!(step = STEP_RESOLVE_CUSTOMER, "workflow step started");
        let customer = match self.customers.upsert_customer(&customer_ref.idn).await {
            Ok(customer) if customer.idn != customer_ref.idn => {
                return Err(self.fail_resolution(
                    &customer_ref.idn,
                    ClientError::IdentityMismatch {
                        requested: customer_ref.idn.clone(),
                        returned: customer.idn,
                    },
                ));
            }
            Ok(customer) => customer,
            Err(source) => return Err(self.fail_resolution(&customer_ref.idn, source)),
        };
        tracing::info!(customer_id = %customer.id, "customer resolved");

        // 2. Persist shipment
        tracing::info!(step = STEP_PERSIST_SHIPMENT, "workflow step started");
        let shipment = self
            .shipments
            .create(NewShipment::new(route, price, customer.id))
            .await
            .map_err(|source| {
                metrics::counter!("shipment_create_failures_total", "step" => STEP_PERSIST_SHIPMENT)
                    .increment(1);
                tracing::error!(
                    customer_id = %customer.id,
                    error = %source,
                    "shipment insert failed; resolved customer is kept"
                );
                ShipmentError::Persistence {
                    step: STEP_PERSIST_SHIPMENT,
                    source,
                }
            })?;

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("shipment_create_duration_seconds").record(duration);
        metrics::counter!("shipments_created_total").increment(1);
        tracing::info!(
            shipment_id = %shipment.id,
            customer_id = %shipment.customer_id,
            status = %shipment.status,
            duration,
            "shipment created"
        );

        Ok(shipment)
    }

    /// Loads a shipment by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_shipment(&self, id: ShipmentId) -> Result<Shipment> {
        let shipment = self
            .shipments
            .get_by_id(id)
            .await
            .map_err(|source| ShipmentError::Persistence {
                step: STEP_LOAD_SHIPMENT,
                source,
            })?
            .ok_or(ShipmentError::NotFound(id))?;

        tracing::info!(route = %shipment.route, status = %shipment.status, "shipment loaded");
        Ok(shipment)
    }

    fn fail_resolution(&self, idn: &str, source: ClientError) -> ShipmentError {
        metrics::counter!("shipment_create_failures_total", "step" => STEP_RESOLVE_CUSTOMER)
            .increment(1);
        tracing::warn!(error = %source, "customer resolution failed; no shipment written");
        ShipmentError::CustomerResolution {
            idn: idn.to_string(),
            source,
        }
    }
}
