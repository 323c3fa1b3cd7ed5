use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CustomerId, ShipmentId};
use customer::InMemoryCustomerRepository;

use crate::entity::{NewShipment, Shipment};
use crate::error::StoreError;
use crate::repository::ShipmentRepository;

#[derive(Debug, Default)]
struct InMemoryShipmentState {
    shipments: HashMap<ShipmentId, Shipment>,
    fail_on_create: bool,
}

/// In-memory shipment repository for testing.
///
/// When built with [`with_customers`](Self::with_customers) it enforces the
/// customer reference the way the Postgres foreign key does.
#[derive(Clone, Default)]
pub struct InMemoryShipmentRepository {
    state: Arc<RwLock<InMemoryShipmentState>>,
    customers: Option<InMemoryCustomerRepository>,
}

impl InMemoryShipmentRepository {
    /// Creates a repository that accepts any customer id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that rejects shipments for unknown customers.
    pub fn with_customers(customers: InMemoryCustomerRepository) -> Self {
        Self {
            state: Arc::default(),
            customers: Some(customers),
        }
    }

    /// Configures the repository to fail every create call.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of stored shipments.
    pub fn shipment_count(&self) -> usize {
        self.state.read().unwrap().shipments.len()
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentRepository {
    async fn create(&self, shipment: NewShipment) -> Result<Shipment, StoreError> {
        if let Some(customers) = &self.customers {
            if !customers.contains_id(shipment.customer_id).await {
                return Err(StoreError::MissingCustomer(shipment.customer_id));
            }
        }

        let mut state = self.state.write().unwrap();
        if state.fail_on_create {
            return Err(StoreError::Unavailable(
                "Shipment store rejected write".to_string(),
            ));
        }

        let shipment = shipment.into_shipment();
        state.shipments.insert(shipment.id, shipment.clone());
        Ok(shipment)
    }

    async fn get_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        Ok(self.state.read().unwrap().shipments.get(&id).cloned())
    }

    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Shipment>, StoreError> {
        let state = self.state.read().unwrap();
        let mut shipments: Vec<_> = state
            .shipments
            .values()
            .filter(|s| s.customer_id == customer_id)
            .cloned()
            .collect();
        shipments.sort_by_key(|s| s.created_at);
        Ok(shipments)
    }
}
