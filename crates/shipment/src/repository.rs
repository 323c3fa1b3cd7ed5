use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, ShipmentId};

use crate::entity::{NewShipment, Shipment};
use crate::error::StoreError;

/// Persistence contract for shipments.
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Inserts a shipment and returns the row exactly as persisted.
    ///
    /// Fails with [`StoreError::MissingCustomer`] if `customer_id` does not
    /// reference an existing customer.
    async fn create(&self, shipment: NewShipment) -> Result<Shipment, StoreError>;

    /// Loads a shipment by id.
    async fn get_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError>;

    /// Lists the shipments of one customer, oldest first.
    async fn list_by_customer(&self, customer_id: CustomerId)
    -> Result<Vec<Shipment>, StoreError>;
}

#[async_trait]
impl<T: ShipmentRepository + ?Sized> ShipmentRepository for Arc<T> {
    async fn create(&self, shipment: NewShipment) -> Result<Shipment, StoreError> {
        (**self).create(shipment).await
    }

    async fn get_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        (**self).get_by_id(id).await
    }

    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Shipment>, StoreError> {
        (**self).list_by_customer(customer_id).await
    }
}
