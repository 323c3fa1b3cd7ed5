use async_trait::async_trait;
use common::{CustomerId, ShipmentId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::entity::{INITIAL_STATUS, NewShipment, Shipment};
use crate::error::StoreError;
use crate::repository::ShipmentRepository;

const CUSTOMER_FOREIGN_KEY: &str = "fk_shipments_customer";

/// PostgreSQL-backed shipment repository.
#[derive(Clone)]
pub struct PostgresShipmentRepository {
    pool: PgPool,
}

impl PostgresShipmentRepository {
    /// Creates a new PostgreSQL shipment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_shipment(row: PgRow) -> Result<Shipment, StoreError> {
        Ok(Shipment {
            id: ShipmentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            route: row.try_get("route")?,
            price: row.try_get("price")?,
            status: row.try_get("status")?,
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ShipmentRepository for PostgresShipmentRepository {
    async fn create(&self, shipment: NewShipment) -> Result<Shipment, StoreError> {
        let customer_id = shipment.customer_id;

        let row = sqlx::query(
            r#"
            INSERT INTO shipments (id, route, price, status, customer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, route, price, status, customer_id, created_at
            "#,
        )
        .bind(ShipmentId::new().as_uuid())
        .bind(&shipment.route)
        .bind(shipment.price)
        .bind(INITIAL_STATUS)
        .bind(customer_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(CUSTOMER_FOREIGN_KEY) =>
            {
                StoreError::MissingCustomer(customer_id)
            }
            other => StoreError::Database(other),
        })?;

        Self::row_to_shipment(row)
    }

    async fn get_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, StoreError> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, route, price, status, customer_id, created_at
            FROM shipments
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_shipment).transpose()
    }

    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Shipment>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, route, price, status, customer_id, created_at
            FROM shipments
            WHERE customer_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_shipment).collect()
    }
}
