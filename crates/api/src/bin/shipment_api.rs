//! Shipment service entry point.

use std::sync::Arc;

use api::config::{Config, SHIPMENT_DEFAULT_PORT};
use shipment::{
    CustomerServiceClient, HttpCustomerClient, InMemoryShipmentRepository,
    PostgresShipmentRepository, ShipmentRepository,
};

#[tokio::main]
async fn main() {
    // 1. Configuration and tracing
    let config = Config::from_env(SHIPMENT_DEFAULT_PORT);
    api::telemetry::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = api::telemetry::install_metrics_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Customer service client
    let customers: Arc<dyn CustomerServiceClient> = Arc::new(
        HttpCustomerClient::new(
            &config.customer_service_url,
            config.customer_service_timeout,
        )
        .expect("invalid customer service configuration"),
    );
    tracing::info!(url = %config.customer_service_url, "customer service client ready");

    // 4. Choose the shipment store
    let shipments: Arc<dyn ShipmentRepository> = match api::connect_database(&config)
        .await
        .expect("failed to connect to database")
    {
        Some(pool) => {
            let repository = PostgresShipmentRepository::new(pool);
            repository
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("migrations applied");
            Arc::new(repository)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, shipments are kept in memory");
            Arc::new(InMemoryShipmentRepository::new())
        }
    };

    // 5. Serve
    let app = api::shipment_app(api::shipment_state(customers, shipments), metrics_handle);
    api::serve(app, &config.addr())
        .await
        .expect("server error");
}
