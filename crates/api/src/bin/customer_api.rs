//! Customer service entry point.

use std::sync::Arc;

use api::config::{CUSTOMER_DEFAULT_PORT, Config};
use customer::{CustomerRepository, InMemoryCustomerRepository, PostgresCustomerRepository};

#[tokio::main]
async fn main() {
    // 1. Configuration and tracing
    let config = Config::from_env(CUSTOMER_DEFAULT_PORT);
    api::telemetry::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = api::telemetry::install_metrics_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Choose the customer store
    let repository: Arc<dyn CustomerRepository> = match api::connect_database(&config)
        .await
        .expect("failed to connect to database")
    {
        Some(pool) => {
            let repository = PostgresCustomerRepository::new(pool);
            repository
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("migrations applied");
            Arc::new(repository)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, customers are kept in memory");
            Arc::new(InMemoryCustomerRepository::new())
        }
    };

    // 4. Serve
    let app = api::customer_app(api::customer_state(repository), metrics_handle);
    api::serve(app, &config.addr())
        .await
        .expect("server error");
}
