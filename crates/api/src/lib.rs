//! HTTP services for the customer identity and shipment components.
//!
//! Two routers are exposed, one per deployable service:
//! - [`customer_app`]: `POST /customers`, `GET /customers/{idn}`
//! - [`shipment_app`]: `POST /api/v1/shipments`, `GET /api/v1/shipments/{id}`
//!
//! Both carry `/health`, `/metrics`, CORS, request-id and HTTP tracing layers.

pub mod config;
pub mod correlation;
pub mod error;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use customer::{CustomerIdentityService, CustomerRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use shipment::{CustomerServiceClient, ShipmentOrchestrator, ShipmentRepository};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::customers::CustomerState;
use routes::shipments::ShipmentState;

/// Creates the customer service router.
pub fn customer_app(state: Arc<CustomerState>, metrics_handle: PrometheusHandle) -> Router {
    let api = Router::new()
        .route("/customers", post(routes::customers::upsert))
        .route("/customers/{idn}", get(routes::customers::get))
        .with_state(state)
        .merge(routes::health::router("customer"));

    with_common_layers(api, metrics_handle)
}

/// Creates the shipment service router.
pub fn shipment_app(state: Arc<ShipmentState>, metrics_handle: PrometheusHandle) -> Router {
    let api = Router::new()
        .route("/api/v1/shipments", post(routes::shipments::create))
        .route("/api/v1/shipments/{id}", get(routes::shipments::get))
        .with_state(state)
        .merge(routes::health::router("shipment"));

    with_common_layers(api, metrics_handle)
}

/// Layers shared by both services, innermost first. The request id is set
/// outermost so the trace span, the response and the handler all see it.
fn with_common_layers(router: Router, metrics_handle: PrometheusHandle) -> Router {
    router
        .merge(routes::metrics::router(metrics_handle))
        .layer(middleware::from_fn(correlation::scope_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(correlation::make_request_span))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Builds customer service state over any repository.
pub fn customer_state(repository: Arc<dyn CustomerRepository>) -> Arc<CustomerState> {
    Arc::new(CustomerState {
        identity: CustomerIdentityService::new(repository),
    })
}

/// Builds shipment service state over any customer client and repository.
pub fn shipment_state(
    customers: Arc<dyn CustomerServiceClient>,
    shipments: Arc<dyn ShipmentRepository>,
) -> Arc<ShipmentState> {
    Arc::new(ShipmentState {
        orchestrator: ShipmentOrchestrator::new(customers, shipments),
    })
}

/// Opens the Postgres pool when `DATABASE_URL` is configured.
pub async fn connect_database(config: &Config) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = config.database_url.as_deref() else {
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await?;
    tracing::info!("connected to database");
    Ok(Some(pool))
}

/// Binds `addr` and serves `app` until SIGINT or SIGTERM.
pub async fn serve(app: Router, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
