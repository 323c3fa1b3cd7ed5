//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p customer --test postgres_integration -- --test-threads=1
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use customer::{
    CustomerError, CustomerIdentityService, CustomerRepository, PostgresCustomerRepository,
};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresCustomerRepository::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh repository with its own pool and cleared tables
async fn get_test_repository() -> PostgresCustomerRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE shipments, customers")
        .execute(&pool)
        .await
        .unwrap();

    PostgresCustomerRepository::new(pool)
}

async fn customer_rows(repo: &PostgresCustomerRepository) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM customers")
        .fetch_one(repo.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn upsert_inserts_then_returns_existing_row() {
    let repo = get_test_repository().await;

    let first = repo.upsert_by_idn("IDN123").await.unwrap();
    let second = repo.upsert_by_idn("IDN123").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(second.idn, "IDN123");
    assert_eq!(customer_rows(&repo).await, 1);
}

#[tokio::test]
#[serial]
async fn concurrent_upserts_insert_one_row() {
    let repo = get_test_repository().await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.upsert_by_idn("RACE").await })
        })
        .collect();

    let ids: HashSet<_> = futures_util::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().id)
        .collect();

    assert_eq!(ids.len(), 1);
    assert_eq!(customer_rows(&repo).await, 1);
}

#[tokio::test]
#[serial]
async fn distinct_identifiers_produce_two_rows() {
    let repo = get_test_repository().await;

    repo.upsert_by_idn("A").await.unwrap();
    repo.upsert_by_idn("B").await.unwrap();
    repo.upsert_by_idn("A").await.unwrap();

    assert_eq!(customer_rows(&repo).await, 2);
}

#[tokio::test]
#[serial]
async fn get_by_idn_returns_none_when_absent() {
    let repo = get_test_repository().await;

    assert!(repo.get_by_idn("missing").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn service_reports_not_found() {
    let service = CustomerIdentityService::new(get_test_repository().await);

    let err = service.get_by_identifier("missing").await.unwrap_err();

    assert!(matches!(err, CustomerError::NotFound { .. }));
}
