//! Identity resolution behavior against the in-memory repository.

use std::collections::HashSet;
use std::sync::Arc;

use customer::{CustomerIdentityService, InMemoryCustomerRepository};

fn service() -> Arc<CustomerIdentityService<InMemoryCustomerRepository>> {
    Arc::new(CustomerIdentityService::new(
        InMemoryCustomerRepository::new(),
    ))
}

#[tokio::test]
async fn sequential_resolution_is_idempotent() {
    let service = service();

    let first = service.resolve_by_identifier("X-100").await.unwrap();
    let second = service.resolve_by_identifier("X-100").await.unwrap();

    assert_eq!(first.id, second.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolution_converges_on_one_row() {
    let service = service();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.resolve_by_identifier("SAME").await })
        })
        .collect();

    let results = futures_util::future::join_all(handles).await;
    let ids: HashSet<_> = results
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().id)
        .collect();

    assert_eq!(ids.len(), 1);
    assert_eq!(service.repository().customer_count().await, 1);
}

#[tokio::test]
async fn distinct_identifiers_get_distinct_rows() {
    let service = service();

    let a1 = service.resolve_by_identifier("A").await.unwrap();
    let b = service.resolve_by_identifier("B").await.unwrap();
    let a2 = service.resolve_by_identifier("A").await.unwrap();

    assert_eq!(a1.id, a2.id);
    assert_ne!(a1.id, b.id);
    assert_eq!(service.repository().customer_count().await, 2);
}

#[tokio::test]
async fn lookup_after_resolution_finds_same_customer() {
    let service = service();

    let resolved = service.resolve_by_identifier("IDN123").await.unwrap();
    let found = service.get_by_identifier("IDN123").await.unwrap();

    assert_eq!(resolved.id, found.id);
    assert_eq!(found.idn, "IDN123");
}
