use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerId;
use tokio::sync::RwLock;

use crate::{Customer, Result, repository::CustomerRepository};

#[derive(Default)]
struct InMemoryCustomerState {
    by_idn: HashMap<String, Customer>,
    ids: HashSet<CustomerId>,
}

/// In-memory customer repository for tests and database-less runs.
///
/// The upsert holds the write lock for the whole check-then-insert, which
/// gives the same single-row guarantee as the Postgres conflict clause.
#[derive(Clone, Default)]
pub struct InMemoryCustomerRepository {
    state: Arc<RwLock<InMemoryCustomerState>>,
}

impl InMemoryCustomerRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored customers.
    pub async fn customer_count(&self) -> usize {
        self.state.read().await.by_idn.len()
    }

    /// Returns true if a customer with this id exists.
    pub async fn contains_id(&self, id: CustomerId) -> bool {
        self.state.read().await.ids.contains(&id)
    }

    /// Returns a snapshot of all stored customers.
    pub async fn all(&self) -> Vec<Customer> {
        self.state.read().await.by_idn.values().cloned().collect()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn upsert_by_idn(&self, idn: &str) -> Result<Customer> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let customer = state
            .by_idn
            .entry(idn.to_string())
            .or_insert_with(|| Customer::new(idn));
        state.ids.insert(customer.id);
        Ok(customer.clone())
    }

    async fn get_by_idn(&self, idn: &str) -> Result<Option<Customer>> {
        Ok(self.state.read().await.by_idn.get(idn).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_creates_then_returns_existing() {
        let repo = InMemoryCustomerRepository::new();

        let first = repo.upsert_by_idn("IDN123").await.unwrap();
        let second = repo.upsert_by_idn("IDN123").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.customer_count().await, 1);
    }

    #[tokio::test]
    async fn get_by_idn_does_not_create() {
        let repo = InMemoryCustomerRepository::new();

        assert!(repo.get_by_idn("missing").await.unwrap().is_none());
        assert_eq!(repo.customer_count().await, 0);
    }

    #[tokio::test]
    async fn contains_id_tracks_inserted_rows() {
        let repo = InMemoryCustomerRepository::new();
        let customer = repo.upsert_by_idn("A").await.unwrap();

        assert!(repo.contains_id(customer.id).await);
        assert!(!repo.contains_id(CustomerId::new()).await);
    }

    #[tokio::test]
    async fn id_index_tracks_one_entry_per_identifier() {
        let repo = InMemoryCustomerRepository::new();
        let mut ids = Vec::new();
        for n in 0..50 {
            ids.push(repo.upsert_by_idn(&format!("IDN-{n}")).await.unwrap().id);
            repo.upsert_by_idn(&format!("IDN-{n}")).await.unwrap();
        }

        assert_eq!(repo.state.read().await.ids.len(), 50);
        for id in ids {
            assert!(repo.contains_id(id).await);
        }
    }
}
