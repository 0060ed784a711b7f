//! In-process [`ProductRepository`] for development and tests.

use async_trait::async_trait;
use sea_orm::DbErr;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, SearchCriteria};
use crate::repository::ProductRepository;

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn ordered(&self, criteria: &SearchCriteria) -> Vec<Product> {
        let store = self.store.read().await;
        let mut rows: Vec<Product> = store
            .rows
            .values()
            .filter(|p| criteria.matches(p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows
    }
}

fn window(rows: Vec<Product>, limit: u64, offset: u64) -> Vec<Product> {
    rows.into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect()
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        Ok(self.store.read().await.rows.get(&id).cloned())
    }

    async fn find_page(&self, limit: u64, offset: u64) -> ProductResult<Vec<Product>> {
        let rows = self.ordered(&SearchCriteria::default()).await;
        Ok(window(rows, limit, offset))
    }

    async fn count(&self, criteria: &SearchCriteria) -> ProductResult<u64> {
        let store = self.store.read().await;
        Ok(store.rows.values().filter(|p| criteria.matches(p)).count() as u64)
    }

    async fn query_filtered(
        &self,
        criteria: &SearchCriteria,
        limit: u64,
        offset: u64,
    ) -> ProductResult<Vec<Product>> {
        let rows = self.ordered(criteria).await;
        Ok(window(rows, limit, offset))
    }

    async fn insert(&self, product: NewProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        store.last_id += 1;

        let stored = Product {
            id: store.last_id,
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            created_at: product.created_at,
            updated_at: None,
        };
        store.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        match store.rows.get_mut(&product.id) {
            Some(row) => {
                *row = product.clone();
                Ok(product)
            }
            None => Err(DbErr::RecordNotUpdated.into()),
        }
    }

    async fn remove(&self, product: Product) -> ProductResult<()> {
        self.store.write().await.rows.remove(&product.id);
        Ok(())
    }
}
