use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{NewProduct, Product, SearchCriteria};

/// Storage for products.
///
/// Listing methods order by `created_at` DESC, then `id` DESC. Each call is a
/// single statement; there are no multi-call transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// One unfiltered page.
    async fn find_page(&self, limit: u64, offset: u64) -> ProductResult<Vec<Product>>;

    /// Rows matching `criteria`, ignoring pagination.
    async fn count(&self, criteria: &SearchCriteria) -> ProductResult<u64>;

    async fn query_filtered(
        &self,
        criteria: &SearchCriteria,
        limit: u64,
        offset: u64,
    ) -> ProductResult<Vec<Product>>;

    /// Returns the stored row with its assigned id.
    async fn insert(&self, product: NewProduct) -> ProductResult<Product>;

    /// Writes every column of `product` over the row with the same id.
    async fn update(&self, product: Product) -> ProductResult<Product>;

    async fn remove(&self, product: Product) -> ProductResult<()>;
}
