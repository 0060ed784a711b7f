//! Product Service - business rules

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Page, PageRequest, Product, ProductInput, SearchCriteria};
use crate::repository::ProductRepository;
use crate::validation::{InputValidator, ProductInputValidator, ValidationMode};

/// Operations the HTTP layer calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Newest first. `page` is raised to 1 and `limit` held within 1..=100.
    async fn list(&self, page: i64, limit: i64) -> ProductResult<Page<Product>>;

    /// Fails with [`ProductError::NotFound`] when no row has this id.
    async fn get_by_id(&self, id: i32) -> ProductResult<Product>;

    /// Validates every field, stamps `created_at` and stores the product.
    /// Returns the stored row with its assigned id.
    async fn create(&self, input: ProductInput) -> ProductResult<Product>;

    /// Replaces all fields, or with `partial` only the present ones.
    async fn update(&self, id: i32, input: ProductInput, partial: bool)
    -> ProductResult<Product>;

    /// Removes the row permanently. Fails with [`ProductError::NotFound`]
    /// when it does not exist.
    async fn delete(&self, id: i32) -> ProductResult<()>;

    /// Same paging rules as [`list`](Self::list), `total` counts every match.
    async fn search(
        &self,
        criteria: SearchCriteria,
        page: i64,
        limit: i64,
    ) -> ProductResult<Page<Product>>;
}

/// Validation runs before any write; a rejected input never reaches the
/// repository.
pub struct ProductService<R: ProductRepository, V: InputValidator = ProductInputValidator> {
    repository: Arc<R>,
    validator: Arc<V>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_validator(repository, ProductInputValidator)
    }
}

impl<R: ProductRepository, V: InputValidator> ProductService<R, V> {
    pub fn with_validator(repository: R, validator: V) -> Self {
        Self {
            repository: Arc::new(repository),
            validator: Arc::new(validator),
        }
    }

    async fn load(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    fn check(&self, input: &ProductInput, mode: ValidationMode) -> ProductResult<()> {
        self.validator
            .validate(input, mode)
            .map_err(ProductError::Validation)
    }
}

impl<R: ProductRepository, V: InputValidator> Clone for ProductService<R, V> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            validator: Arc::clone(&self.validator),
        }
    }
}

#[async_trait]
impl<R, V> ProductCatalog for ProductService<R, V>
where
    R: ProductRepository + 'static,
    V: InputValidator + 'static,
{
    #[instrument(skip(self))]
    async fn list(&self, page: i64, limit: i64) -> ProductResult<Page<Product>> {
        let request = PageRequest::new(page, limit);

        let total = self.repository.count(&SearchCriteria::default()).await?;
        let items = self
            .repository
            .find_page(request.limit, request.offset())
            .await?;

        tracing::debug!(total, returned = items.len(), "Listed products");
        Ok(Page::new(items, total, request))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> ProductResult<Product> {
        self.load(id).await
    }

    #[instrument(skip(self, input), fields(product_name = ?input.name))]
    async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let input = input.normalized();
        self.check(&input, ValidationMode::Full)?;

        let new_product = NewProduct::from_validated(input, Utc::now());
        let product = self.repository.insert(new_product).await?;

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        id: i32,
        input: ProductInput,
        partial: bool,
    ) -> ProductResult<Product> {
        let mut product = self.load(id).await?;
        let input = input.normalized();

        if partial {
            self.check(&input, ValidationMode::Partial)?;
            product.apply_partial(input);
        } else {
            self.check(&input, ValidationMode::Full)?;
            product.apply_full(input);
        }
        product.updated_at = Some(Utc::now());

        let product = self.repository.update(product).await?;
        tracing::info!(product_id = id, partial, "Updated product");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> ProductResult<()> {
        let product = self.load(id).await?;
        self.repository.remove(product).await?;

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        criteria: SearchCriteria,
        page: i64,
        limit: i64,
    ) -> ProductResult<Page<Product>> {
        let request = PageRequest::new(page, limit);

        let total = self.repository.count(&criteria).await?;
        let items = self
            .repository
            .query_filtered(&criteria, request.limit, request.offset())
            .await?;

        tracing::debug!(total, returned = items.len(), "Searched products");
        Ok(Page::new(items, total, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrors;
    use crate::memory::InMemoryProductRepository;
    use crate::repository::MockProductRepository;
    use crate::validation::MockInputValidator;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use sea_orm::DbErr;

    fn stored(id: i32) -> Product {
        Product {
            id,
            name: "Wireless Keyboard".into(),
            description: Some("Compact".into()),
            price: Decimal::new(4999, 2),
            quantity: 25,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn keyboard() -> ProductInput {
        ProductInput {
            name: Some("Wireless Keyboard".into()),
            description: Some("Compact".into()),
            price: Some(Decimal::new(4999, 2)),
            quantity: Some(25),
        }
    }

    fn rejecting_validator() -> MockInputValidator {
        let mut validator = MockInputValidator::new();
        validator.expect_validate().returning(|_, _| {
            let mut errors = FieldErrors::new();
            errors.insert("name".into(), "Name is required.".into());
            Err(errors)
        });
        validator
    }

    #[tokio::test]
    async fn test_list_clamps_page_and_limit() {
        let mut repo = MockProductRepository::new();
        repo.expect_count()
            .withf(|criteria| *criteria == SearchCriteria::default())
            .returning(|_| Ok(250));
        repo.expect_find_page()
            .with(eq(100), eq(0))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let page = ProductService::new(repo).list(0, 500).await.unwrap();

        assert_eq!((page.page, page.limit), (1, 100));
        assert_eq!(page.page_count, 3);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_offset_follows_page() {
        let mut repo = MockProductRepository::new();
        repo.expect_count().returning(|_| Ok(21));
        repo.expect_find_page()
            .with(eq(10), eq(20))
            .times(1)
            .returning(|_, _| Ok(vec![stored(1)]));

        let page = ProductService::new(repo).list(3, 10).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page_count, 3);
    }

    #[tokio::test]
    async fn test_get_by_id_is_repeatable_without_writes() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create(keyboard()).await.unwrap();

        let first = service.get_by_id(created.id).await.unwrap();
        let second = service.get_by_id(created.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, created);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().with(eq(9)).returning(|_| Ok(None));

        let result = ProductService::new(repo).get_by_id(9).await;
        assert!(matches!(result, Err(ProductError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_create_rejected_input_is_never_inserted() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().never();

        let service = ProductService::with_validator(repo, rejecting_validator());
        let result = service.create(ProductInput::default()).await;

        match result {
            Err(ProductError::Validation(errors)) => {
                assert_eq!(errors["name"], "Name is required.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_price_and_stamps_created_at() {
        let before = Utc::now();
        let mut repo = MockProductRepository::new();
        repo.expect_insert()
            .withf(|p| p.price.to_string() == "10.01" && p.description.is_none())
            .times(1)
            .returning(|p| {
                Ok(Product {
                    id: 1,
                    name: p.name,
                    description: p.description,
                    price: p.price,
                    quantity: p.quantity,
                    created_at: p.created_at,
                    updated_at: None,
                })
            });

        let product = ProductService::new(repo)
            .create(ProductInput {
                name: Some("Cable".into()),
                description: None,
                price: Some(Decimal::new(10005, 3)),
                quantity: Some(0),
            })
            .await
            .unwrap();

        assert_eq!(product.id, 1);
        assert!(product.created_at >= before);
        assert_eq!(product.updated_at, None);
        assert!(!product.in_stock());
    }

    #[tokio::test]
    async fn test_update_checks_existence_before_validation() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();
        let mut validator = MockInputValidator::new();
        validator.expect_validate().never();

        let service = ProductService::with_validator(repo, validator);
        let result = service.update(5, ProductInput::default(), false).await;

        assert!(matches!(result, Err(ProductError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_update_rejected_input_is_never_written() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(stored(id))));
        repo.expect_update().never();

        let service = ProductService::with_validator(repo, rejecting_validator());
        let result = service.update(1, keyboard(), true).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_uses_partial_mode_for_patch() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(stored(id))));
        repo.expect_update().returning(Ok);
        let mut validator = MockInputValidator::new();
        validator
            .expect_validate()
            .withf(|_, mode| *mode == ValidationMode::Partial)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ProductService::with_validator(repo, validator);
        let updated = service
            .update(1, ProductInput::default(), true)
            .await
            .unwrap();

        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_partial_update_preserves_absent_fields() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create(keyboard()).await.unwrap();

        let patched = service
            .update(
                created.id,
                ProductInput {
                    price: Some(Decimal::new(3999, 2)),
                    ..Default::default()
                },
                true,
            )
            .await
            .unwrap();

        assert_eq!(patched.price, Decimal::new(3999, 2));
        assert_eq!(patched.name, created.name);
        assert_eq!(patched.description, created.description);
        assert_eq!(patched.quantity, created.quantity);
        assert_eq!(patched.created_at, created.created_at);
        assert!(patched.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_full_update_overwrites_every_field() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create(keyboard()).await.unwrap();

        let replaced = service
            .update(
                created.id,
                ProductInput {
                    name: Some("Mouse".into()),
                    description: None,
                    price: Some(Decimal::new(1999, 2)),
                    quantity: Some(0),
                },
                false,
            )
            .await
            .unwrap();

        assert_eq!(replaced.name, "Mouse");
        assert_eq!(replaced.description, None);
        assert_eq!(replaced.quantity, 0);
        assert_eq!(service.get_by_id(created.id).await.unwrap(), replaced);
    }

    #[tokio::test]
    async fn test_full_update_requires_all_fields() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create(keyboard()).await.unwrap();

        let result = service
            .update(
                created.id,
                ProductInput {
                    price: Some(Decimal::new(3999, 2)),
                    ..Default::default()
                },
                false,
            )
            .await;

        match result {
            Err(ProductError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains_key("name"));
                assert!(errors.contains_key("quantity"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(service.get_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let created = service.create(keyboard()).await.unwrap();

        service.delete(created.id).await.unwrap();

        assert!(matches!(
            service.get_by_id(created.id).await,
            Err(ProductError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(created.id).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_counts_full_predicate() {
        let mut repo = MockProductRepository::new();
        repo.expect_count()
            .withf(|criteria| criteria.in_stock)
            .returning(|_| Ok(12));
        repo.expect_query_filtered()
            .withf(|criteria, limit, offset| criteria.in_stock && *limit == 5 && *offset == 5)
            .times(1)
            .returning(|_, _, _| Ok(vec![stored(3)]));

        let criteria = SearchCriteria {
            in_stock: true,
            ..Default::default()
        };
        let page = ProductService::new(repo)
            .search(criteria, 2, 5)
            .await
            .unwrap();

        assert_eq!(page.total, 12);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates_unchanged() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(DbErr::Custom("connection reset".into()).into()));

        let result = ProductService::new(repo).get_by_id(1).await;
        assert!(matches!(result, Err(ProductError::Database(DbErr::Custom(_)))));
    }
}
