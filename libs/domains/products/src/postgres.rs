use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, sea_query::LikeExpr,
};

use crate::{
    entity,
    error::ProductResult,
    models::{NewProduct, Product, SearchCriteria},
    repository::ProductRepository,
};

/// [`ProductRepository`] over the `products` table.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `%fragment%` with `\`, `%` and `_` escaped, so the fragment matches literally.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn condition(criteria: &SearchCriteria) -> Condition {
    let mut condition = Condition::all();

    if let Some(name) = &criteria.name {
        let pattern = LikeExpr::new(contains_pattern(name)).escape('\\');
        condition = condition.add(entity::Column::Name.like(pattern));
    }
    if let Some(min) = criteria.min_price {
        condition = condition.add(entity::Column::Price.gte(min));
    }
    if let Some(max) = criteria.max_price {
        condition = condition.add(entity::Column::Price.lte(max));
    }
    if criteria.in_stock {
        condition = condition.add(entity::Column::Quantity.gt(0));
    }

    condition
}

/// No `WHERE` clause at all when nothing restricts.
fn filtered(criteria: &SearchCriteria) -> Select<entity::Entity> {
    let select = entity::Entity::find();
    if *criteria == SearchCriteria::default() {
        select
    } else {
        select.filter(condition(criteria))
    }
}

fn ordered_window(
    criteria: &SearchCriteria,
    limit: u64,
    offset: u64,
) -> Select<entity::Entity> {
    filtered(criteria)
        .order_by_desc(entity::Column::CreatedAt)
        .order_by_desc(entity::Column::Id)
        .limit(limit)
        .offset(offset)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_page(&self, limit: u64, offset: u64) -> ProductResult<Vec<Product>> {
        self.query_filtered(&SearchCriteria::default(), limit, offset)
            .await
    }

    async fn count(&self, criteria: &SearchCriteria) -> ProductResult<u64> {
        let total = filtered(criteria).count(&self.db)
            .await?;
        Ok(total)
    }

    async fn query_filtered(
        &self,
        criteria: &SearchCriteria,
        limit: u64,
        offset: u64,
    ) -> ProductResult<Vec<Product>> {
        let models = ordered_window(criteria, limit, offset)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, product: NewProduct) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = product.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Inserted product");
        Ok(model.into())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = product.into();
        let model = active_model.update(&self.db).await?;

        tracing::info!(product_id = model.id, "Updated product");
        Ok(model.into())
    }

    async fn remove(&self, product: Product) -> ProductResult<()> {
        let result = entity::Entity::delete_by_id(product.id)
            .exec(&self.db)
            .await?;

        tracing::info!(
            product_id = product.id,
            rows_affected = result.rows_affected,
            "Removed product"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, QueryTrait};

    fn model(id: i32, quantity: i32) -> entity::Model {
        entity::Model {
            id,
            name: "Wireless Keyboard".into(),
            description: None,
            price: Decimal::new(4999, 2),
            quantity,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(7, 3)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.find_by_id(7).await.unwrap().unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.price, Decimal::new(4999, 2));
        assert_eq!(
            product.created_at,
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
        );
        assert!(product.in_stock());
    }

    #[tokio::test]
    async fn test_find_by_id_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(42, 0)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let stored = repo
            .insert(NewProduct {
                name: "Wireless Keyboard".into(),
                description: None,
                price: Decimal::new(4999, 2),
                quantity: 0,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(stored.id, 42);
        assert_eq!(stored.updated_at, None);
    }

    #[tokio::test]
    async fn test_remove_executes_delete() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product: Product = model(5, 1).into();
        assert!(repo.remove(product).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(matches!(
            repo.find_page(10, 0).await,
            Err(crate::ProductError::Database(_))
        ));
    }

    #[test]
    fn test_window_query_filters_and_orders() {
        let criteria = SearchCriteria {
            name: Some("Key".into()),
            min_price: Some(Decimal::from(10)),
            max_price: None,
            in_stock: true,
        };
        let sql = ordered_window(&criteria, 10, 20)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""products"."name" LIKE '%Key%'"#), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
        assert!(sql.contains(r#""products"."price" >="#), "{sql}");
        assert!(!sql.contains(r#""products"."price" <="#), "{sql}");
        assert!(sql.contains(r#""products"."quantity" > 0"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "products"."created_at" DESC, "products"."id" DESC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT 10 OFFSET 20"), "{sql}");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Key"), "%Key%");
        assert_eq!(contains_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn test_underscore_search_is_literal() {
        let criteria = SearchCriteria {
            name: Some("_".into()),
            ..Default::default()
        };
        let sql = ordered_window(&criteria, 10, 0)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(!sql.contains("'%_%'"), "{sql}");
        assert!(sql.contains(r"\_"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn test_empty_criteria_has_no_where_clause() {
        let sql = ordered_window(&SearchCriteria::default(), 10, 0)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(!sql.contains("WHERE"), "{sql}");
    }
}
