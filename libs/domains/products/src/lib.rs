//! Products Domain
//!
//! CRUD and filtered search over the `products` table.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, status mapping
//! └──────┬──────┘
//!        │ ProductCatalog
//! ┌──────▼──────┐     ┌────────────────┐
//! │   Service   │────►│ InputValidator │  ← field rules, full / partial
//! └──────┬──────┘     └────────────────┘
//!        │ ProductRepository
//! ┌──────▼──────┐
//! │ Repository  │  ← PostgreSQL (SeaORM) or in-memory
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, ProductInput, Page
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{PgProductRepository, ProductService, handlers};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/catalog").await?;
//!
//! let service = ProductService::new(PgProductRepository::new(db));
//! let router: axum::Router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{FieldErrors, ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{
    NewProduct, Page, Product, ProductInput, ProductListResponse, ProductResponse, SearchCriteria,
};
pub use postgres::PgProductRepository;
pub use repository::ProductRepository;
pub use service::{ProductCatalog, ProductService};
pub use validation::{InputValidator, ProductInputValidator, ValidationMode};
