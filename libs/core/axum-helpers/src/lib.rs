//! # Axum Helpers
//!
//! Shared HTTP plumbing for the services in this workspace.
//!
//! - **[`server`]**: documented router assembly, `/health`, readiness probes, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: the `ErrorResponse` body and [`AppError`]
//! - **[`extractors`]**: [`IdPath`] and [`JsonBody`], both rejecting with `ErrorResponse`
//!
//! ```ignore
//! use axum_helpers::{cors_from_env, create_production_app, create_router, health_router};
//!
//! let cors = cors_from_env(&config.environment)?;
//! let router = create_router::<ApiDoc>(api_routes, cors).merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, JsonBody};
pub use http::{
    cors_from_env, create_cors_layer, create_permissive_cors_layer, parse_origins,
    security_headers,
};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
