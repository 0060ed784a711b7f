//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}

/// `/ready`, probing PostgreSQL.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Value};
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn state(db: MockDatabase) -> AppState {
        AppState {
            db: db.into_connection(),
        }
    }

    async fn ready(state: AppState) -> (StatusCode, serde_json::Value) {
        let response = ready_router(state)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ready_when_database_answers() {
        let row = BTreeMap::from([("?column?", Value::from(1i32))]);
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![row]]);

        let (status, body) = ready(state(db)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_not_ready_when_database_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".into())]);

        let (status, body) = ready(state(db)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["database"], "disconnected");
    }

    #[tokio::test]
    async fn test_products_routes_are_mounted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".into())]);

        let response = routes(&state(db))
            .oneshot(Request::get("/products/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
