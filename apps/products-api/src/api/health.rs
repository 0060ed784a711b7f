//! Readiness probe backed by a real PostgreSQL round trip.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health_detailed;

use crate::state::AppState;

pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            let status = check_health_detailed(&state.db).await;
            tracing::debug!(latency_ms = status.latency.as_millis() as u64, "Database probe");
            if status.healthy {
                Ok(())
            } else {
                Err(status
                    .message
                    .unwrap_or_else(|| "Database ping failed".to_string()))
            }
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
