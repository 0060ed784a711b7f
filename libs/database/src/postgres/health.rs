use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::common::DatabaseError;

/// Runs `SELECT 1` against the pool.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    debug!("PostgreSQL health check passed");
    Ok(())
}

/// Outcome of a timed health probe.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: Option<String>,
    pub latency: Duration,
}

impl HealthStatus {
    fn from_result(result: Result<(), DatabaseError>, latency: Duration) -> Self {
        match result {
            Ok(()) => Self {
                healthy: true,
                message: None,
                latency,
            },
            Err(e) => Self {
                healthy: false,
                message: Some(e.to_string()),
                latency,
            },
        }
    }
}

pub async fn check_health_detailed(db: &DatabaseConnection) -> HealthStatus {
    let start = Instant::now();
    let result = check_health(db).await;
    HealthStatus::from_result(result, start.elapsed())
}
