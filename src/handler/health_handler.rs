use crate::config::database::{Database, DatabaseTrait};
use crate::response::app_response::SuccessResponse;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub database: DatabaseHealth,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DatabaseHealth {
    pub status: String,
    pub response_time_ms: Option<u128>,
    pub error: Option<String>,
}

pub async fn health_check(State(db): State<Arc<Database>>) -> SuccessResponse<HealthStatus> {
    let start = Instant::now();
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(db.get_pool())
        .await
    {
        Ok(_) => DatabaseHealth {
            status: "healthy".to_string(),
            response_time_ms: Some(start.elapsed().as_millis()),
            error: None,
        },
        Err(e) => DatabaseHealth {
            status: "unhealthy".to_string(),
            response_time_ms: None,
            error: Some(e.to_string()),
        },
    };

    let status = if database.status == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    SuccessResponse::send(HealthStatus {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
    })
}
