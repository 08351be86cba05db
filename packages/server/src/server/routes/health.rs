use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::DomainResult;
use crate::server::app::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub points_store: StoreHealth,
    pub favorites_store: StoreHealth,
    pub schedule_year: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StoreHealth {
    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

async fn probe<F>(ping: F) -> StoreHealth
where
    F: std::future::Future<Output = DomainResult<()>>,
{
    match tokio::time::timeout(Duration::from_secs(5), ping).await {
        Ok(Ok(())) => StoreHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(Err(e)) => StoreHealth {
            status: "error".to_string(),
            error: Some(format!("Ping failed: {}", e)),
        },
        Err(_) => StoreHealth {
            status: "error".to_string(),
            error: Some("Ping timeout (>5s)".to_string()),
        },
    }
}

/// Health check endpoint
///
/// Pings both stores. Returns 200 OK if both answer, 503 Service Unavailable
/// otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let points_store = probe(state.deps.points.ping()).await;
    let favorites_store = probe(state.deps.favorites.ping()).await;

    let is_healthy = points_store.is_ok() && favorites_store.is_ok();
    let (status_code, status) = if is_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            points_store,
            favorites_store,
            schedule_year: state.deps.schedule_year,
        }),
    )
}
