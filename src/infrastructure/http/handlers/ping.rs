//! Health Handlers

use axum::{
    extract::{Query, State},
    http::Uri,
    Json,
};
use std::sync::Arc;

use crate::infrastructure::http::dto::{CatalogStatus, HealthParams, HealthResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 健康检查
///
/// `?backend=true` 时额外探测后端可达性
pub async fn health(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HealthParams>,
) -> Json<HealthResponse> {
    let snapshot = state.catalog.snapshot();

    let backend_reachable = if params.backend {
        Some(state.backend.health_check().await)
    } else {
        None
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        catalog: CatalogStatus {
            loaded: snapshot.is_loaded(),
            voice_count: snapshot.len(),
            refreshed_at: snapshot.loaded_at(),
        },
        backend_reachable,
    })
}

/// 未匹配路径
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
