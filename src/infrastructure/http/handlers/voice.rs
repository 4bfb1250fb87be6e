//! Voice HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{ListVoices, RefreshVoiceCatalog};
use crate::infrastructure::http::dto::{
    ListVoicesParams, RefreshResponse, VoiceItem, VoiceListResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出音色（可按语言前缀筛选）
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListVoicesParams>,
) -> Json<VoiceListResponse> {
    let listing = state
        .list_voices_handler
        .handle(ListVoices { lang: params.lang });

    Json(VoiceListResponse {
        object: "list",
        data: listing.voices.iter().map(VoiceItem::from).collect(),
        refreshed_at: listing.loaded_at,
    })
}

/// 立即从后端刷新音色目录
///
/// 失败时旧目录继续生效
pub async fn refresh_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let outcome = state
        .refresh_catalog_handler
        .handle(RefreshVoiceCatalog)
        .await?;

    Ok(Json(RefreshResponse {
        voice_count: outcome.voice_count,
        added: outcome.added,
        removed: outcome.removed,
        skipped: outcome.skipped,
        refreshed_at: outcome.loaded_at,
    }))
}
