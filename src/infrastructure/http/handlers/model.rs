//! Model HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::ListModels;
use crate::infrastructure::http::dto::{ListResponse, ModelItem};
use crate::infrastructure::http::state::AppState;

/// 列出所有模型
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ListResponse<ModelItem>> {
    let models = state.list_models_handler.handle(ListModels);
    Json(ListResponse::new(
        models.into_iter().map(ModelItem::from).collect(),
    ))
}
