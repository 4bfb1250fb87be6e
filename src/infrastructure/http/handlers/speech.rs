//! Speech HTTP Handler
//!
//! OpenAI 兼容的 `POST /v1/audio/speech`

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{RawSpeechRequest, SynthesisResult, SynthesizeSpeech};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 响应中回传的请求 ID 头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 合成语音
///
/// 缓冲模式带 Content-Length 一次性返回；流式模式逐块转发，
/// 分块流出错时中断连接，不发送结束块
pub async fn create_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawSpeechRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let Json(raw) = payload.map_err(|rejection| {
        tracing::info!(request_id = %request_id, error = %rejection, "Speech request body rejected");
        ApiError::from(rejection)
    })?;

    let result = state
        .synthesize_handler
        .handle(SynthesizeSpeech { request_id, raw })
        .await?;

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type())
        .header(REQUEST_ID_HEADER, request_id.to_string());

    let response = match result {
        SynthesisResult::Buffered { audio, .. } => builder
            .header(header::CONTENT_LENGTH, audio.len())
            .body(Body::from(audio)),
        SynthesisResult::Chunked { chunks, .. } => builder.body(Body::from_stream(chunks)),
    };

    response.map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
