//! HTTP Middleware
//!
//! - HTTP 状态码错误日志
//! - Bearer API Key 鉴权
//! - 405 响应补充结构化错误体

use axum::{
    extract::{Request, State},
    http::{
        header::{ALLOW, AUTHORIZATION, CONTENT_TYPE},
        StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

/// API Key 鉴权中间件
///
/// 未配置 api_key 时放行所有请求
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        if provided != Some(expected) {
            return Err(ApiError::Unauthorized(
                "missing or invalid API key".to_string(),
            ));
        }
    }

    Ok(next.run(request).await)
}

/// 为路由层产生的空 405 响应补充统一错误体，保留 Allow 头
pub async fn method_not_allowed_body(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(CONTENT_TYPE)
    {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut structured =
        ApiError::MethodNotAllowed(format!("method {} is not allowed on {}", method, path))
            .into_response();
    if let Some(allow) = allow {
        structured.headers_mut().insert(ALLOW, allow);
    }
    structured
}
