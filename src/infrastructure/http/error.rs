//! HTTP Error Handling
//!
//! 所有失败在这里转换为结构化响应（OpenAI 兼容错误体）

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ApplicationError, BackendError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub param: Option<String>,
    pub code: &'static str,
}

/// 错误码定义
pub mod code {
    pub const INVALID_FIELD: &str = "invalid_field";
    pub const INVALID_BODY: &str = "invalid_body";
    pub const UNKNOWN_VOICE: &str = "unknown_voice";
    pub const UNAUTHORIZED: &str = "invalid_api_key";
    pub const NOT_FOUND: &str = "not_found";
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";
    pub const UPSTREAM_REJECTED: &str = "upstream_rejected";
    pub const UPSTREAM_UNAVAILABLE: &str = "upstream_unavailable";
    pub const UPSTREAM_TIMEOUT: &str = "upstream_timeout";
    pub const CATALOG_UNAVAILABLE: &str = "catalog_unavailable";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// 错误类型
mod kind {
    pub const INVALID_REQUEST: &str = "invalid_request_error";
    pub const AUTHENTICATION: &str = "authentication_error";
    pub const UPSTREAM: &str = "upstream_error";
    pub const SERVER: &str = "server_error";
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求字段错误，param 指明字段
    BadRequest {
        message: String,
        param: Option<String>,
        code: &'static str,
    },
    /// 请求体无法解析（状态码沿用 axum 的判断：400/413/415/422）
    InvalidBody { status: StatusCode, message: String },
    Unauthorized(String),
    NotFound(String),
    MethodNotAllowed(String),
    UpstreamRejected(String),
    BadGateway(String),
    GatewayTimeout(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::BadRequest {
                message,
                param,
                code,
            } => (
                StatusCode::BAD_REQUEST,
                error_body(message, kind::INVALID_REQUEST, param.as_ref(), *code),
            ),
            ApiError::InvalidBody { status, message } => (
                *status,
                error_body(message, kind::INVALID_REQUEST, None, code::INVALID_BODY),
            ),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                error_body(msg, kind::AUTHENTICATION, None, code::UNAUTHORIZED),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                error_body(msg, kind::INVALID_REQUEST, None, code::NOT_FOUND),
            ),
            ApiError::MethodNotAllowed(msg) => (
                StatusCode::METHOD_NOT_ALLOWED,
                error_body(msg, kind::INVALID_REQUEST, None, code::METHOD_NOT_ALLOWED),
            ),
            ApiError::UpstreamRejected(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                error_body(msg, kind::UPSTREAM, None, code::UPSTREAM_REJECTED),
            ),
            ApiError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                error_body(msg, kind::UPSTREAM, None, code::UPSTREAM_UNAVAILABLE),
            ),
            ApiError::GatewayTimeout(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                error_body(msg, kind::UPSTREAM, None, code::UPSTREAM_TIMEOUT),
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                error_body(msg, kind::SERVER, None, code::CATALOG_UNAVAILABLE),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(msg, kind::SERVER, None, code::INTERNAL_ERROR),
            ),
        }
    }
}

fn error_body(
    message: &str,
    kind: &'static str,
    param: Option<&String>,
    code: &'static str,
) -> ErrorBody {
    ErrorBody {
        message: message.to_string(),
        kind,
        param: param.cloned(),
        code,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code = body.code, error = %body.message, "Request failed");
        } else {
            tracing::warn!(
                status = status.as_u16(),
                code = body.code,
                param = ?body.param,
                error = %body.message,
                "Request rejected"
            );
        }

        (status, Json(ErrorResponse { error: body })).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::Validation { field, reason } => ApiError::BadRequest {
                message: format!("invalid `{}`: {}", field, reason),
                param: Some(field.to_string()),
                code: code::INVALID_FIELD,
            },
            ApplicationError::UnknownVoice { token } => ApiError::BadRequest {
                message: format!("voice '{}' is not available", token),
                param: Some("voice".to_string()),
                code: code::UNKNOWN_VOICE,
            },
            ApplicationError::CatalogUnavailable => ApiError::ServiceUnavailable(
                "voice catalog is not loaded yet, retry later".to_string(),
            ),
            ApplicationError::Backend(e) => e.into(),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Unavailable(msg) => ApiError::BadGateway(msg),
            BackendError::Timeout(msg) => ApiError::GatewayTimeout(msg),
            BackendError::Rejected(msg) => ApiError::UpstreamRejected(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
