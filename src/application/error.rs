//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::BackendError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 请求字段缺失、格式错误或越界
    #[error("invalid `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    /// 音色标记无法解析
    #[error("unknown voice: {token}")]
    UnknownVoice { token: String },

    /// 音色目录尚未从后端加载成功
    #[error("voice catalog is not loaded yet")]
    CatalogUnavailable,

    /// 后端调用失败
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// 创建未知音色错误
    pub fn unknown_voice(token: impl Into<String>) -> Self {
        Self::UnknownVoice {
            token: token.into(),
        }
    }

    /// 出错的请求字段（仅客户端错误）
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::UnknownVoice { .. } => Some("voice"),
            _ => None,
        }
    }
}
