//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("无效的音色 ID: {0}")]
    InvalidId(String),

    #[error("无效的区域设置: {0}")]
    InvalidLocale(String),
}
