//! Speech Backend Port - 神经语音合成后端抽象
//!
//! 定义合成后端的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;
use thiserror::Error;

use crate::domain::speech::ProsodyFactor;

/// 后端错误
///
/// 对外只区分两类：上游不可用（可由客户端重试）与上游拒绝（输入问题）
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("upstream timed out: {0}")]
    Timeout(String),

    #[error("upstream rejected request: {0}")]
    Rejected(String),
}

/// 后端错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    UpstreamUnavailable,
    UpstreamRejected,
}

impl BackendError {
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            Self::Unavailable(_) | Self::Timeout(_) => BackendErrorKind::UpstreamUnavailable,
            Self::Rejected(_) => BackendErrorKind::UpstreamRejected,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// 后端原生音色条目（未经领域校验）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeVoice {
    pub id: String,
    pub display_name: String,
    pub locale: String,
    pub gender: String,
}

/// 合成参数
#[derive(Debug, Clone)]
pub struct SynthesisParams {
    /// 后端原生音色 ID
    pub voice_id: String,
    /// 音色区域（用于 SSML xml:lang）
    pub locale: String,
    pub text: String,
    pub speed: ProsodyFactor,
    pub pitch: ProsodyFactor,
}

/// 音频分块流：有限、不可重启；Err 项表示传输中断
pub type AudioChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, BackendError>> + Send>>;

/// 后端合成响应
pub struct BackendAudio {
    pub content_type: String,
    pub chunks: AudioChunkStream,
}

impl std::fmt::Debug for BackendAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendAudio")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Speech Backend Port
///
/// 外部神经语音合成服务的抽象接口
#[async_trait]
pub trait SpeechBackendPort: Send + Sync {
    /// 列出后端可用的全部音色
    async fn list_native_voices(&self) -> Result<Vec<NativeVoice>, BackendError>;

    /// 发起一次合成调用，返回音频分块流
    ///
    /// 调用方丢弃返回的流即视为取消，实现方应随之释放上游连接
    async fn synthesize(&self, params: SynthesisParams) -> Result<BackendAudio, BackendError>;

    /// 检查后端是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
