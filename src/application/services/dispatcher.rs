//! Synthesis Dispatcher - 合成调度
//!
//! 每个请求只调用后端一次，不做重试：
//! - 缓冲模式：收齐所有分块后一次性返回
//! - 流式模式：等到第一个非空分块后返回，其余分块到达即转发
//!
//! 首字节与后续每个分块都有超时，超时视为上游不可用

use bytes::{Bytes, BytesMut};
use futures_util::{stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use crate::application::ports::{
    AudioChunkStream, BackendError, SpeechBackendPort, SynthesisParams,
};
use crate::domain::speech::ProsodyFactor;
use crate::domain::voice::Voice;

/// 调度配置
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// 从发起调用到收到首个音频分块的上限
    pub first_byte_timeout: Duration,
    /// 相邻两个分块之间的上限
    pub chunk_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            first_byte_timeout: Duration::from_secs(30),
            chunk_timeout: Duration::from_secs(15),
        }
    }
}

/// 合成结果
pub enum SynthesisResult {
    /// 完整音频
    Buffered { audio: Bytes, content_type: String },
    /// 音频分块流；正常结束即完成，Err 项表示中途失败
    Chunked {
        chunks: AudioChunkStream,
        content_type: String,
    },
}

impl SynthesisResult {
    pub fn content_type(&self) -> &str {
        match self {
            Self::Buffered { content_type, .. } | Self::Chunked { content_type, .. } => {
                content_type
            }
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Chunked { .. })
    }
}

impl std::fmt::Debug for SynthesisResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buffered { audio, content_type } => f
                .debug_struct("Buffered")
                .field("len", &audio.len())
                .field("content_type", content_type)
                .finish(),
            Self::Chunked { content_type, .. } => f
                .debug_struct("Chunked")
                .field("content_type", content_type)
                .finish_non_exhaustive(),
        }
    }
}

/// 合成调度器
pub struct SynthesisDispatcher {
    backend: Arc<dyn SpeechBackendPort>,
    config: DispatchConfig,
}

impl SynthesisDispatcher {
    pub fn new(backend: Arc<dyn SpeechBackendPort>, config: DispatchConfig) -> Self {
        Self { backend, config }
    }

    pub async fn synthesize(
        &self,
        voice: &Voice,
        text: &str,
        speed: ProsodyFactor,
        pitch: ProsodyFactor,
        streaming: bool,
    ) -> Result<SynthesisResult, BackendError> {
        let params = SynthesisParams {
            voice_id: voice.id().to_string(),
            locale: voice.locale().as_str().to_string(),
            text: text.to_string(),
            speed,
            pitch,
        };

        let deadline = Instant::now() + self.config.first_byte_timeout;
        let audio = timeout_at(deadline, self.backend.synthesize(params))
            .await
            .map_err(|_| BackendError::Timeout("no response from backend".to_string()))??;

        let content_type = audio.content_type;
        let mut chunks = audio.chunks;

        let first = next_chunk(&mut chunks, deadline)
            .await?
            .ok_or_else(|| BackendError::Rejected("backend returned no audio".to_string()))?;

        if streaming {
            let rest = with_chunk_timeout(chunks, self.config.chunk_timeout);
            let chunks: AudioChunkStream = Box::pin(stream::once(async move { Ok(first) }).chain(rest));
            return Ok(SynthesisResult::Chunked {
                chunks,
                content_type,
            });
        }

        let mut buffer = BytesMut::from(&first[..]);
        loop {
            let deadline = Instant::now() + self.config.chunk_timeout;
            match next_chunk(&mut chunks, deadline).await? {
                Some(chunk) => buffer.extend_from_slice(&chunk),
                None => break,
            }
        }

        Ok(SynthesisResult::Buffered {
            audio: buffer.freeze(),
            content_type,
        })
    }
}

/// 读取下一个非空分块；None 表示后端正常结束
async fn next_chunk(
    chunks: &mut AudioChunkStream,
    deadline: Instant,
) -> Result<Option<Bytes>, BackendError> {
    loop {
        match timeout_at(deadline, chunks.next()).await {
            Err(_) => {
                return Err(BackendError::Timeout(
                    "timed out waiting for audio chunk".to_string(),
                ))
            }
            Ok(None) => return Ok(None),
            Ok(Some(Err(e))) => return Err(e),
            Ok(Some(Ok(chunk))) if chunk.is_empty() => continue,
            Ok(Some(Ok(chunk))) => return Ok(Some(chunk)),
        }
    }
}

/// 为剩余分块加上逐块超时；出错后流随即结束
fn with_chunk_timeout(chunks: AudioChunkStream, limit: Duration) -> AudioChunkStream {
    Box::pin(stream::unfold(Some(chunks), move |state| async move {
        let mut chunks = state?;
        match next_chunk(&mut chunks, Instant::now() + limit).await {
            Ok(Some(chunk)) => Some((Ok(chunk), Some(chunks))),
            Ok(None) => {
                tracing::debug!("Backend audio stream completed");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Backend audio stream broke mid-delivery");
                Some((Err(e), None))
            }
        }
    }))
}
