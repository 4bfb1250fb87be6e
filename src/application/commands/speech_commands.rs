//! Speech Commands

use uuid::Uuid;

use crate::application::services::RawSpeechRequest;

/// 合成语音命令
#[derive(Debug, Clone)]
pub struct SynthesizeSpeech {
    /// 请求 ID（用于日志和追踪）
    pub request_id: Uuid,
    pub raw: RawSpeechRequest,
}
