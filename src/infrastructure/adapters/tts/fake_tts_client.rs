//! Fake TTS Client - 离线后端
//!
//! 不访问网络，按参数生成确定性的“音频”字节；可编排一次性故障，
//! 用于本地演示与测试

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::ports::{
    AudioChunkStream, BackendAudio, BackendError, NativeVoice, SpeechBackendPort,
    SynthesisParams,
};

/// 一次性合成故障
#[derive(Debug, Clone)]
pub enum FakeSynthesisFailure {
    /// 调用即失败：上游不可用
    Unavailable,
    /// 调用即失败：上游拒绝
    Rejected(String),
    /// 成功返回但没有任何音频
    Empty,
    /// 输出 n 个分块后连接中断
    BreakAfter(usize),
    /// 输出 n 个分块后不再有任何数据
    StallAfter(usize),
}

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 初始音色列表
    pub voices: Vec<NativeVoice>,
    /// 每个分块的字节数
    pub chunk_size: usize,
    /// 分块之间的延迟（毫秒）
    pub chunk_delay_ms: u64,
    pub content_type: String,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            voices: default_voices(),
            chunk_size: 1024,
            chunk_delay_ms: 0,
            content_type: "audio/mpeg".to_string(),
        }
    }
}

fn default_voices() -> Vec<NativeVoice> {
    [
        ("zh-CN-XiaoxiaoNeural", "Microsoft Xiaoxiao Online (Natural)", "zh-CN", "Female"),
        ("zh-CN-XiaoyiNeural", "Microsoft Xiaoyi Online (Natural)", "zh-CN", "Female"),
        ("zh-CN-YunjianNeural", "Microsoft Yunjian Online (Natural)", "zh-CN", "Male"),
        ("zh-CN-YunxiNeural", "Microsoft Yunxi Online (Natural)", "zh-CN", "Male"),
        ("zh-CN-YunxiaNeural", "Microsoft Yunxia Online (Natural)", "zh-CN", "Male"),
        ("zh-CN-YunyangNeural", "Microsoft Yunyang Online (Natural)", "zh-CN", "Male"),
        ("zh-HK-HiuGaaiNeural", "Microsoft HiuGaai Online (Natural)", "zh-HK", "Female"),
        ("en-US-JennyNeural", "Microsoft Jenny Online (Natural)", "en-US", "Female"),
        ("en-US-GuyNeural", "Microsoft Guy Online (Natural)", "en-US", "Male"),
    ]
    .into_iter()
    .map(|(id, name, locale, gender)| NativeVoice {
        id: id.to_string(),
        display_name: name.to_string(),
        locale: locale.to_string(),
        gender: gender.to_string(),
    })
    .collect()
}

/// 流被丢弃时计数
struct StreamGuard(Arc<AtomicUsize>);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    voices: Mutex<Vec<NativeVoice>>,
    listing_available: AtomicBool,
    next_failure: Mutex<Option<FakeSynthesisFailure>>,
    synthesize_calls: AtomicUsize,
    streams_opened: AtomicUsize,
    streams_released: Arc<AtomicUsize>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            voices = config.voices.len(),
            chunk_size = config.chunk_size,
            "FakeTtsClient initialized"
        );
        Self {
            voices: Mutex::new(config.voices.clone()),
            config,
            listing_available: AtomicBool::new(true),
            next_failure: Mutex::new(None),
            synthesize_calls: AtomicUsize::new(0),
            streams_opened: AtomicUsize::new(0),
            streams_released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    /// 替换后端音色列表（下次刷新生效）
    pub fn set_voices(&self, voices: Vec<NativeVoice>) {
        if let Ok(mut guard) = self.voices.lock() {
            *guard = voices;
        }
    }

    /// 模拟音色列表接口可用 / 不可用
    pub fn set_listing_available(&self, available: bool) {
        self.listing_available.store(available, Ordering::SeqCst);
    }

    /// 让下一次合成调用按给定方式失败
    pub fn fail_next_synthesis(&self, failure: FakeSynthesisFailure) {
        if let Ok(mut guard) = self.next_failure.lock() {
            *guard = Some(failure);
        }
    }

    /// 合成调用次数
    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }

    /// 尚未被丢弃的音频流数量
    pub fn open_streams(&self) -> usize {
        self.streams_opened.load(Ordering::SeqCst)
            - self.streams_released.load(Ordering::SeqCst)
    }

    /// 给定参数下生成的完整音频
    pub fn expected_audio(&self, voice_id: &str, text: &str, rate: i32, pitch: i32) -> Vec<u8> {
        let mut audio = b"ID3".to_vec();
        audio.extend_from_slice(format!("{}|{:+}|{:+}|{}", voice_id, rate, pitch, text).as_bytes());
        audio
    }

    fn take_failure(&self) -> Option<FakeSynthesisFailure> {
        self.next_failure.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl Default for FakeTtsClient {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl SpeechBackendPort for FakeTtsClient {
    async fn list_native_voices(&self) -> Result<Vec<NativeVoice>, BackendError> {
        if !self.listing_available.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("fake voice list is offline".to_string()));
        }
        self.voices
            .lock()
            .map(|voices| voices.clone())
            .map_err(|_| BackendError::Unavailable("fake voice list poisoned".to_string()))
    }

    async fn synthesize(&self, params: SynthesisParams) -> Result<BackendAudio, BackendError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(
            voice_id = %params.voice_id,
            text_len = params.text.len(),
            "FakeTtsClient: synthesizing"
        );

        let failure = self.take_failure();
        match &failure {
            Some(FakeSynthesisFailure::Unavailable) => {
                return Err(BackendError::Unavailable("fake backend is down".to_string()))
            }
            Some(FakeSynthesisFailure::Rejected(reason)) => {
                return Err(BackendError::Rejected(reason.clone()))
            }
            _ => {}
        }

        let audio = match failure {
            Some(FakeSynthesisFailure::Empty) => Vec::new(),
            _ => self.expected_audio(
                &params.voice_id,
                &params.text,
                params.speed.relative_percent(),
                params.pitch.relative_percent(),
            ),
        };

        let chunk_size = self.config.chunk_size.max(1);
        let mut chunks: Vec<Result<Bytes, BackendError>> = audio
            .chunks(chunk_size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();

        let mut stall = false;
        match failure {
            Some(FakeSynthesisFailure::BreakAfter(n)) => {
                chunks.truncate(n);
                chunks.push(Err(BackendError::Unavailable(
                    "fake connection reset".to_string(),
                )));
            }
            Some(FakeSynthesisFailure::StallAfter(n)) => {
                chunks.truncate(n);
                stall = true;
            }
            _ => {}
        }

        self.streams_opened.fetch_add(1, Ordering::SeqCst);
        let guard = StreamGuard(self.streams_released.clone());
        let delay = Duration::from_millis(self.config.chunk_delay_ms);

        let body = stream::iter(chunks).then(move |chunk| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            chunk
        });
        let tail = if stall {
            stream::pending::<Result<Bytes, BackendError>>().boxed()
        } else {
            stream::empty::<Result<Bytes, BackendError>>().boxed()
        };
        let chunks: AudioChunkStream = Box::pin(body.chain(tail).map(move |chunk| {
            let _held = &guard;
            chunk
        }));

        Ok(BackendAudio {
            content_type: self.config.content_type.clone(),
            chunks,
        })
    }
}
