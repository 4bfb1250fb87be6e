//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechBackend、VoiceCatalog、ModelRegistry）
//! - services: 请求校验、音色解析、合成调度
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod services;

// Re-exports
pub use commands::{
    handlers::{RefreshOutcome, RefreshVoiceCatalogHandler, SynthesizeSpeechHandler},
    RefreshVoiceCatalog, SynthesizeSpeech,
};

pub use error::ApplicationError;

pub use ports::{
    AudioChunkStream, BackendAudio, BackendError, BackendErrorKind, CatalogSnapshot,
    ModelRegistryPort, NativeVoice, SpeechBackendPort, SynthesisParams, VoiceCatalogPort,
};

pub use queries::{
    handlers::{ListModelsHandler, ListVoicesHandler, VoiceListing},
    ListModels, ListVoices,
};

pub use services::{
    AliasTable, DispatchConfig, RawSpeechRequest, RequestValidator, SynthesisDispatcher,
    SynthesisResult, VoiceResolver,
};
