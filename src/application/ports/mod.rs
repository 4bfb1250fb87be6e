//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod model_registry;
mod speech_backend;
mod voice_catalog;

pub use model_registry::ModelRegistryPort;
pub use speech_backend::{
    AudioChunkStream, BackendAudio, BackendError, BackendErrorKind, NativeVoice,
    SpeechBackendPort, SynthesisParams,
};
pub use voice_catalog::{CatalogSnapshot, VoiceCatalogPort};
