//! 应用服务
//!
//! 合成流水线的三个环节：请求校验、音色解析、合成调度

mod dispatcher;
mod resolver;
mod validator;

pub use dispatcher::{DispatchConfig, SynthesisDispatcher, SynthesisResult};
pub use resolver::{AliasTable, VoiceResolver, BUILTIN_ALIAS_VERSION};
pub use validator::{RawSpeechRequest, RequestValidator, DEFAULT_MAX_INPUT_CHARS};
