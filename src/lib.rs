//! Speechgate - OpenAI 兼容的神经语音合成网关
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice: 后端音色
//! - Model: 对外模型及能力
//! - Speech: 合成请求与语速/音调
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechBackend, VoiceCatalog, ModelRegistry）
//! - Services: 请求校验、音色解析、合成调度
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: OpenAI 兼容 REST API
//! - Memory: 音色目录快照、静态模型注册表
//! - Worker: CatalogRefresher 定时刷新
//! - Adapters: Edge TTS Client, Fake TTS Client

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
