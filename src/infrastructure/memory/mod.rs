//! In-Memory Implementations
//!
//! 音色目录快照与静态模型注册表

mod model_registry;
mod voice_catalog;

pub use model_registry::StaticModelRegistry;
pub use voice_catalog::InMemoryVoiceCatalog;
