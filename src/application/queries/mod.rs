//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：模型与音色目录的只读访问

mod model_queries;
mod voice_queries;

pub mod handlers;

pub use model_queries::*;
pub use voice_queries::*;
