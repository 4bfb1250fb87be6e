//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：合成请求与目录刷新

mod catalog_commands;
mod speech_commands;

pub mod handlers;

pub use catalog_commands::*;
pub use speech_commands::*;
