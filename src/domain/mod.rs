//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Voice Context: 后端音色
//! - Model Context: 对外公布的模型及能力
//! - Speech Context: 合成请求及韵律参数

pub mod model;
pub mod speech;
pub mod voice;
