//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 后端音色元数据（ID、显示名称、区域、性别）
//! - 区域语言前缀筛选

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::Voice;
pub use errors::VoiceError;
pub use value_objects::{Gender, Locale};
