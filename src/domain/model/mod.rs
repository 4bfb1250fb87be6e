//! Model Context - 模型限界上下文
//!
//! 对外公布的模型名称及其能力（流式、语速、音调）

mod aggregate;
mod value_objects;

pub use aggregate::Model;
pub use value_objects::Capability;
