//! Model Context - Value Objects

use serde::{Deserialize, Serialize};

/// 模型能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// 支持分块流式输出
    Streaming,
    /// 支持语速调节
    RateControl,
    /// 支持音调调节
    PitchControl,
}

impl Capability {
    pub fn all() -> [Capability; 3] {
        [Self::Streaming, Self::RateControl, Self::PitchControl]
    }
}
