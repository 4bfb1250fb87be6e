//! Speech Context - 已校验的合成请求

use super::ProsodyFactor;

/// 通过校验的合成请求
///
/// 不变量:
/// - input 去除首尾空白后非空
/// - model 已在模型注册表中登记
/// - stream / speed / pitch 与模型能力一致
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub model: String,
    pub input: String,
    pub voice: String,
    pub speed: ProsodyFactor,
    pub pitch: ProsodyFactor,
    pub stream: bool,
}
