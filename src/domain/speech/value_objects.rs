//! Speech Context - Value Objects

use serde::Serialize;

/// 语速 / 音调倍率
///
/// 不变量:
/// - 取值范围 (0, 3]，1.0 表示不调整
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ProsodyFactor(f32);

impl ProsodyFactor {
    pub const NEUTRAL: ProsodyFactor = ProsodyFactor(1.0);
    pub const MAX: f32 = 3.0;

    pub fn new(value: f64) -> Result<Self, &'static str> {
        if !value.is_finite() {
            return Err("必须是有限数值");
        }
        // 按存储精度检查，避免极小正数截断为 0
        let stored = value as f32;
        if !(stored > 0.0 && stored <= Self::MAX) {
            return Err("必须在 (0, 3] 范围内");
        }
        Ok(Self(stored))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// 相对百分比，如 1.5 -> +50，0.8 -> -20
    pub fn relative_percent(&self) -> i32 {
        ((self.0 - 1.0) * 100.0).round() as i32
    }
}

impl Default for ProsodyFactor {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
