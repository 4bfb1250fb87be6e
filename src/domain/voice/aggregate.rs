//! Voice Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{Gender, Locale, VoiceError};

/// 后端音色
///
/// 不变量:
/// - id 为后端原生标识（如 "zh-CN-XiaoxiaoNeural"），非空
/// - 加载后不可变，只随目录快照整体替换
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    id: String,
    display_name: String,
    locale: Locale,
    gender: Gender,
}

impl Voice {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        locale: Locale,
        gender: Gender,
    ) -> Result<Self, VoiceError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(VoiceError::InvalidId("音色 ID 不能为空".to_string()));
        }

        // 没有显示名称时退回到 ID
        let display_name = display_name.into();
        let display_name = if display_name.trim().is_empty() {
            id.clone()
        } else {
            display_name.trim().to_string()
        };

        Ok(Self {
            id,
            display_name,
            locale,
            gender,
        })
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }
}
