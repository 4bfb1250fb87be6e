//! Voice Resolver - 音色标记解析
//!
//! 解析顺序:
//! 1. 别名表（带版本号，可通过配置整体替换）
//! 2. 目录中的原生 ID（大小写敏感）
//!
//! 两步都失败即为 UnknownVoice，不做任何兜底替换

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceCatalogPort;
use crate::domain::voice::Voice;

/// 内置别名表版本
pub const BUILTIN_ALIAS_VERSION: &str = "v1";

/// 内置别名（OpenAI 风格音色名 -> Edge 原生音色）
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("shimmer", "zh-CN-XiaoxiaoNeural"),
    ("alloy", "zh-CN-YunyangNeural"),
    ("fable", "zh-CN-YunjianNeural"),
    ("onyx", "zh-CN-XiaoyiNeural"),
    ("nova", "zh-CN-YunxiNeural"),
    ("echo", "zh-CN-YunxiaNeural"),
];

/// 别名表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    version: String,
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new(
        version: impl Into<String>,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            version: version.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// 内置别名表
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_ALIAS_VERSION,
            BUILTIN_ALIASES
                .iter()
                .map(|(alias, id)| (alias.to_string(), id.to_string())),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// 音色解析器
pub struct VoiceResolver {
    aliases: AliasTable,
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl VoiceResolver {
    pub fn new(aliases: AliasTable, catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { aliases, catalog }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// 将音色标记解析为目录中的音色
    pub fn resolve(&self, token: &str) -> Result<Voice, ApplicationError> {
        let snapshot = self.catalog.snapshot();
        if !snapshot.is_loaded() {
            return Err(ApplicationError::CatalogUnavailable);
        }

        let native_id = match self.aliases.lookup(token) {
            Some(target) => {
                tracing::debug!(
                    alias = %token,
                    target = %target,
                    alias_version = %self.aliases.version(),
                    "Voice alias matched"
                );
                target
            }
            None => token,
        };

        snapshot
            .get(native_id)
            .cloned()
            .ok_or_else(|| ApplicationError::unknown_voice(token))
    }
}
