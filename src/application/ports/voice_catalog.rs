//! Voice Catalog Port - 音色目录快照

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::voice::Voice;

/// 音色目录快照
///
/// 一经创建不可修改；刷新时整体替换
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    voices: Vec<Voice>,
    index: HashMap<String, usize>,
    loaded_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    /// 空快照（尚未从后端加载）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从后端顺序的音色列表构建；重复 ID 只保留第一次出现
    pub fn new(voices: Vec<Voice>, loaded_at: DateTime<Utc>) -> Self {
        let mut index = HashMap::with_capacity(voices.len());
        let mut unique = Vec::with_capacity(voices.len());
        for voice in voices {
            if index.contains_key(voice.id()) {
                continue;
            }
            index.insert(voice.id().to_string(), unique.len());
            unique.push(voice);
        }
        Self {
            voices: unique,
            index,
            loaded_at: Some(loaded_at),
        }
    }

    /// 按后端顺序列出音色
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// 按原生 ID 精确查找（大小写敏感）
    pub fn get(&self, id: &str) -> Option<&Voice> {
        self.index.get(id).map(|&i| &self.voices[i])
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// 是否至少成功加载过一次
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// Voice Catalog Port
///
/// 读多写少的音色注册表；读者拿到的快照在其生命周期内保持一致
pub trait VoiceCatalogPort: Send + Sync {
    /// 获取当前快照
    fn snapshot(&self) -> Arc<CatalogSnapshot>;

    /// 原子替换整个快照，返回被替换的旧快照
    fn replace(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot>;

    /// 列出当前全部音色
    fn list_voices(&self) -> Vec<Voice> {
        self.snapshot().voices().to_vec()
    }

    /// 按原生 ID 查找
    fn resolve(&self, id: &str) -> Option<Voice> {
        self.snapshot().get(id).cloned()
    }
}
