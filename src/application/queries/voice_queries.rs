//! Voice Queries

/// 列出音色查询
#[derive(Debug, Clone, Default)]
pub struct ListVoices {
    /// 语言前缀筛选，如 "zh"、"en-US"
    pub lang: Option<String>,
}
