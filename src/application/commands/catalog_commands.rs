//! Catalog Commands

/// 从后端刷新音色目录
#[derive(Debug, Clone, Default)]
pub struct RefreshVoiceCatalog;
