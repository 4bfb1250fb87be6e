//! Model Queries

/// 列出所有模型查询
#[derive(Debug, Clone)]
pub struct ListModels;
