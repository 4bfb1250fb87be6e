//! Static Model Registry Implementation

use crate::application::ports::ModelRegistryPort;
use crate::domain::model::Model;

/// 静态模型注册表
pub struct StaticModelRegistry {
    models: Vec<Model>,
}

impl StaticModelRegistry {
    /// 按给定顺序登记模型；重复 ID 只保留第一个
    pub fn new(models: Vec<Model>) -> Self {
        let mut unique: Vec<Model> = Vec::with_capacity(models.len());
        for model in models {
            if unique.iter().any(|m| m.id() == model.id()) {
                tracing::warn!(model_id = %model.id(), "Duplicate model ignored");
                continue;
            }
            unique.push(model);
        }
        Self { models: unique }
    }
}

impl ModelRegistryPort for StaticModelRegistry {
    fn list_models(&self) -> Vec<Model> {
        self.models.clone()
    }

    fn get(&self, id: &str) -> Option<Model> {
        self.models.iter().find(|m| m.id() == id).cloned()
    }
}
