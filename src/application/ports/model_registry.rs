//! Model Registry Port - 模型注册表

use crate::domain::model::Model;

/// Model Registry Port
///
/// 静态表，运行期只读
pub trait ModelRegistryPort: Send + Sync {
    /// 按注册顺序列出模型
    fn list_models(&self) -> Vec<Model>;

    /// 按 ID 查找模型
    fn get(&self, id: &str) -> Option<Model>;
}
