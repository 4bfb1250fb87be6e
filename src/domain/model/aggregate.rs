//! Model Context - Aggregate Root

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Capability;

/// 对外公布的合成模型
///
/// 启动时定义，运行期不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    id: String,
    description: String,
    capabilities: BTreeSet<Capability>,
}

impl Model {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Result<Self, &'static str> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("模型 ID 不能为空");
        }
        Ok(Self {
            id,
            description: description.into(),
            capabilities: capabilities.into_iter().collect(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_capabilities() {
        let model = Model::new(
            "tts-1-hd",
            "buffered only",
            [Capability::RateControl, Capability::PitchControl, Capability::RateControl],
        )
        .unwrap();

        assert!(model.supports(Capability::RateControl));
        assert!(!model.supports(Capability::Streaming));
        assert_eq!(model.capabilities().len(), 2);
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(Model::new("", "x", Capability::all()).is_err());
    }

    #[test]
    fn test_capability_serialization() {
        let json = serde_json::to_string(&Capability::RateControl).unwrap();
        assert_eq!(json, "\"rateControl\"");
        let parsed: Capability = serde_json::from_str("\"pitchControl\"").unwrap();
        assert_eq!(parsed, Capability::PitchControl);
    }
}
