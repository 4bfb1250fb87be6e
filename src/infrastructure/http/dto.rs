//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::model::{Capability, Model};
use crate::domain::voice::{Gender, Voice};

// ============================================================================
// 列表响应
// ============================================================================

/// OpenAI 风格列表响应
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub object: &'static str,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            object: "list",
            data,
        }
    }
}

// ============================================================================
// Model DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ModelItem {
    pub id: String,
    pub object: &'static str,
    pub owned_by: &'static str,
    pub description: String,
    pub capabilities: Vec<Capability>,
}

impl From<Model> for ModelItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id().to_string(),
            object: "model",
            owned_by: "speechgate",
            description: model.description().to_string(),
            capabilities: model.capabilities().iter().copied().collect(),
        }
    }
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListVoicesParams {
    /// 语言前缀筛选
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoiceItem {
    pub id: String,
    pub name: String,
    /// 语言前缀，如 "zh"
    pub lang: String,
    pub locale: String,
    pub gender: Gender,
}

impl From<&Voice> for VoiceItem {
    fn from(voice: &Voice) -> Self {
        Self {
            id: voice.id().to_string(),
            name: voice.display_name().to_string(),
            lang: voice.locale().language().to_string(),
            locale: voice.locale().as_str().to_string(),
            gender: voice.gender(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub object: &'static str,
    pub data: Vec<VoiceItem>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub voice_count: usize,
    pub added: usize,
    pub removed: usize,
    pub skipped: usize,
    pub refreshed_at: DateTime<Utc>,
}

// ============================================================================
// Health DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HealthParams {
    /// 是否同时探测后端
    #[serde(default)]
    pub backend: bool,
}

#[derive(Debug, Serialize)]
pub struct CatalogStatus {
    pub loaded: bool,
    pub voice_count: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog: CatalogStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_reachable: Option<bool>,
}
