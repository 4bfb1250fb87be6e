//! Catalog Command Handlers

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::commands::RefreshVoiceCatalog;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CatalogSnapshot, NativeVoice, SpeechBackendPort, VoiceCatalogPort,
};
use crate::domain::voice::{Gender, Locale, Voice};

/// 刷新结果
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub voice_count: usize,
    pub added: usize,
    pub removed: usize,
    pub skipped: usize,
    pub loaded_at: DateTime<Utc>,
}

/// RefreshVoiceCatalog Handler
///
/// 后端列表获取失败时保留旧快照，错误只返回给刷新调用方
pub struct RefreshVoiceCatalogHandler {
    backend: Arc<dyn SpeechBackendPort>,
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl RefreshVoiceCatalogHandler {
    pub fn new(backend: Arc<dyn SpeechBackendPort>, catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { backend, catalog }
    }

    /// 目录是否至少成功加载过一次
    pub fn catalog_loaded(&self) -> bool {
        self.catalog.snapshot().is_loaded()
    }

    pub async fn handle(
        &self,
        _command: RefreshVoiceCatalog,
    ) -> Result<RefreshOutcome, ApplicationError> {
        let native = self.backend.list_native_voices().await.map_err(|e| {
            tracing::warn!(error = %e, "Voice catalog refresh failed, keeping last snapshot");
            ApplicationError::from(e)
        })?;

        let total = native.len();
        let voices: Vec<Voice> = native.into_iter().filter_map(to_domain_voice).collect();
        let skipped = total - voices.len();

        let loaded_at = Utc::now();
        let snapshot = CatalogSnapshot::new(voices, loaded_at);
        let new_ids: HashSet<String> =
            snapshot.voices().iter().map(|v| v.id().to_string()).collect();
        let voice_count = snapshot.len();

        // 与实际被替换的快照比较，并发刷新时计数仍然准确
        let previous = self.catalog.replace(snapshot);
        let old_ids: HashSet<String> =
            previous.voices().iter().map(|v| v.id().to_string()).collect();
        let added = new_ids.difference(&old_ids).count();
        let removed = old_ids.difference(&new_ids).count();

        tracing::info!(
            voice_count,
            added,
            removed,
            skipped,
            "Voice catalog refreshed"
        );

        Ok(RefreshOutcome {
            voice_count,
            added,
            removed,
            skipped,
            loaded_at,
        })
    }
}

fn to_domain_voice(native: NativeVoice) -> Option<Voice> {
    let locale = match Locale::new(native.locale.as_str()) {
        Ok(locale) => locale,
        Err(reason) => {
            tracing::warn!(voice_id = %native.id, reason, "Skipping voice with invalid locale");
            return None;
        }
    };

    match Voice::new(
        native.id,
        native.display_name,
        locale,
        Gender::from_backend(&native.gender),
    ) {
        Ok(voice) => Some(voice),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping invalid backend voice");
            None
        }
    }
}
