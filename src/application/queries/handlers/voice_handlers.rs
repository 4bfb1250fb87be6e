//! Voice Query Handlers

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::ports::VoiceCatalogPort;
use crate::application::queries::ListVoices;
use crate::domain::voice::Voice;

/// 音色列表（取自同一个快照）
#[derive(Debug, Clone)]
pub struct VoiceListing {
    pub voices: Vec<Voice>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, query: ListVoices) -> VoiceListing {
        let snapshot = self.catalog.snapshot();
        let lang = query.lang.as_deref().map(str::trim).filter(|l| !l.is_empty());

        let voices = snapshot
            .voices()
            .iter()
            .filter(|v| lang.map_or(true, |l| v.locale().matches_language(l)))
            .cloned()
            .collect();

        VoiceListing {
            voices,
            loaded_at: snapshot.loaded_at(),
        }
    }
}
