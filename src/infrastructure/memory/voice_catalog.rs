//! In-Memory Voice Catalog Implementation
//!
//! 基于 ArcSwap 的快照目录：读取无锁，刷新为整体原子替换

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::application::ports::{CatalogSnapshot, VoiceCatalogPort};

/// 内存音色目录
pub struct InMemoryVoiceCatalog {
    snapshot: ArcSwap<CatalogSnapshot>,
}

impl InMemoryVoiceCatalog {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(CatalogSnapshot::empty()),
        }
    }
}

impl Default for InMemoryVoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceCatalogPort for InMemoryVoiceCatalog {
    fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.load_full()
    }

    fn replace(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let previous = self.snapshot.swap(Arc::new(snapshot));
        tracing::debug!(
            previous = previous.len(),
            current = self.snapshot.load().len(),
            "Voice catalog snapshot swapped"
        );
        previous
    }
}
