//! Catalog Refresher - 后台刷新音色目录
//!
//! 目录尚未加载成功时按指数退避重试；加载成功后按固定间隔刷新

use std::sync::Arc;
use std::time::Duration;

use crate::application::{RefreshVoiceCatalog, RefreshVoiceCatalogHandler};

/// Refresher 配置
#[derive(Debug, Clone)]
pub struct CatalogRefresherConfig {
    /// 定时刷新间隔，为 0 时目录加载成功后 Worker 退出
    pub interval: Duration,
    /// 未加载时的首次重试等待
    pub retry_min: Duration,
    /// 未加载时的最长重试等待
    pub retry_max: Duration,
}

impl Default for CatalogRefresherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(6 * 3600),
            retry_min: Duration::from_secs(5),
            retry_max: Duration::from_secs(300),
        }
    }
}

/// 目录刷新 Worker
///
/// 刷新失败只记录日志，目录继续提供上一个快照
pub struct CatalogRefresher {
    config: CatalogRefresherConfig,
    handler: Arc<RefreshVoiceCatalogHandler>,
}

impl CatalogRefresher {
    pub fn new(config: CatalogRefresherConfig, handler: Arc<RefreshVoiceCatalogHandler>) -> Self {
        Self { config, handler }
    }

    /// 启动 Worker（首次加载由启动流程负责）
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            retry_min_ms = self.config.retry_min.as_millis() as u64,
            "CatalogRefresher started"
        );

        let mut retry_delay = self.config.retry_min;

        loop {
            let wait = if self.handler.catalog_loaded() {
                if self.config.interval.is_zero() {
                    tracing::info!("Voice catalog loaded, periodic refresh disabled");
                    return;
                }
                retry_delay = self.config.retry_min;
                self.config.interval
            } else {
                let wait = retry_delay;
                retry_delay = (retry_delay * 2)
                    .min(self.config.retry_max)
                    .max(self.config.retry_min);
                tracing::info!(
                    retry_in_ms = wait.as_millis() as u64,
                    "Voice catalog not loaded, retrying"
                );
                wait
            };

            tokio::time::sleep(wait).await;

            match self.handler.handle(RefreshVoiceCatalog).await {
                Ok(outcome) => tracing::debug!(
                    voice_count = outcome.voice_count,
                    "Scheduled catalog refresh completed"
                ),
                Err(e) => tracing::warn!(error = %e, "Scheduled catalog refresh failed"),
            }
        }
    }
}
