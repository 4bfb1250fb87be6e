//! Speechgate - OpenAI 兼容的神经语音合成网关
//!
//! - Domain: voice/, model/, speech/
//! - Application: commands, queries, services, ports
//! - Infrastructure: http, memory, worker, adapters

use std::sync::Arc;
use std::time::Duration;

use speechgate::application::{DispatchConfig, RefreshVoiceCatalog, SpeechBackendPort};
use speechgate::config::{
    alias_table, load_config, model_definitions, print_config, AppConfig, BackendProvider,
};
use speechgate::infrastructure::adapters::{EdgeTtsClient, EdgeTtsClientConfig, FakeTtsClient};
use speechgate::infrastructure::http::{AppState, GatewayOptions, HttpServer};
use speechgate::infrastructure::memory::{InMemoryVoiceCatalog, StaticModelRegistry};
use speechgate::infrastructure::worker::{CatalogRefresher, CatalogRefresherConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Speechgate - OpenAI 兼容语音合成网关");
    print_config(&config);

    // 创建合成后端
    let backend: Arc<dyn SpeechBackendPort> = match config.backend.provider {
        BackendProvider::Edge => Arc::new(EdgeTtsClient::new(EdgeTtsClientConfig {
            synthesis_url: config.backend.synthesis_url.clone(),
            voices_url: config.backend.voices_url.clone(),
            output_format: config.backend.output_format.clone(),
            connect_timeout_secs: config.backend.connect_timeout_secs,
            list_timeout_secs: config.backend.timeout_secs,
        })?),
        BackendProvider::Fake => Arc::new(FakeTtsClient::with_defaults()),
    };

    // 创建音色目录与模型注册表
    let catalog = Arc::new(InMemoryVoiceCatalog::new());
    let models = Arc::new(StaticModelRegistry::new(model_definitions(&config)?));

    let options = GatewayOptions {
        aliases: alias_table(&config),
        dispatch: DispatchConfig {
            first_byte_timeout: Duration::from_secs(config.backend.timeout_secs),
            chunk_timeout: Duration::from_secs(config.backend.chunk_timeout_secs),
        },
        max_input_chars: config.limits.max_input_chars,
        api_key: config.auth.api_key.clone(),
    };
    let state = AppState::new(backend, catalog, models, options);

    // 首次加载音色目录；失败时合成请求返回 503，直到后台重试成功
    match state
        .refresh_catalog_handler
        .handle(RefreshVoiceCatalog)
        .await
    {
        Ok(outcome) => tracing::info!(voices = outcome.voice_count, "Voice catalog loaded"),
        Err(e) => tracing::error!(error = %e, "Initial voice catalog load failed"),
    }

    // 启动后台刷新（未加载时快速重试，之后按间隔刷新）
    let refresher = CatalogRefresher::new(
        CatalogRefresherConfig {
            interval: Duration::from_secs(config.catalog.refresh_interval_secs),
            retry_min: Duration::from_secs(config.catalog.retry_min_secs),
            retry_max: Duration::from_secs(config.catalog.retry_max_secs),
        },
        state.refresh_catalog_handler.clone(),
    );
    tokio::spawn(refresher.run());

    let server = HttpServer::new(config.server.addr(), state, config.limits.max_body_bytes);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志（RUST_LOG 优先于配置）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},speechgate={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
