//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, BackendProvider};
use crate::application::services::AliasTable;
use crate::domain::model::Model;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SPEECHGATE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SPEECHGATE_SERVER__PORT=8080`
/// - `SPEECHGATE_BACKEND__PROVIDER=fake`
/// - `SPEECHGATE_BACKEND__TIMEOUT_SECS=20`
/// - `SPEECHGATE_AUTH__API_KEY=secret`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）；models / voices.aliases 由 serde 默认值提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("backend.provider", "edge")?
        .set_default("backend.timeout_secs", 30)?
        .set_default("backend.chunk_timeout_secs", 15)?
        .set_default("backend.connect_timeout_secs", 10)?
        .set_default("catalog.refresh_interval_secs", 6 * 3600)?
        .set_default("catalog.retry_min_secs", 5)?
        .set_default("catalog.retry_max_secs", 300)?
        .set_default("limits.max_body_bytes", 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: SPEECHGATE_BACKEND__SYNTHESIS_URL=http://localhost:9000/synthesize
    builder = builder.add_source(
        Environment::with_prefix("SPEECHGATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.backend.provider == BackendProvider::Edge {
        if config.backend.synthesis_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "Backend synthesis URL cannot be empty".to_string(),
            ));
        }
        if config.backend.voices_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "Backend voices URL cannot be empty".to_string(),
            ));
        }
    }

    if config.backend.timeout_secs == 0 || config.backend.chunk_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Backend timeouts must be greater than 0".to_string(),
        ));
    }

    if config.catalog.retry_min_secs == 0
        || config.catalog.retry_max_secs < config.catalog.retry_min_secs
    {
        return Err(ConfigError::ValidationError(
            "catalog.retry_min_secs must be > 0 and <= catalog.retry_max_secs".to_string(),
        ));
    }

    if config.limits.max_input_chars == 0 {
        return Err(ConfigError::ValidationError(
            "limits.max_input_chars must be greater than 0".to_string(),
        ));
    }

    model_definitions(config)?;

    let mut seen_aliases = HashSet::new();
    for entry in &config.voices.aliases {
        if entry.alias.trim().is_empty() || entry.target.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Invalid voice alias '{}' -> '{}'",
                entry.alias, entry.target
            )));
        }
        if !seen_aliases.insert(entry.alias.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Duplicate voice alias '{}'",
                entry.alias
            )));
        }
    }

    Ok(())
}

/// 将模型配置转换为领域模型
pub fn model_definitions(config: &AppConfig) -> Result<Vec<Model>, ConfigError> {
    if config.models.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one model must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    config
        .models
        .iter()
        .map(|m| {
            if !seen.insert(m.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate model id '{}'",
                    m.id
                )));
            }
            Model::new(m.id.clone(), m.description.clone(), m.capabilities.iter().copied())
                .map_err(|e| ConfigError::ValidationError(e.to_string()))
        })
        .collect()
}

/// 构建别名表；未配置别名时使用内置表
pub fn alias_table(config: &AppConfig) -> AliasTable {
    if config.voices.aliases.is_empty() {
        return AliasTable::builtin();
    }
    AliasTable::new(
        config.voices.alias_version.clone(),
        config
            .voices
            .aliases
            .iter()
            .map(|e| (e.alias.clone(), e.target.clone())),
    )
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Gateway Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Backend: {:?}", config.backend.provider);
    if config.backend.provider == BackendProvider::Edge {
        tracing::info!("Synthesis URL: {}", config.backend.synthesis_url);
        tracing::info!("Output Format: {}", config.backend.output_format);
    }
    tracing::info!(
        "Backend Timeouts: first byte {}s, chunk {}s",
        config.backend.timeout_secs,
        config.backend.chunk_timeout_secs
    );
    tracing::info!(
        "Catalog Refresh Interval: {}s (retry {}s..{}s until loaded)",
        config.catalog.refresh_interval_secs,
        config.catalog.retry_min_secs,
        config.catalog.retry_max_secs
    );
    tracing::info!(
        "Models: {}",
        config
            .models
            .iter()
            .map(|m| m.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let aliases = alias_table(config);
    tracing::info!("Voice Aliases: {} (version {})", aliases.len(), aliases.version());
    for (alias, target) in aliases.entries() {
        tracing::debug!("  {} -> {}", alias, target);
    }
    tracing::info!("Auth Enabled: {}", config.auth.api_key.is_some());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=============================");
}
