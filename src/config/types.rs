//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::domain::model::Capability;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成后端配置
    #[serde(default)]
    pub backend: BackendConfig,

    /// 音色目录配置
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 对外公布的模型
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,

    /// 音色别名配置
    #[serde(default)]
    pub voices: VoiceAliasConfig,

    /// 请求限制
    #[serde(default)]
    pub limits: LimitsConfig,

    /// 鉴权配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            catalog: CatalogConfig::default(),
            models: default_models(),
            voices: VoiceAliasConfig::default(),
            limits: LimitsConfig::default(),
            auth: AuthConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// Edge 在线神经语音
    #[default]
    Edge,
    /// 离线假后端（本地演示）
    Fake,
}

/// 合成后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub provider: BackendProvider,

    /// 合成接口 URL
    #[serde(default = "default_synthesis_url")]
    pub synthesis_url: String,

    /// 音色列表接口 URL
    #[serde(default = "default_voices_url")]
    pub voices_url: String,

    /// 输出格式
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// 首字节超时（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 分块间超时（秒）
    #[serde(default = "default_chunk_timeout")]
    pub chunk_timeout_secs: u64,

    /// 建立连接超时（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_synthesis_url() -> String {
    crate::infrastructure::adapters::DEFAULT_SYNTHESIS_URL.to_string()
}

fn default_voices_url() -> String {
    crate::infrastructure::adapters::DEFAULT_VOICES_URL.to_string()
}

fn default_output_format() -> String {
    crate::infrastructure::adapters::DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_chunk_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            synthesis_url: default_synthesis_url(),
            voices_url: default_voices_url(),
            output_format: default_output_format(),
            timeout_secs: default_timeout(),
            chunk_timeout_secs: default_chunk_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 定时刷新间隔（秒），0 表示加载成功后不再刷新
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// 目录未加载时的首次重试等待（秒），之后逐次翻倍
    #[serde(default = "default_retry_min")]
    pub retry_min_secs: u64,

    /// 目录未加载时的最长重试等待（秒）
    #[serde(default = "default_retry_max")]
    pub retry_max_secs: u64,
}

fn default_refresh_interval() -> u64 {
    6 * 3600 // 6 小时
}

fn default_retry_min() -> u64 {
    5
}

fn default_retry_max() -> u64 {
    300
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            retry_min_secs: default_retry_min(),
            retry_max_secs: default_retry_max(),
        }
    }
}

/// 模型配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig {
            id: "tts-1".to_string(),
            description: "Edge neural voices, streaming supported".to_string(),
            capabilities: Capability::all().to_vec(),
        },
        ModelConfig {
            id: "tts-1-hd".to_string(),
            description: "Edge neural voices, buffered delivery".to_string(),
            capabilities: vec![Capability::RateControl, Capability::PitchControl],
        },
    ]
}

/// 音色别名配置
///
/// aliases 为空时使用内置别名表
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceAliasConfig {
    /// 别名表版本
    #[serde(default = "default_alias_version")]
    pub alias_version: String,

    /// 别名条目列表
    ///
    /// 使用 `[[voices.aliases]]` 数组而非表：配置加载会把表键转为小写，
    /// 而别名按大小写敏感匹配
    #[serde(default)]
    pub aliases: Vec<VoiceAliasEntry>,
}

/// 单个别名条目
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoiceAliasEntry {
    pub alias: String,
    /// 原生音色 ID
    pub target: String,
}

fn default_alias_version() -> String {
    crate::application::services::BUILTIN_ALIAS_VERSION.to_string()
}

impl Default for VoiceAliasConfig {
    fn default() -> Self {
        Self {
            alias_version: default_alias_version(),
            aliases: Vec::new(),
        }
    }
}

/// 请求限制
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// input 最大字符数
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// 请求体最大字节数
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_max_input_chars() -> usize {
    crate::application::services::DEFAULT_MAX_INPUT_CHARS
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MB
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// 鉴权配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// 设置后 /v1 接口需要 `Authorization: Bearer <api_key>`
    #[serde(default)]
    pub api_key: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.provider, BackendProvider::Edge);
        assert_eq!(config.backend.output_format, "audio-24khz-48kbitrate-mono-mp3");
        assert_eq!(config.limits.max_input_chars, 4096);
        assert!(config.auth.api_key.is_none());
    }

    #[test]
    fn test_default_models() {
        let config = AppConfig::default();
        let ids: Vec<&str> = config.models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["tts-1", "tts-1-hd"]);
        assert!(config.models[0].capabilities.contains(&Capability::Streaming));
        assert!(!config.models[1].capabilities.contains(&Capability::Streaming));
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }
}
