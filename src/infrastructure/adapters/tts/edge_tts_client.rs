//! Edge TTS Client - 调用 Edge 朗读服务
//!
//! 实现 SpeechBackendPort trait，通过 HTTP 调用 Edge 神经语音服务
//!
//! 外部 API:
//! POST {synthesis_url}
//! Request: SSML (application/ssml+xml)，输出格式由 X-Microsoft-OutputFormat 指定
//! Response: 音频二进制流
//!
//! GET {voices_url}
//! Response: [{"ShortName": "...", "FriendlyName": "...", "Locale": "...", "Gender": "..."}]

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{
    AudioChunkStream, BackendAudio, BackendError, NativeVoice, SpeechBackendPort,
    SynthesisParams,
};

pub const DEFAULT_SYNTHESIS_URL: &str =
    "https://speech.platform.bing.com/consumer/speech/synthesize/readaloud/edge/v1";
pub const DEFAULT_VOICES_URL: &str = "https://speech.platform.bing.com/consumer/speech/synthesize/readaloud/voices/list?trustedclienttoken=6A5AA1D4EAFF4E9FB37E23D68491D6F4";
pub const DEFAULT_OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

/// 音色列表条目
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EdgeVoiceEntry {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "DisplayName", alias = "LocalName")]
    friendly_name: Option<String>,
    #[serde(default)]
    locale: String,
    #[serde(default)]
    gender: String,
}

impl From<EdgeVoiceEntry> for NativeVoice {
    fn from(entry: EdgeVoiceEntry) -> Self {
        Self {
            id: entry.short_name.or(entry.name).unwrap_or_default(),
            display_name: entry.friendly_name.unwrap_or_default(),
            locale: entry.locale,
            gender: entry.gender,
        }
    }
}

/// Edge TTS 客户端配置
#[derive(Debug, Clone)]
pub struct EdgeTtsClientConfig {
    /// 合成接口 URL
    pub synthesis_url: String,
    /// 音色列表接口 URL
    pub voices_url: String,
    /// 输出格式，如 audio-24khz-48kbitrate-mono-mp3
    pub output_format: String,
    /// 建立连接超时（秒）
    pub connect_timeout_secs: u64,
    /// 音色列表请求超时（秒）
    pub list_timeout_secs: u64,
}

impl Default for EdgeTtsClientConfig {
    fn default() -> Self {
        Self {
            synthesis_url: DEFAULT_SYNTHESIS_URL.to_string(),
            voices_url: DEFAULT_VOICES_URL.to_string(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            connect_timeout_secs: 10,
            list_timeout_secs: 30,
        }
    }
}

/// Edge TTS 客户端
pub struct EdgeTtsClient {
    client: Client,
    config: EdgeTtsClientConfig,
}

impl EdgeTtsClient {
    /// 创建新的 Edge TTS 客户端
    ///
    /// 合成调用不设整体超时，首字节与分块超时由调度器控制
    pub fn new(config: EdgeTtsClientConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn content_type(&self) -> &'static str {
        content_type_for(&self.config.output_format)
    }
}

#[async_trait]
impl SpeechBackendPort for EdgeTtsClient {
    async fn list_native_voices(&self) -> Result<Vec<NativeVoice>, BackendError> {
        tracing::debug!(url = %self.config.voices_url, "Fetching backend voice list");

        let response = self
            .client
            .get(&self.config.voices_url)
            .timeout(Duration::from_secs(self.config.list_timeout_secs))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // 列表接口的任何失败对调用方都只是“暂不可用”
            return Err(BackendError::Unavailable(format!(
                "voice list HTTP {}: {}",
                status, body
            )));
        }

        let entries: Vec<EdgeVoiceEntry> = response
            .json()
            .await
            .map_err(|e| BackendError::Unavailable(format!("invalid voice list: {}", e)))?;

        Ok(entries.into_iter().map(NativeVoice::from).collect())
    }

    async fn synthesize(&self, params: SynthesisParams) -> Result<BackendAudio, BackendError> {
        let ssml = build_ssml(&params);

        tracing::debug!(
            url = %self.config.synthesis_url,
            voice_id = %params.voice_id,
            text_len = params.text.len(),
            rate = params.speed.relative_percent(),
            pitch = params.pitch.relative_percent(),
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(&self.config.synthesis_url)
            .header(header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.config.output_format)
            .body(ssml)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        // 上游声明为音频时沿用其 Content-Type
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("audio/"))
            .map(str::to_string)
            .unwrap_or_else(|| self.content_type().to_string());

        let chunks: AudioChunkStream = Box::pin(response.bytes_stream().map(|item| {
            item.map_err(|e| BackendError::Unavailable(format!("audio stream interrupted: {}", e)))
        }));

        Ok(BackendAudio {
            content_type,
            chunks,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(&self.config.voices_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// 构建 SSML 请求体
pub fn build_ssml(params: &SynthesisParams) -> String {
    format!(
        concat!(
            "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{lang}\">",
            "<voice name=\"{voice}\">",
            "<prosody rate=\"{rate:+}%\" pitch=\"{pitch:+}%\">{text}</prosody>",
            "</voice></speak>"
        ),
        lang = escape_xml(&params.locale),
        voice = escape_xml(&params.voice_id),
        rate = params.speed.relative_percent(),
        pitch = params.pitch.relative_percent(),
        text = escape_xml(&params.text),
    )
}

/// 输出格式对应的 Content-Type
pub fn content_type_for(output_format: &str) -> &'static str {
    let format = output_format.to_ascii_lowercase();
    if format.ends_with("mp3") {
        "audio/mpeg"
    } else if format.starts_with("webm") {
        "audio/webm"
    } else if format.starts_with("ogg") {
        "audio/ogg"
    } else if format.starts_with("riff") {
        "audio/wav"
    } else {
        "application/octet-stream"
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 上游 HTTP 状态码分类：输入问题为 Rejected，其余为 Unavailable
fn classify_status(status: StatusCode, body: &str) -> BackendError {
    let detail = if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body.trim())
    };

    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::NOT_FOUND
        | StatusCode::PAYLOAD_TOO_LARGE
        | StatusCode::UNPROCESSABLE_ENTITY => BackendError::Rejected(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => BackendError::Timeout(detail),
        _ => BackendError::Unavailable(detail),
    }
}

fn transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout(e.to_string())
    } else if e.is_connect() {
        BackendError::Unavailable(format!("Cannot connect to TTS backend: {}", e))
    } else {
        BackendError::Unavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::speech::ProsodyFactor;

    fn params(text: &str, speed: f64, pitch: f64) -> SynthesisParams {
        SynthesisParams {
            voice_id: "zh-CN-XiaoxiaoNeural".to_string(),
            locale: "zh-CN".to_string(),
            text: text.to_string(),
            speed: ProsodyFactor::new(speed).unwrap(),
            pitch: ProsodyFactor::new(pitch).unwrap(),
        }
    }

    #[test]
    fn test_ssml_prosody() {
        let ssml = build_ssml(&params("你好", 1.5, 0.8));
        assert!(ssml.contains("xml:lang=\"zh-CN\""));
        assert!(ssml.contains("<voice name=\"zh-CN-XiaoxiaoNeural\">"));
        assert!(ssml.contains("rate=\"+50%\""));
        assert!(ssml.contains("pitch=\"-20%\""));
        assert!(ssml.contains(">你好</prosody>"));

        let neutral = build_ssml(&params("hi", 1.0, 1.0));
        assert!(neutral.contains("rate=\"+0%\" pitch=\"+0%\""));
    }

    #[test]
    fn test_ssml_escapes_text() {
        let ssml = build_ssml(&params("a < b & \"c\"</prosody>", 1.0, 1.0));
        assert!(ssml.contains("a &lt; b &amp; &quot;c&quot;&lt;/prosody&gt;"));
        assert_eq!(ssml.matches("</prosody>").count(), 1);
    }

    #[test]
    fn test_content_type_for_format() {
        assert_eq!(content_type_for("audio-24khz-48kbitrate-mono-mp3"), "audio/mpeg");
        assert_eq!(content_type_for("webm-24khz-16bit-mono-opus"), "audio/webm");
        assert_eq!(content_type_for("ogg-24khz-16bit-mono-opus"), "audio/ogg");
        assert_eq!(content_type_for("riff-24khz-16bit-mono-pcm"), "audio/wav");
        assert_eq!(content_type_for("raw-8khz-8bit-mono-mulaw"), "application/octet-stream");
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "bad voice"),
            BackendError::Rejected(ref m) if m.contains("bad voice")
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            BackendError::Unavailable(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            BackendError::Unavailable(_)
        ));
        assert!(classify_status(StatusCode::GATEWAY_TIMEOUT, "").is_timeout());
    }

    #[test]
    fn test_parse_voice_list() {
        let json = r#"[
            {"Name": "Microsoft Server Speech Text to Speech Voice (zh-CN, XiaoxiaoNeural)",
             "ShortName": "zh-CN-XiaoxiaoNeural", "Gender": "Female", "Locale": "zh-CN",
             "FriendlyName": "Microsoft Xiaoxiao Online (Natural) - Chinese (Mainland)"},
            {"Name": "en-US-GuyNeural", "DisplayName": "Guy", "Gender": "Male", "Locale": "en-US"}
        ]"#;
        let entries: Vec<EdgeVoiceEntry> = serde_json::from_str(json).unwrap();
        let voices: Vec<NativeVoice> = entries.into_iter().map(NativeVoice::from).collect();

        assert_eq!(voices[0].id, "zh-CN-XiaoxiaoNeural");
        assert_eq!(voices[0].gender, "Female");
        assert!(voices[0].display_name.contains("Xiaoxiao"));
        assert_eq!(voices[1].id, "en-US-GuyNeural");
        assert_eq!(voices[1].display_name, "Guy");
    }

    #[test]
    fn test_config_default() {
        let config = EdgeTtsClientConfig::default();
        assert_eq!(config.output_format, DEFAULT_OUTPUT_FORMAT);
        assert!(EdgeTtsClient::new(config).is_ok());
    }
}
