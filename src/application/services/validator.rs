//! Request Validator - 合成请求校验
//!
//! 校验规则:
//! - input 必填，去除首尾空白后非空，且不超过长度上限
//! - model 必填，且必须已在注册表中登记
//! - voice 必填
//! - speed / pitch 缺省为 1.0；提供时必须为 (0, 3] 内的数值，越界报错而非截断
//! - stream 可选布尔；模型不支持流式时 stream=true 报错
//! - response_format 可选，仅支持 mp3

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ModelRegistryPort;
use crate::domain::model::{Capability, Model};
use crate::domain::speech::{ProsodyFactor, SynthesisRequest};

/// 默认输入长度上限（字符数）
pub const DEFAULT_MAX_INPUT_CHARS: usize = 4096;

const SUPPORTED_RESPONSE_FORMATS: &[&str] = &["mp3"];

/// 原始请求体
///
/// 所有字段保留为 JSON 值，以便逐字段给出错误
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpeechRequest {
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub input: Option<Value>,
    #[serde(default)]
    pub voice: Option<Value>,
    #[serde(default)]
    pub speed: Option<Value>,
    #[serde(default)]
    pub pitch: Option<Value>,
    #[serde(default)]
    pub stream: Option<Value>,
    #[serde(default)]
    pub response_format: Option<Value>,
}

/// 请求校验器
pub struct RequestValidator {
    models: Arc<dyn ModelRegistryPort>,
    max_input_chars: usize,
}

impl RequestValidator {
    pub fn new(models: Arc<dyn ModelRegistryPort>, max_input_chars: usize) -> Self {
        Self {
            models,
            max_input_chars,
        }
    }

    pub fn validate(&self, raw: RawSpeechRequest) -> Result<SynthesisRequest, ApplicationError> {
        let input = required_string("input", raw.input.as_ref())?;
        if input.trim().is_empty() {
            return Err(ApplicationError::validation("input", "must not be empty"));
        }
        let char_count = input.chars().count();
        if char_count > self.max_input_chars {
            return Err(ApplicationError::validation(
                "input",
                format!(
                    "must be at most {} characters, got {}",
                    self.max_input_chars, char_count
                ),
            ));
        }

        let model_id = required_string("model", raw.model.as_ref())?;
        let model = self.models.get(&model_id).ok_or_else(|| {
            ApplicationError::validation("model", format!("model '{}' does not exist", model_id))
        })?;

        let voice = required_string("voice", raw.voice.as_ref())?;
        if voice.trim().is_empty() {
            return Err(ApplicationError::validation("voice", "must not be empty"));
        }

        let speed = prosody("speed", raw.speed.as_ref(), &model, Capability::RateControl)?;
        let pitch = prosody("pitch", raw.pitch.as_ref(), &model, Capability::PitchControl)?;

        let stream = match non_null(raw.stream.as_ref()) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(ApplicationError::validation("stream", "must be a boolean")),
        };
        if stream && !model.supports(Capability::Streaming) {
            return Err(ApplicationError::validation(
                "stream",
                format!("model '{}' does not support streaming", model.id()),
            ));
        }

        if let Some(format) = non_null(raw.response_format.as_ref()) {
            let format = format.as_str().ok_or_else(|| {
                ApplicationError::validation("response_format", "must be a string")
            })?;
            if !SUPPORTED_RESPONSE_FORMATS.contains(&format) {
                return Err(ApplicationError::validation(
                    "response_format",
                    format!("unsupported format '{}'", format),
                ));
            }
        }

        Ok(SynthesisRequest {
            model: model.id().to_string(),
            input,
            voice,
            speed,
            pitch,
            stream,
        })
    }
}

/// JSON null 视同字段缺省
fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn required_string(field: &'static str, value: Option<&Value>) -> Result<String, ApplicationError> {
    match non_null(value) {
        None => Err(ApplicationError::validation(field, "is required")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApplicationError::validation(field, "must be a string")),
    }
}

fn prosody(
    field: &'static str,
    value: Option<&Value>,
    model: &Model,
    capability: Capability,
) -> Result<ProsodyFactor, ApplicationError> {
    let Some(value) = non_null(value) else {
        return Ok(ProsodyFactor::NEUTRAL);
    };

    if !model.supports(capability) {
        return Err(ApplicationError::validation(
            field,
            format!("model '{}' does not support {}", model.id(), field),
        ));
    }

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ApplicationError::validation(field, "must be a number"))?;

    ProsodyFactor::new(number).map_err(|reason| ApplicationError::validation(field, reason))
}
