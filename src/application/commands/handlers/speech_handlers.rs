//! Speech Command Handlers
//!
//! 单个请求的状态流转:
//! Received -> Validated -> Resolved -> Dispatched -> Completed | Failed

use crate::application::commands::SynthesizeSpeech;
use crate::application::error::ApplicationError;
use crate::application::services::{
    RequestValidator, SynthesisDispatcher, SynthesisResult, VoiceResolver,
};

/// SynthesizeSpeech Handler
pub struct SynthesizeSpeechHandler {
    validator: RequestValidator,
    resolver: VoiceResolver,
    dispatcher: SynthesisDispatcher,
}

impl SynthesizeSpeechHandler {
    pub fn new(
        validator: RequestValidator,
        resolver: VoiceResolver,
        dispatcher: SynthesisDispatcher,
    ) -> Self {
        Self {
            validator,
            resolver,
            dispatcher,
        }
    }

    pub async fn handle(
        &self,
        command: SynthesizeSpeech,
    ) -> Result<SynthesisResult, ApplicationError> {
        let request_id = command.request_id;
        tracing::debug!(request_id = %request_id, "Speech request received");

        let request = self.validator.validate(command.raw).map_err(|e| {
            tracing::info!(request_id = %request_id, error = %e, "Speech request failed validation");
            e
        })?;
        tracing::debug!(
            request_id = %request_id,
            model = %request.model,
            stream = request.stream,
            input_chars = request.input.chars().count(),
            "Speech request validated"
        );

        let voice = self.resolver.resolve(&request.voice).map_err(|e| {
            tracing::info!(request_id = %request_id, voice = %request.voice, error = %e, "Voice resolution failed");
            e
        })?;
        tracing::debug!(
            request_id = %request_id,
            token = %request.voice,
            voice_id = %voice.id(),
            "Voice resolved"
        );

        let result = self
            .dispatcher
            .synthesize(
                &voice,
                &request.input,
                request.speed,
                request.pitch,
                request.stream,
            )
            .await
            .map_err(|e| {
                tracing::warn!(request_id = %request_id, voice_id = %voice.id(), error = %e, "Synthesis failed");
                ApplicationError::from(e)
            })?;

        match &result {
            SynthesisResult::Buffered { audio, .. } => tracing::info!(
                request_id = %request_id,
                voice_id = %voice.id(),
                audio_size = audio.len(),
                "Speech synthesized"
            ),
            SynthesisResult::Chunked { .. } => tracing::info!(
                request_id = %request_id,
                voice_id = %voice.id(),
                "Speech stream started"
            ),
        }

        Ok(result)
    }
}
