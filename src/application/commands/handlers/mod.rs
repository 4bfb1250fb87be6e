//! Command Handlers

mod catalog_handlers;
mod speech_handlers;

pub use catalog_handlers::{RefreshOutcome, RefreshVoiceCatalogHandler};
pub use speech_handlers::SynthesizeSpeechHandler;
