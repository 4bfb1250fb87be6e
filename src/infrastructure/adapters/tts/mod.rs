//! TTS Adapter - 合成后端客户端实现

mod edge_tts_client;
mod fake_tts_client;

pub use edge_tts_client::*;
pub use fake_tts_client::{FakeSynthesisFailure, FakeTtsClient, FakeTtsClientConfig};
