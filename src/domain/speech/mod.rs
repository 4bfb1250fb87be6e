//! Speech Context - 语音合成请求

mod request;
mod value_objects;

pub use request::SynthesisRequest;
pub use value_objects::ProsodyFactor;
