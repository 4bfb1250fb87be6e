//! HTTP Handlers

mod model;
mod ping;
mod speech;
mod voice;

pub use model::*;
pub use ping::*;
pub use speech::*;
pub use voice::*;
