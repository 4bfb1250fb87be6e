//! Query Handlers

mod model_handlers;
mod voice_handlers;

pub use model_handlers::ListModelsHandler;
pub use voice_handlers::{ListVoicesHandler, VoiceListing};
