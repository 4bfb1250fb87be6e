//! Model Query Handlers

use std::sync::Arc;

use crate::application::ports::ModelRegistryPort;
use crate::application::queries::ListModels;
use crate::domain::model::Model;

/// ListModels Handler
pub struct ListModelsHandler {
    models: Arc<dyn ModelRegistryPort>,
}

impl ListModelsHandler {
    pub fn new(models: Arc<dyn ModelRegistryPort>) -> Self {
        Self { models }
    }

    pub fn handle(&self, _query: ListModels) -> Vec<Model> {
        self.models.list_models()
    }
}
