//! Application State
//!
//! 持有所有端口与 Command/Query Handlers

use std::sync::Arc;

use crate::application::{
    // Command handlers
    RefreshVoiceCatalogHandler, SynthesizeSpeechHandler,
    // Query handlers
    ListModelsHandler, ListVoicesHandler,
    // Services
    AliasTable, DispatchConfig, RequestValidator, SynthesisDispatcher, VoiceResolver,
    // Ports
    ModelRegistryPort, SpeechBackendPort, VoiceCatalogPort,
};
use crate::application::services::DEFAULT_MAX_INPUT_CHARS;

/// 网关选项
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub aliases: AliasTable,
    pub dispatch: DispatchConfig,
    pub max_input_chars: usize,
    /// 设置后 /v1 接口需要 Bearer 鉴权
    pub api_key: Option<String>,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            aliases: AliasTable::builtin(),
            dispatch: DispatchConfig::default(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            api_key: None,
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub backend: Arc<dyn SpeechBackendPort>,
    pub catalog: Arc<dyn VoiceCatalogPort>,
    pub models: Arc<dyn ModelRegistryPort>,
    pub api_key: Option<String>,

    // ========== Command Handlers ==========
    pub synthesize_handler: SynthesizeSpeechHandler,
    pub refresh_catalog_handler: Arc<RefreshVoiceCatalogHandler>,

    // ========== Query Handlers ==========
    pub list_models_handler: ListModelsHandler,
    pub list_voices_handler: ListVoicesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        backend: Arc<dyn SpeechBackendPort>,
        catalog: Arc<dyn VoiceCatalogPort>,
        models: Arc<dyn ModelRegistryPort>,
        options: GatewayOptions,
    ) -> Self {
        let synthesize_handler = SynthesizeSpeechHandler::new(
            RequestValidator::new(models.clone(), options.max_input_chars),
            VoiceResolver::new(options.aliases, catalog.clone()),
            SynthesisDispatcher::new(backend.clone(), options.dispatch),
        );

        Self {
            // Ports
            backend: backend.clone(),
            catalog: catalog.clone(),
            models: models.clone(),
            api_key: options.api_key.filter(|k| !k.is_empty()),

            // Command handlers
            synthesize_handler,
            refresh_catalog_handler: Arc::new(RefreshVoiceCatalogHandler::new(
                backend.clone(),
                catalog.clone(),
            )),

            // Query handlers
            list_models_handler: ListModelsHandler::new(models.clone()),
            list_voices_handler: ListVoicesHandler::new(catalog.clone()),
        }
    }
}
