//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ContentService;
use crate::config::ApiConfig;

#[derive(Clone)]
pub struct AppState {
    pub content_service: Arc<ContentService>,
    pub api_config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(content_service: Arc<ContentService>, api_config: Arc<ApiConfig>) -> Self {
        Self {
            content_service,
            api_config,
        }
    }
}
