use std::sync::Arc;
use std::time::Duration;

use crate::services::PollingController;

/// Shared state of the web dashboard, created when the server starts and
/// dropped with it.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<PollingController>,
    pub api_url: String,
    /// Attempts used by a manual refresh.
    pub max_attempts: u32,
    /// Seconds between page reloads, matching the auto-refresh interval.
    pub refresh_secs: u64,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(controller: Arc<PollingController>, max_attempts: u32, refresh_interval: Duration) -> Self {
        Self {
            api_url: controller.endpoint().to_string(),
            controller,
            max_attempts,
            refresh_secs: refresh_interval.as_secs().max(1),
            custom_css: None,
        }
    }
}
