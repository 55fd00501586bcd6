use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use yansi::Paint;

use super::error::FetchError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Source of the raw inventory payload. The polling controller only sees
/// this trait, so tests can script failures without a network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// URL shown to the user when every attempt failed.
    fn endpoint(&self) -> &str;

    /// One attempt: request the endpoint and decode the body as JSON.
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// Fetches the inventory with a plain `GET`, no query and no auth headers.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("infradash/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Value, FetchError> {
        // --- Curl Logging ---
        let parts = [
            Paint::new("curl").fg(yansi::Color::Green).bold().to_string(),
            format!("-X {}", Paint::new("GET").fg(yansi::Color::Yellow).bold()),
            format!("'{}'", Paint::new(&self.url).fg(yansi::Color::Cyan)),
        ];
        log_output(format!("Request:\n{}", parts.join(" ")));
        // --------------------

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log_output(format!("Response:\n{}", Paint::new(format!("HTTP {}", status)).fg(yansi::Color::Red)));
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await.map_err(|e| FetchError::Transport(e.to_string()))?;

        // Grayed out, the body can be long
        let summary = format!("HTTP {} ({} bytes)", status, text.len());
        log_output(format!("Response:\n{}", Paint::new(summary).rgb(100, 100, 100)));

        serde_json::from_str(&text).map_err(|e| FetchError::Payload(format!("Failed to parse JSON: {}", e)))
    }
}
