use std::env;
use std::path::Path;
use std::time::Duration;

use crate::models::FieldMapping;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/metrics";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MOCK_HOST: &str = "127.0.0.1";
pub const DEFAULT_MOCK_PORT: u16 = 5000;
pub const DEFAULT_MOCK_DATA_FILE: &str = "MockData/mock_ec2.json";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_url() -> String {
    sanitize_base_url(&env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()))
}

pub fn get_refresh_interval() -> Duration {
    Duration::from_secs(parse_positive("REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS))
}

pub fn get_max_attempts() -> u32 {
    parse_positive("MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS as u64) as u32
}

pub fn get_request_timeout() -> Duration {
    Duration::from_secs(parse_positive("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS))
}

/// Field aliases from `FIELD_MAP`, e.g. `id=InstanceID,name=Hostname`.
/// Each alias is tried before the built-in ones for that field.
pub fn get_field_mapping() -> FieldMapping {
    let raw = env::var("FIELD_MAP").unwrap_or_default();
    let mut mapping = FieldMapping::default();
    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((field, alias)) if !alias.trim().is_empty() => {
                if !mapping.prepend_alias(field.trim(), alias.trim()) {
                    tracing::warn!(field = field.trim(), "FIELD_MAP names an unknown field; ignoring");
                }
            }
            _ => tracing::warn!(entry = pair, "FIELD_MAP entry is not of the form field=Alias; ignoring"),
        }
    }
    mapping
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_positive(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => v,
            _ => {
                tracing::warn!(%key, value = %raw, default, "invalid value; using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Everything the dashboard needs, read once at startup.
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub api_url: String,
    pub refresh_interval: Duration,
    pub max_attempts: u32,
    pub request_timeout: Duration,
    pub field_mapping: FieldMapping,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: get_api_url(),
            refresh_interval: get_refresh_interval(),
            max_attempts: get_max_attempts(),
            request_timeout: get_request_timeout(),
            field_mapping: get_field_mapping(),
        }
    }
}
