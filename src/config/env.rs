use std::{path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mailjet: MailjetConfig,
    pub monitor: MonitorConfig,
    pub fetch: FetchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct MailjetConfig {
    pub api_key_public: Option<String>,
    pub api_key_private: Option<String>,
    pub sender_email: Option<String>,
    pub sender_name: String,
    pub receiver_email: Option<String>,
    pub api_url: String,
}

impl MailjetConfig {
    /// Returns `(public, private, sender, receiver)` only when every field is present.
    pub fn credentials(&self) -> Option<(&str, &str, &str, &str)> {
        Some((
            self.api_key_public.as_deref()?,
            self.api_key_private.as_deref()?,
            self.sender_email.as_deref()?,
            self.receiver_email.as_deref()?,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub check_interval: Duration,
    pub urls: Vec<String>,
    pub state_file: PathBuf,
    pub negative_phrases: Option<Vec<String>>,
    pub error_backoff: Duration,
}

impl MonitorConfig {
    /// URL used for the synthetic `--test` alert; never empty.
    pub fn alert_url(&self) -> &str {
        self.urls
            .first()
            .map(String::as_str)
            .unwrap_or(super::loader::DEFAULT_URL)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub request_timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub logs_dir: String,
    pub retention_days: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} (expected a positive integer)")]
    Invalid { key: &'static str, value: String },
}
