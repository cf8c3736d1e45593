use std::{env, path::PathBuf, time::Duration};

use super::env::{
    AppConfig, ConfigError, FetchConfig, LoggingConfig, MailjetConfig, MonitorConfig,
};

pub const DEFAULT_URL: &str = "https://ais.usvisa-info.com/en-in/niv/appointments";
pub const DEFAULT_MAILJET_URL: &str = "https://api.mailjet.com/v3.1/send";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const ERROR_BACKOFF: Duration = Duration::from_secs(60);

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mailjet = MailjetConfig {
            api_key_public: get("MJ_APIKEY_PUBLIC"),
            api_key_private: get("MJ_APIKEY_PRIVATE"),
            sender_email: get("MJ_SENDER_EMAIL"),
            sender_name: get("MJ_SENDER_NAME").unwrap_or_else(|| "Visa Monitor".to_string()),
            receiver_email: get("MJ_RECEIVER_EMAIL"),
            api_url: get("MJ_API_URL").unwrap_or_else(|| DEFAULT_MAILJET_URL.to_string()),
        };

        let interval_minutes = parse_positive("CHECK_INTERVAL_MINUTES", get("CHECK_INTERVAL_MINUTES"), 30)?;
        let timeout_secs = parse_positive("REQUEST_TIMEOUT", get("REQUEST_TIMEOUT"), 15)?;
        let retention_days = parse_positive("LOG_RETENTION_DAYS", get("LOG_RETENTION_DAYS"), 14)?;

        let monitor = MonitorConfig {
            check_interval: Duration::from_secs(interval_minutes * 60),
            urls: parse_urls(get("CONSULATE_URLS").as_deref().unwrap_or(DEFAULT_URL)),
            state_file: PathBuf::from(
                get("STATE_FILE").unwrap_or_else(|| "last_status.json".to_string()),
            ),
            negative_phrases: get("NEGATIVE_PHRASES")
                .map(|value| {
                    value
                        .split(';')
                        .map(|part| part.trim().to_string())
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|phrases| !phrases.is_empty()),
            error_backoff: ERROR_BACKOFF,
        };

        let fetch = FetchConfig {
            request_timeout: Duration::from_secs(timeout_secs),
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
        };

        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            logs_dir: get("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
            retention_days: retention_days as usize,
        };

        Ok(Self {
            mailjet,
            monitor,
            fetch,
            logging,
        })
    }
}

fn parse_positive(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}

fn parse_urls(raw: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let url = part.trim();
        if url.is_empty() || urls.iter().any(|seen| seen == url) {
            continue;
        }
        urls.push(url.to_string());
    }
    urls
}
