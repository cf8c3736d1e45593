pub mod env;
mod loader;

pub use env::{
    AppConfig, ConfigError, FetchConfig, LoggingConfig, MailjetConfig, MonitorConfig,
};
pub use loader::load_config;

#[cfg(test)]
pub(crate) fn config_for_tests(pairs: &[(&str, &str)]) -> AppConfig {
    let vars: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}
