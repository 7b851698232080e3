use std::env;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.web3forms.com/submit";
pub const DEFAULT_BUSINESS_NAME: &str = "Ottawa Pristine Cleaning";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got \"{0}\"")]
    InvalidPort(String),
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub access_key: String,
    pub endpoint: String,
    pub recipient: Option<String>,
}

impl RelayConfig {
    pub fn enabled(&self) -> bool {
        !self.access_key.trim().is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Unset disables booking persistence, availability and the admin view.
    pub database_url: Option<String>,
    pub relay: RelayConfig,
    pub business_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or(ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            database_url: non_empty("DATABASE_URL"),
            relay: RelayConfig {
                access_key: non_empty("RELAY_ACCESS_KEY").unwrap_or_default(),
                endpoint: non_empty("RELAY_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_RELAY_ENDPOINT.to_string()),
                recipient: non_empty("RELAY_TO"),
            },
            business_name: non_empty("BUSINESS_NAME")
                .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string()),
        })
    }

    /// Logs every feature that is switched off by missing settings.
    pub fn log_disabled_features(&self) {
        if self.database_url.is_none() {
            log::warn!("DATABASE_URL not set. Booking storage, availability and admin are disabled.");
        }
        if !self.relay.enabled() {
            log::warn!("RELAY_ACCESS_KEY not set. Email relay of bookings and contact messages is disabled.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        try_config(pairs).unwrap()
    }

    fn try_config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_disables_integrations() {
        let config = config(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_url.is_none());
        assert!(!config.relay.enabled());
        assert_eq!(config.relay.endpoint, DEFAULT_RELAY_ENDPOINT);
        assert_eq!(config.business_name, DEFAULT_BUSINESS_NAME);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = config(&[("DATABASE_URL", "  "), ("RELAY_ACCESS_KEY", ""), ("PORT", " ")]);
        assert!(config.database_url.is_none());
        assert!(!config.relay.enabled());
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn malformed_port_is_an_error() {
        assert_eq!(
            try_config(&[("PORT", "abc")]).unwrap_err(),
            ConfigError::InvalidPort("abc".to_string())
        );
        assert!(try_config(&[("PORT", "0")]).is_err());
    }

    #[test]
    fn reads_all_settings() {
        let config = config(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "sqlite://./data/bookings.db"),
            ("RELAY_ACCESS_KEY", "key-123"),
            ("RELAY_TO", "office@example.com"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url.as_deref(), Some("sqlite://./data/bookings.db"));
        assert!(config.relay.enabled());
        assert_eq!(config.relay.recipient.as_deref(), Some("office@example.com"));
    }
}
