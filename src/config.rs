//! Configuration management for WPBot.
//!
//! Settings come from environment variables (optionally through a `.env`
//! file); command-line flags override them in `main`.

use crate::domain::{CountryRule, CountryTable, DEFAULT_COUNTRY};
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// WebDriver endpoint, e.g. a local chromedriver (default: http://localhost:9515)
    pub webdriver_url: String,

    /// WhatsApp Web base URL (default: https://web.whatsapp.com)
    pub web_client_url: String,

    /// HTTP timeout for a single WebDriver request in seconds (default: 30)
    pub request_timeout: u64,

    /// Interval between element lookups while waiting, in milliseconds (default: 500)
    pub poll_interval_ms: u64,

    /// Browser profile directory reused across runs so the QR login sticks
    pub chrome_user_data_dir: Option<PathBuf>,

    /// Country used for normalization when none is given (default: "Turkey")
    pub default_country: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `WPBOT_WEBDRIVER_URL`: WebDriver endpoint (default: http://localhost:9515)
    /// - `WPBOT_WEB_CLIENT_URL`: WhatsApp Web base URL (default: https://web.whatsapp.com)
    /// - `WPBOT_REQUEST_TIMEOUT`: WebDriver HTTP timeout in seconds (default: 30)
    /// - `WPBOT_POLL_INTERVAL_MS`: element polling interval (default: 500)
    /// - `WPBOT_CHROME_USER_DATA_DIR`: persistent browser profile directory
    /// - `WPBOT_DEFAULT_COUNTRY`: normalization country (default: "Turkey")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let webdriver_url =
            env::var("WPBOT_WEBDRIVER_URL").unwrap_or(defaults.webdriver_url);
        Self::validate_http_url("WPBOT_WEBDRIVER_URL", &webdriver_url)?;

        let web_client_url =
            env::var("WPBOT_WEB_CLIENT_URL").unwrap_or(defaults.web_client_url);
        Self::validate_http_url("WPBOT_WEB_CLIENT_URL", &web_client_url)?;

        let request_timeout = Self::parse_env_u64("WPBOT_REQUEST_TIMEOUT", defaults.request_timeout)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "WPBOT_REQUEST_TIMEOUT".to_string(),
                reason: "Must be at least 1 second".to_string(),
            });
        }

        let poll_interval_ms =
            Self::parse_env_u64("WPBOT_POLL_INTERVAL_MS", defaults.poll_interval_ms)?;
        if poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                var: "WPBOT_POLL_INTERVAL_MS".to_string(),
                reason: "Must be at least 1 millisecond".to_string(),
            });
        }

        let chrome_user_data_dir = env::var("WPBOT_CHROME_USER_DATA_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let default_country = env::var("WPBOT_DEFAULT_COUNTRY")
            .ok()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(defaults.default_country);

        Ok(Config {
            webdriver_url,
            web_client_url,
            request_timeout,
            poll_interval_ms,
            chrome_user_data_dir,
            default_country,
        })
    }

    /// Check that `value` is an http(s) URL.
    pub fn validate_http_url(var: &str, value: &str) -> ConfigResult<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: var.to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            webdriver_url: "http://localhost:9515".to_string(),
            web_client_url: "https://web.whatsapp.com".to_string(),
            request_timeout: 30,
            poll_interval_ms: 500,
            chrome_user_data_dir: None,
            default_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// Load the country table: the built-in one, or a JSON array of rules from
/// `path`, which replaces the built-in table entirely.
pub fn load_country_table(path: Option<&Path>) -> ConfigResult<CountryTable> {
    let Some(path) = path else {
        return Ok(CountryTable::builtin());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |reason: String| ConfigError::InvalidCountryTable {
        path: path.to_path_buf(),
        reason,
    };

    let rules: Vec<CountryRule> =
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    if rules.is_empty() {
        return Err(invalid("no countries defined".to_string()));
    }

    let table = CountryTable::from_rules(rules).map_err(|e| invalid(e.to_string()))?;
    tracing::info!("Loaded {} country rule(s) from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    // Helper to set and unset env vars for testing
    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.web_client_url, "https://web.whatsapp.com");
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.default_country, "Turkey");
        assert!(config.chrome_user_data_dir.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env_overrides() {
        let mut guard = EnvGuard::new();
        guard.set("WPBOT_WEBDRIVER_URL", "http://127.0.0.1:4444");
        guard.set("WPBOT_REQUEST_TIMEOUT", "12");
        guard.set("WPBOT_CHROME_USER_DATA_DIR", "/tmp/wpbot-profile");
        guard.set("WPBOT_DEFAULT_COUNTRY", "Germany");

        let config = Config::from_env().unwrap();
        assert_eq!(config.webdriver_url, "http://127.0.0.1:4444");
        assert_eq!(config.request_timeout, 12);
        assert_eq!(
            config.chrome_user_data_dir,
            Some(PathBuf::from("/tmp/wpbot-profile"))
        );
        assert_eq!(config.default_country, "Germany");
    }

    #[test]
    #[serial]
    fn test_config_from_env_invalid_url() {
        let mut guard = EnvGuard::new();
        guard.set("WPBOT_WEBDRIVER_URL", "localhost:9515");

        let result = Config::from_env();
        assert!(result.is_err());
        if let Err(ConfigError::InvalidValue { var, .. }) = result {
            assert_eq!(var, "WPBOT_WEBDRIVER_URL");
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_zero_timeout() {
        let mut guard = EnvGuard::new();
        guard.set("WPBOT_REQUEST_TIMEOUT", "0");

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_config_from_env_zero_poll_interval() {
        let mut guard = EnvGuard::new();
        guard.set("WPBOT_POLL_INTERVAL_MS", "0");

        let result = Config::from_env();
        match result {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "WPBOT_POLL_INTERVAL_MS"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_parse_env_u64_invalid() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_WPBOT_U64_INVALID", "not-a-number");

        let result = Config::parse_env_u64("TEST_WPBOT_U64_INVALID", 10);
        assert!(result.is_err());

        let result = Config::parse_env_u64("TEST_WPBOT_U64_NONEXISTENT", 10);
        assert_eq!(result.unwrap(), 10);
    }

    #[test]
    fn test_load_builtin_country_table() {
        let table = load_country_table(None).unwrap();
        assert!(table.get("Turkey").is_some());
    }

    #[test]
    fn test_load_custom_country_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Testland", "dialing_code": "+999", "local_prefix_patterns": ["999", "0"], "description": "Test numbers"}}]"#
        )
        .unwrap();

        let table = load_country_table(Some(file.path())).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("Turkey").is_none());
        assert_eq!(table.get("testland").unwrap().dialing_code(), "+999");
    }

    #[test]
    fn test_load_invalid_country_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Testland", "dialing_code": "999", "local_prefix_patterns": ["999"]}}]"#
        )
        .unwrap();

        let result = load_country_table(Some(file.path()));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidCountryTable { .. })
        ));

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(load_country_table(Some(empty.path())).is_err());
    }
}
