//! Client configuration
//!
//! Configuration is a plain struct with defaults, optionally loaded from
//! environment variables:
//!
//! | Variable | Default |
//! |---|---|
//! | `WAPI_HOST` | required |
//! | `WAPI_USERNAME` | required |
//! | `WAPI_PASSWORD` | required |
//! | `WAPI_VERSION` | `2.12` |
//! | `WAPI_TLS_VERIFY` | `true` |
//! | `WAPI_LOG_API_CALLS` | `false` |
//! | `WAPI_TIMEOUT_SECS` | `30` |
//! | `WAPI_BASE_URL` | derived from host and version |

use crate::error::WapiError;
use crate::session::{Credentials, Session};
use crate::transport::DEFAULT_TIMEOUT;
use std::time::Duration;

/// Default WAPI version (NIOS 8.6)
pub const DEFAULT_WAPI_VERSION: &str = "2.12";

/// Settings used to build a [`WapiClient`](crate::WapiClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WAPI host name or IP address
    pub host: String,
    /// Basic-auth credentials
    pub credentials: Credentials,
    /// WAPI version, with or without a leading `v`
    pub version: String,
    /// Verify TLS certificates
    pub tls_verify: bool,
    /// Log every call at INFO instead of DEBUG
    pub log_api_calls: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Overrides the `https://{host}/wapi/v{version}/` base URL
    pub base_url: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with default version, TLS and logging settings
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            credentials: Credentials::new(username, password),
            version: DEFAULT_WAPI_VERSION.to_string(),
            tls_verify: true,
            log_api_calls: false,
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        }
    }

    /// Set the WAPI version
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Enable or disable TLS certificate verification
    #[must_use]
    pub fn tls_verify(mut self, tls_verify: bool) -> Self {
        self.tls_verify = tls_verify;
        self
    }

    /// Enable or disable INFO-level call logging
    #[must_use]
    pub fn log_api_calls(mut self, log_api_calls: bool) -> Self {
        self.log_api_calls = log_api_calls;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use an explicit base URL instead of deriving one from host and version
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Load configuration from `WAPI_*` environment variables
    pub fn from_env() -> Result<Self, WapiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WapiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| {
                WapiError::InvalidConfig(format!("{} environment variable is required", key))
            })
        };

        let mut config = Self::new(
            required("WAPI_HOST")?,
            required("WAPI_USERNAME")?,
            required("WAPI_PASSWORD")?,
        );

        if let Some(version) = lookup("WAPI_VERSION") {
            config.version = version;
        }
        if let Some(value) = lookup("WAPI_TLS_VERIFY") {
            config.tls_verify = parse_bool("WAPI_TLS_VERIFY", &value)?;
        }
        if let Some(value) = lookup("WAPI_LOG_API_CALLS") {
            config.log_api_calls = parse_bool("WAPI_LOG_API_CALLS", &value)?;
        }
        if let Some(value) = lookup("WAPI_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| {
                WapiError::InvalidConfig(format!(
                    "WAPI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    value
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        config.base_url = lookup("WAPI_BASE_URL").filter(|v| !v.is_empty());

        Ok(config)
    }

    /// Build the session described by this configuration
    pub fn session(&self) -> Session {
        match &self.base_url {
            Some(base_url) => Session::with_base_url(
                base_url.clone(),
                self.credentials.clone(),
                self.tls_verify,
                self.log_api_calls,
            ),
            None => Session::new(
                &self.host,
                &self.version,
                self.credentials.clone(),
                self.tls_verify,
                self.log_api_calls,
            ),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, WapiError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(WapiError::InvalidConfig(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("WAPI_HOST", "gm.example.com"),
            ("WAPI_USERNAME", "admin"),
            ("WAPI_PASSWORD", "infoblox"),
        ]))
        .unwrap();

        assert_eq!(config.version, DEFAULT_WAPI_VERSION);
        assert!(config.tls_verify);
        assert!(!config.log_api_calls);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(
            config.session().base_url(),
            "https://gm.example.com/wapi/v2.12/"
        );
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("WAPI_HOST", "gm.example.com"),
            ("WAPI_USERNAME", "admin"),
            ("WAPI_PASSWORD", "infoblox"),
            ("WAPI_VERSION", "v2.11"),
            ("WAPI_TLS_VERIFY", "false"),
            ("WAPI_LOG_API_CALLS", "1"),
            ("WAPI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert!(!config.tls_verify);
        assert!(config.log_api_calls);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.session().base_url(),
            "https://gm.example.com/wapi/v2.11/"
        );
    }

    #[test]
    fn test_missing_host_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("WAPI_USERNAME", "admin"),
            ("WAPI_PASSWORD", "infoblox"),
        ]))
        .unwrap_err();
        assert!(matches!(err, WapiError::InvalidConfig(msg) if msg.contains("WAPI_HOST")));
    }

    #[test]
    fn test_bad_boolean_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("WAPI_HOST", "gm.example.com"),
            ("WAPI_USERNAME", "admin"),
            ("WAPI_PASSWORD", "infoblox"),
            ("WAPI_TLS_VERIFY", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, WapiError::InvalidConfig(_)));
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::new("ignored", "admin", "infoblox")
            .base_url("http://127.0.0.1:9000/wapi/v2.12");
        assert_eq!(config.session().base_url(), "http://127.0.0.1:9000/wapi/v2.12/");
    }
}
