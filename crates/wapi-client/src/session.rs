//! Session state shared by every call
//!
//! Holds the versioned base URL, the basic-auth credential pair, the TLS
//! verification flag and the API-call logging toggle.

use std::fmt;

/// Basic-auth credential pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password, never printed by `Debug`
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Long-lived client session
#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    credentials: Credentials,
    tls_verify: bool,
    log_api_calls: bool,
}

impl Session {
    /// Create a session for `https://{host}/wapi/v{version}/`
    ///
    /// # Arguments
    /// * `host` - WAPI host name or IP address
    /// * `version` - WAPI version, with or without a leading `v` (e.g. "2.12", "v2.12")
    pub fn new(
        host: &str,
        version: &str,
        credentials: Credentials,
        tls_verify: bool,
        log_api_calls: bool,
    ) -> Self {
        Self::with_base_url(
            base_url_for(host, version),
            credentials,
            tls_verify,
            log_api_calls,
        )
    }

    /// Create a session for an explicit base URL (proxies, test servers)
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Credentials,
        tls_verify: bool,
        log_api_calls: bool,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            credentials,
            tls_verify,
            log_api_calls,
        }
    }

    /// Versioned base URL, always ending in `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Basic-auth credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether TLS certificates are verified
    pub fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    /// Whether each call is logged at INFO
    pub fn log_api_calls(&self) -> bool {
        self.log_api_calls
    }

    /// Build the URL for an object type or reference
    pub fn object_url(&self, object: &str) -> String {
        format!("{}{}", self.base_url, object)
    }

    pub(crate) fn set_tls_verify(&mut self, value: bool) {
        self.tls_verify = value;
    }
}

/// Strip any leading `v` from a WAPI version string
pub fn normalize_version(version: &str) -> &str {
    version.trim_start_matches('v')
}

/// Build `https://{host}/wapi/v{version}/`
pub fn base_url_for(host: &str, version: &str) -> String {
    format!("https://{}/wapi/v{}/", host, normalize_version(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_normalized() {
        assert_eq!(
            base_url_for("gm.example.com", "v2.12"),
            "https://gm.example.com/wapi/v2.12/"
        );
        assert_eq!(
            base_url_for("gm.example.com", "2.12"),
            "https://gm.example.com/wapi/v2.12/"
        );
    }

    #[test]
    fn test_object_url() {
        let session = Session::new(
            "10.0.0.1",
            "2.11",
            Credentials::new("admin", "infoblox"),
            true,
            false,
        );
        assert_eq!(
            session.object_url("record:host"),
            "https://10.0.0.1/wapi/v2.11/record:host"
        );
    }

    #[test]
    fn test_explicit_base_url_gets_trailing_slash() {
        let session = Session::with_base_url(
            "http://127.0.0.1:8080/wapi/v2.12",
            Credentials::new("admin", "infoblox"),
            false,
            true,
        );
        assert_eq!(session.base_url(), "http://127.0.0.1:8080/wapi/v2.12/");
        assert!(!session.tls_verify());
        assert!(session.log_api_calls());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "s3cret"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret"));
    }
}
