//! Client configuration.

use crate::base_url::BaseUrl;
use crate::error::EchoError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:8080";
pub const DEFAULT_QUERY_API_URL: &str = "http://localhost:8082/api/v1";
pub const DEFAULT_SESSION: &str = "default-session";

/// Where the proxy and query API live and how long to wait for them.
///
/// ```yaml
/// proxyUrl: http://localhost:8080
/// queryApiUrl: http://localhost:8082/api/v1
/// requestTimeoutSecs: 30
/// defaultSession: default-session
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub proxy_url: String,
    pub query_api_url: String,
    /// Per-request timeout in seconds; 0 disables it.
    pub request_timeout_secs: u64,
    pub default_session: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            query_api_url: DEFAULT_QUERY_API_URL.to_string(),
            request_timeout_secs: 30,
            default_session: DEFAULT_SESSION.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.proxy_base()
            .map_err(|e| anyhow::anyhow!("proxyUrl: {e}"))?;
        self.query_base()
            .map_err(|e| anyhow::anyhow!("queryApiUrl: {e}"))?;
        if self.default_session.trim().is_empty() {
            anyhow::bail!("defaultSession must not be blank");
        }
        Ok(())
    }

    pub fn proxy_base(&self) -> Result<BaseUrl, EchoError> {
        BaseUrl::parse(&self.proxy_url)
    }

    pub fn query_base(&self) -> Result<BaseUrl, EchoError> {
        BaseUrl::parse(&self.query_api_url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.proxy_base().unwrap().as_str(), "http://localhost:8080");
        assert_eq!(
            config.query_base().unwrap().as_str(),
            "http://localhost:8082/api/v1"
        );
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_yaml("proxyUrl: http://proxy.internal:9090/\nrequestTimeoutSecs: 0\n");
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.proxy_url, "http://proxy.internal:9090/");
        assert_eq!(config.proxy_base().unwrap().as_str(), "http://proxy.internal:9090");
        assert_eq!(config.query_api_url, DEFAULT_QUERY_API_URL);
        assert_eq!(config.default_session, DEFAULT_SESSION);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_relative_proxy_url_rejected() {
        let file = write_yaml("proxyUrl: localhost:8080\n");
        let err = ClientConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("proxyUrl"));
    }

    #[test]
    fn test_blank_default_session_rejected() {
        let config = ClientConfig {
            default_session: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(ClientConfig::from_file("/nonexistent/echo.yaml").is_err());
    }
}
