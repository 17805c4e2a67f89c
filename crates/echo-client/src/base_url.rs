//! Validated absolute base URLs for the proxy and the query API.

use crate::error::EchoError;
use hyper::Uri;
use std::fmt;

/// An absolute `scheme://host[:port][/prefix]` URL with no trailing slash,
/// query or fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self, EchoError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let uri: Uri = trimmed
            .parse()
            .map_err(|e| EchoError::InvalidProxyBaseUrl(format!("{raw}: {e}")))?;

        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(EchoError::InvalidProxyBaseUrl(format!(
                "{raw}: expected scheme and host"
            )));
        }
        if uri.query().is_some() || trimmed.contains('#') {
            return Err(EchoError::InvalidProxyBaseUrl(format!(
                "{raw}: query strings and fragments are not allowed"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a path (and optional query) that starts with `/` or `?`.
    pub fn join(&self, path_and_query: &str) -> String {
        format!("{}{}", self.0, path_and_query)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when `raw` parses as an absolute URI with both scheme and host.
pub(crate) fn is_absolute(raw: &str) -> bool {
    raw.parse::<Uri>()
        .map(|uri| uri.scheme().is_some() && uri.authority().is_some_and(|a| !a.host().is_empty()))
        .unwrap_or(false)
}
