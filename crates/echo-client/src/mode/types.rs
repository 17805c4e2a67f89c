//! Proxy mode and the wire shapes of the `/api/mode` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operating mode of the Echo proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProxyMode {
    /// Forward to the real target and persist the exchange
    Record,
    /// Serve previously recorded responses
    Replay,
}

impl ProxyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyMode::Record => "RECORD",
            ProxyMode::Replay => "REPLAY",
        }
    }

    /// The other mode.
    pub fn toggled(&self) -> Self {
        match self {
            ProxyMode::Record => ProxyMode::Replay,
            ProxyMode::Replay => ProxyMode::Record,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProxyMode::Record => {
                "All requests are forwarded to the target and recorded to the database."
            }
            ProxyMode::Replay => {
                "Requests are served from previously recorded responses in the database."
            }
        }
    }
}

impl fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown proxy mode {0:?}, expected RECORD or REPLAY")]
pub struct UnknownMode(pub String);

impl FromStr for ProxyMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RECORD" => Ok(ProxyMode::Record),
            "REPLAY" => Ok(ProxyMode::Replay),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Reply body shared by every `/api/mode*` endpoint. Which fields are present
/// depends on the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for the `/api/mode*` POST endpoints. Exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProxyMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ModeUpdate {
    pub fn mode(mode: ProxyMode) -> Self {
        Self {
            mode: Some(mode),
            ..Default::default()
        }
    }

    pub fn target_url(url: impl Into<String>) -> Self {
        Self {
            target_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn session_id(id: impl Into<String>) -> Self {
        Self {
            session_id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// A value last confirmed by the proxy at `confirmed_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached<T> {
    value: T,
    confirmed_at: DateTime<Utc>,
}

impl<T> Cached<T> {
    pub(crate) fn now(value: T) -> Self {
        Self {
            value,
            confirmed_at: Utc::now(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn confirmed_at(&self) -> DateTime<Utc> {
        self.confirmed_at
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Everything the coordinator currently believes, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSnapshot {
    pub mode: Option<Cached<ProxyMode>>,
    pub target_url: Option<Cached<String>>,
    pub session_id: Option<Cached<String>>,
    /// A mode switch is in flight.
    pub switching: bool,
}
