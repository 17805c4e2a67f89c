//! Shared handling of non-success replies from the proxy and query API.

use crate::error::EchoError;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Turn a non-success response into `RemoteRejected`, keeping the remote's
/// wording.
pub(crate) async fn rejection(resp: reqwest::Response) -> EchoError {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    let message = rejection_message(status, &body);
    warn!("{} rejected with {}: {}", url, status.as_u16(), message);
    EchoError::RemoteRejected {
        status: status.as_u16(),
        message,
    }
}

/// `error` field, then `message` field, then the raw body, then a generic
/// status line.
pub(crate) fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(text) = parsed
            .error
            .filter(|e| !e.is_empty())
            .or(parsed.message.filter(|m| !m.is_empty()))
        {
            return text;
        }
    }
    if !body.trim().is_empty() {
        return body.to_string();
    }
    format!("Request failed with status {status}")
}
