//! Read and prune recorded traffic through the Echo query API.

use crate::base_url::BaseUrl;
use crate::error::EchoError;
use crate::remote::rejection;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Number of records stored under one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default)]
    pub record_count: u64,
}

/// One recorded request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRecord {
    pub id: i64,
    pub session_id: String,
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<String>,
    #[serde(default)]
    pub request_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub response_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TrafficRecord {
    /// Path plus query string as the proxy saw it.
    pub fn full_path(&self) -> String {
        match self.query_params.as_deref() {
            Some(query) if !query.is_empty() => format!("{}?{}", self.path, query),
            _ => self.path.clone(),
        }
    }
}

/// Client for the `/api/v1` query service.
#[derive(Debug, Clone)]
pub struct QueryClient {
    client: Client,
    base_url: BaseUrl,
}

impl QueryClient {
    pub fn new(client: Client, base_url: BaseUrl) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, EchoError> {
        self.get_json("/sessions").await
    }

    /// Summary for one session, `None` if nothing was recorded under it.
    pub async fn session_summary(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionSummary>, EchoError> {
        let session_id = checked_session(session_id)?;
        Ok(self
            .list_sessions()
            .await?
            .into_iter()
            .find(|s| s.session_id == session_id))
    }

    pub async fn traffic_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<TrafficRecord>, EchoError> {
        let session_id = checked_session(session_id)?;
        let path = format!("/sessions/{}/traffic", urlencoding::encode(session_id));
        self.get_json(&path).await
    }

    pub async fn delete_traffic_record(&self, id: i64) -> Result<(), EchoError> {
        self.delete(&format!("/traffic/{id}")).await?;
        info!("Deleted traffic record {}", id);
        Ok(())
    }

    pub async fn delete_session_traffic(&self, session_id: &str) -> Result<(), EchoError> {
        let session_id = checked_session(session_id)?;
        let path = format!("/sessions/{}/traffic", urlencoding::encode(session_id));
        self.delete(&path).await?;
        info!("Cleared traffic for session {}", session_id);
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, EchoError> {
        let url = self.base_url.join(path);
        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| EchoError::InvalidResponse(e.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), EchoError> {
        let url = self.base_url.join(path);
        debug!("DELETE {}", url);
        let resp = self.client.delete(&url).send().await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }
}

fn checked_session(session_id: &str) -> Result<&str, EchoError> {
    if session_id.trim().is_empty() {
        return Err(EchoError::InvalidSessionId(session_id.to_string()));
    }
    Ok(session_id)
}
