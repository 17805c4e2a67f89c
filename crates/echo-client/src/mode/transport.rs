//! Transport used by the coordinator to reach the proxy's control endpoints.

use super::types::{ModeResponse, ModeUpdate};
use crate::base_url::BaseUrl;
use crate::error::EchoError;
use crate::remote::rejection;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Read and write access to the `/api/mode*` endpoints.
///
/// Implementations make exactly one attempt per call. A non-success status
/// must come back as [`EchoError::RemoteRejected`] with the remote's message.
#[async_trait]
pub trait ControlTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<ModeResponse, EchoError>;

    async fn post(&self, path: &str, update: &ModeUpdate) -> Result<ModeResponse, EchoError>;
}

/// HTTP implementation against a running proxy.
#[derive(Debug, Clone)]
pub struct HttpControlTransport {
    client: Client,
    base_url: BaseUrl,
}

impl HttpControlTransport {
    pub fn new(client: Client, base_url: BaseUrl) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    async fn decode(resp: reqwest::Response) -> Result<ModeResponse, EchoError> {
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| EchoError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ControlTransport for HttpControlTransport {
    async fn get(&self, path: &str) -> Result<ModeResponse, EchoError> {
        let url = self.base_url.join(path);
        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        Self::decode(resp).await
    }

    async fn post(&self, path: &str, update: &ModeUpdate) -> Result<ModeResponse, EchoError> {
        let url = self.base_url.join(path);
        debug!("POST {} {:?}", url, update);
        let resp = self.client.post(&url).json(update).send().await?;
        Self::decode(resp).await
    }
}
