//! Dispatch of translated requests to the proxy.

use super::translate::translate;
use super::types::{HttpMethod, ProxyBoundRequest, ProxyRequest, ProxyResponse};
use crate::base_url::BaseUrl;
use crate::error::EchoError;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Sends user requests through the proxy endpoint.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: BaseUrl,
}

impl ProxyClient {
    pub fn new(client: Client, base_url: BaseUrl) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Translate without sending.
    pub fn translate(&self, request: &ProxyRequest) -> Result<ProxyBoundRequest, EchoError> {
        translate(request, &self.base_url)
    }

    /// Translate and dispatch. Any HTTP status is a successful outcome; only
    /// local validation and transport failures are errors.
    pub async fn send(&self, request: &ProxyRequest) -> Result<ProxyResponse, EchoError> {
        let bound = self.translate(request)?;
        self.dispatch(bound).await
    }

    /// Dispatch an already translated request.
    pub async fn dispatch(&self, bound: ProxyBoundRequest) -> Result<ProxyResponse, EchoError> {
        debug!("Forwarding {} {} through proxy", bound.method, bound.url);

        let mut builder = match bound.method {
            HttpMethod::Get => self.client.get(&bound.url),
            HttpMethod::Post => self.client.post(&bound.url),
            HttpMethod::Put => self.client.put(&bound.url),
            HttpMethod::Delete => self.client.delete(&bound.url),
            HttpMethod::Patch => self.client.patch(&bound.url),
        };
        for (name, value) in &bound.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = bound.body {
            builder = builder.body(body);
        }

        let started = Instant::now();
        let resp = builder.send().await.map_err(transport_failure)?;
        let status = resp.status();
        let headers = flatten_headers(resp.headers());
        let body = resp.text().await.map_err(transport_failure)?;
        let elapsed_millis = elapsed_millis(started.elapsed());

        debug!(
            "Proxy answered {} for {} in {}ms",
            status.as_u16(),
            bound.url,
            elapsed_millis
        );

        Ok(ProxyResponse {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            elapsed_millis,
        })
    }
}

/// Forwarded responses are never "invalid": a body that fails to arrive is a
/// transport problem.
fn transport_failure(e: reqwest::Error) -> EchoError {
    EchoError::TransportFailure(e.to_string())
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    flat
}
