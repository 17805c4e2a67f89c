//! Owned entry point wiring the components to one HTTP client.

use crate::config::ClientConfig;
use crate::error::EchoError;
use crate::mode::{HttpControlTransport, ModeCoordinator};
use crate::query::QueryClient;
use crate::translator::ProxyClient;
use reqwest::{redirect, Client};

/// Created once per client session. Components are borrowed from it.
pub struct EchoClient {
    config: ClientConfig,
    proxy: ProxyClient,
    modes: ModeCoordinator<HttpControlTransport>,
    query: QueryClient,
}

impl EchoClient {
    pub fn new(config: ClientConfig) -> Result<Self, EchoError> {
        let proxy_base = config.proxy_base()?;
        let query_base = config.query_base()?;

        // Redirects are reported to the caller as-is, never followed.
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| EchoError::TransportFailure(e.to_string()))?;

        Ok(Self {
            proxy: ProxyClient::new(client.clone(), proxy_base.clone()),
            modes: ModeCoordinator::new(HttpControlTransport::new(client.clone(), proxy_base)),
            query: QueryClient::new(client, query_base),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn proxy(&self) -> &ProxyClient {
        &self.proxy
    }

    pub fn modes(&self) -> &ModeCoordinator<HttpControlTransport> {
        &self.modes
    }

    pub fn query(&self) -> &QueryClient {
        &self.query
    }
}
