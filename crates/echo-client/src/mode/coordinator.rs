//! Client-side mirror of the proxy's mode, target URL and session id.

use super::transport::{ControlTransport, HttpControlTransport};
use super::types::{Cached, ModeResponse, ModeSnapshot, ModeUpdate, ProxyMode};
use crate::base_url::is_absolute;
use crate::error::EchoError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, warn};

pub const MODE_PATH: &str = "/api/mode";
pub const TARGET_PATH: &str = "/api/mode/target";
pub const SESSION_PATH: &str = "/api/mode/session";

/// One cached value plus the ticket it was stored under.
#[derive(Debug)]
struct Slot<T> {
    value: Option<Cached<T>>,
    ticket: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            ticket: 0,
        }
    }
}

impl<T: Clone> Slot<T> {
    /// Store `value` unless something with a later ticket is already stored.
    fn offer(&mut self, ticket: u64, value: T) -> bool {
        if ticket < self.ticket {
            return false;
        }
        self.ticket = ticket;
        self.value = Some(Cached::now(value));
        true
    }

    fn get(&self) -> Option<Cached<T>> {
        self.value.clone()
    }
}

#[derive(Debug, Default)]
struct ModeCache {
    mode: Slot<ProxyMode>,
    target_url: Slot<String>,
    session_id: Slot<String>,
}

/// Releases the busy flag however the switch ends, including cancellation.
struct TransitionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> TransitionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Tracks the proxy's RECORD/REPLAY state machine.
///
/// The proxy holds the authoritative state. The coordinator keeps a mirror
/// that only changes after a complete, successful round trip, and always to
/// the value the proxy reported. Only one mode switch may be in flight.
pub struct ModeCoordinator<T = HttpControlTransport> {
    transport: T,
    cache: RwLock<ModeCache>,
    tickets: AtomicU64,
    switching: AtomicBool,
}

impl<T: ControlTransport> ModeCoordinator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: RwLock::new(ModeCache::default()),
            tickets: AtomicU64::new(0),
            switching: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reads take their ticket when sent, writes when confirmed. A read
    /// that overlaps a write therefore never replaces the write's value.
    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetch the mode from the proxy. Also refreshes the cached session id
    /// when the reply carries one.
    pub async fn get_mode(&self) -> Result<ProxyMode, EchoError> {
        let ticket = self.next_ticket();
        let reply = self.transport.get(MODE_PATH).await?;
        let mode = reported_mode(&reply)?;

        let mut cache = self.cache.write();
        cache.mode.offer(ticket, mode);
        if let Some(session_id) = reply.session_id.filter(|s| !s.trim().is_empty()) {
            cache.session_id.offer(ticket, session_id);
        }
        Ok(mode)
    }

    /// Ask the proxy to switch modes.
    ///
    /// Returns the mode the proxy reports afterwards, which can differ from
    /// `target`. Fails with [`EchoError::TransitionInProgress`] while another
    /// switch is pending. On failure the cached mode is left alone.
    pub async fn switch_mode(&self, target: ProxyMode) -> Result<ProxyMode, EchoError> {
        let _guard =
            TransitionGuard::acquire(&self.switching).ok_or(EchoError::TransitionInProgress)?;

        debug!("Requesting proxy mode {}", target);
        let reply = self
            .transport
            .post(MODE_PATH, &ModeUpdate::mode(target))
            .await?;
        let confirmed = reported_mode(&reply)?;
        let ticket = self.next_ticket();

        if confirmed != target {
            warn!("Requested {} but proxy reports {}", target, confirmed);
        }
        self.cache.write().mode.offer(ticket, confirmed);
        info!("Proxy mode switched to {}", confirmed);
        Ok(confirmed)
    }

    pub fn is_switching(&self) -> bool {
        self.switching.load(Ordering::Acquire)
    }

    pub async fn get_target_url(&self) -> Result<String, EchoError> {
        let ticket = self.next_ticket();
        let reply = self.transport.get(TARGET_PATH).await?;
        let target_url = required(reply.target_url, "targetUrl")?;
        self.cache.write().target_url.offer(ticket, target_url.clone());
        Ok(target_url)
    }

    /// Set the upstream the proxy records against. Returns the URL as the
    /// proxy stored it.
    pub async fn update_target_url(&self, url: &str) -> Result<String, EchoError> {
        if !is_absolute(url.trim()) {
            return Err(EchoError::InvalidTargetUrl(url.to_string()));
        }
        let reply = self
            .transport
            .post(TARGET_PATH, &ModeUpdate::target_url(url.trim()))
            .await?;
        let target_url = required(reply.target_url, "targetUrl")?;
        let ticket = self.next_ticket();
        self.cache.write().target_url.offer(ticket, target_url.clone());
        info!("Proxy target URL set to {}", target_url);
        Ok(target_url)
    }

    pub async fn get_session_id(&self) -> Result<String, EchoError> {
        let ticket = self.next_ticket();
        let reply = self.transport.get(SESSION_PATH).await?;
        let session_id = required(reply.session_id, "sessionId")?;
        self.cache.write().session_id.offer(ticket, session_id.clone());
        Ok(session_id)
    }

    /// Select the session new traffic is recorded under (and replayed from).
    /// Returns the id as the proxy stored it.
    pub async fn update_session_id(&self, id: &str) -> Result<String, EchoError> {
        if id.trim().is_empty() {
            return Err(EchoError::InvalidSessionId(id.to_string()));
        }
        let reply = self
            .transport
            .post(SESSION_PATH, &ModeUpdate::session_id(id))
            .await?;
        let session_id = required(reply.session_id, "sessionId")?;
        let ticket = self.next_ticket();
        self.cache.write().session_id.offer(ticket, session_id.clone());
        info!("Proxy session set to {}", session_id);
        Ok(session_id)
    }

    /// Re-read mode, target URL and session id concurrently.
    pub async fn refresh(&self) -> Result<ModeSnapshot, EchoError> {
        tokio::try_join!(self.get_mode(), self.get_target_url(), self.get_session_id())?;
        Ok(self.snapshot())
    }

    /// Last confirmed mode, without contacting the proxy.
    pub fn cached_mode(&self) -> Option<Cached<ProxyMode>> {
        self.cache.read().mode.get()
    }

    pub fn cached_target_url(&self) -> Option<Cached<String>> {
        self.cache.read().target_url.get()
    }

    pub fn cached_session_id(&self) -> Option<Cached<String>> {
        self.cache.read().session_id.get()
    }

    pub fn snapshot(&self) -> ModeSnapshot {
        let cache = self.cache.read();
        ModeSnapshot {
            mode: cache.mode.get(),
            target_url: cache.target_url.get(),
            session_id: cache.session_id.get(),
            switching: self.is_switching(),
        }
    }
}

fn reported_mode(reply: &ModeResponse) -> Result<ProxyMode, EchoError> {
    let raw = reply
        .mode
        .as_deref()
        .ok_or_else(|| EchoError::InvalidResponse("reply did not include mode".to_string()))?;
    raw.parse()
        .map_err(|e: super::types::UnknownMode| EchoError::InvalidResponse(e.to_string()))
}

fn required(field: Option<String>, name: &str) -> Result<String, EchoError> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| EchoError::InvalidResponse(format!("reply did not include {name}")))
}
