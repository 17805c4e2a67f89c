//! Mode coordination for the Echo proxy.
//!
//! The proxy runs in one of two modes:
//! - **RECORD**: requests are forwarded to the target URL and the exchange is stored
//! - **REPLAY**: requests are answered from stored exchanges of the active session
//!
//! # Module Structure
//!
//! - `types` - Mode enum, wire bodies and cached values
//! - `transport` - Control endpoint access (trait + HTTP implementation)
//! - `coordinator` - Cached mirror of the proxy state with single-flight switching

mod coordinator;
mod transport;
mod types;

pub use coordinator::{ModeCoordinator, MODE_PATH, SESSION_PATH, TARGET_PATH};
pub use transport::{ControlTransport, HttpControlTransport};
pub use types::{Cached, ModeResponse, ModeSnapshot, ModeUpdate, ProxyMode, UnknownMode};
