//! Client core for the Echo record/replay proxy.
//!
//! ```no_run
//! use echo_client::{ClientConfig, EchoClient, ProxyMode, ProxyRequest};
//!
//! # async fn run() -> Result<(), echo_client::EchoError> {
//! let echo = EchoClient::new(ClientConfig::default())?;
//!
//! let response = echo
//!     .proxy()
//!     .send(&ProxyRequest::new("GET", "https://jsonplaceholder.typicode.com/posts/1"))
//!     .await?;
//! println!("{} in {}ms", response.status_code, response.elapsed_millis);
//!
//! echo.modes().switch_mode(ProxyMode::Replay).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mode;
pub mod query;
pub mod translator;

mod base_url;
mod client;
mod remote;

pub use base_url::BaseUrl;
pub use client::EchoClient;
pub use config::ClientConfig;
pub use error::EchoError;
pub use mode::{ModeCoordinator, ProxyMode};
pub use query::{QueryClient, SessionSummary, TrafficRecord};
pub use translator::{HttpMethod, ProxyClient, ProxyRequest, ProxyResponse};
