//! Request translation and dispatch through the Echo proxy.
//!
//! A user describes a request against the real target
//! (`https://api.example.com/users/1?active=true`). The translator keeps the
//! path and query, drops scheme and host, and addresses the request to the
//! proxy instead (`http://localhost:8080/users/1?active=true`). The proxy's
//! own target setting decides where the request really goes.
//!
//! Target URLs are handled in two tiers:
//! 1. a structured parse, used whenever the input has a scheme and a host;
//! 2. a regex fallback that strips a leading `[scheme://]host` prefix and
//!    forwards the remainder verbatim (or `/` when nothing is left).
//!
//! # Module Structure
//!
//! - `types` - Request/response shapes and the method enum
//! - `headers` - Default and caller header composition
//! - `translate` - URL rewriting
//! - `client` - Dispatch of translated requests over HTTP

mod client;
mod headers;
mod translate;
mod types;

pub use client::ProxyClient;
pub use headers::{compose_headers, APPLICATION_JSON, CONTENT_TYPE};
pub use translate::{target_path_and_query, translate};
pub use types::{HttpMethod, ProxyBoundRequest, ProxyRequest, ProxyResponse, StatusClass};
