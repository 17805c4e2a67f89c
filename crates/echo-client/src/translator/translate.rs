//! Target URL → proxy URL rewriting.

use super::headers::compose_headers;
use super::types::{HttpMethod, ProxyBoundRequest, ProxyRequest};
use crate::base_url::BaseUrl;
use crate::error::EchoError;
use hyper::Uri;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Optional `scheme://`, then a host-like prefix, then the remainder that
/// gets forwarded as-is. Characters that are not valid in a URL are
/// percent-encoded by the HTTP client when the request is built.
static FALLBACK_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_fallback_regex() -> &'static Regex {
    FALLBACK_REGEX.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*://)?(?P<host>[^/?#]*)(?P<rest>[/?][^#]*)?(?:#.*)?$")
            .unwrap()
    })
}

/// Rewrite `request` so it is addressed to `proxy_base` at the same path and
/// query the target would have been reached at.
pub fn translate(
    request: &ProxyRequest,
    proxy_base: &BaseUrl,
) -> Result<ProxyBoundRequest, EchoError> {
    let method: HttpMethod = request.method.parse()?;
    let path_and_query = target_path_and_query(&request.target_url)?;
    let headers = compose_headers(method, request.body.as_deref(), &request.headers)?;

    Ok(ProxyBoundRequest {
        method,
        url: proxy_base.join(&path_and_query),
        headers,
        body: request.body.clone(),
    })
}

/// Path plus `?query` of a target URL: structured parse first, regex
/// fallback second.
pub fn target_path_and_query(target_url: &str) -> Result<String, EchoError> {
    let raw = target_url.trim();
    if raw.is_empty() {
        return Err(EchoError::InvalidTargetUrl("target URL is empty".to_string()));
    }

    if let Some(structured) = structured_path_and_query(raw) {
        return Ok(structured);
    }

    let fallback = fallback_path_and_query(raw);
    debug!("Target {:?} is not an absolute URL, forwarding {:?}", raw, fallback);
    Ok(fallback)
}

fn structured_path_and_query(raw: &str) -> Option<String> {
    let uri: Uri = raw.parse().ok()?;
    uri.scheme()?;
    if uri.authority()?.host().is_empty() {
        return None;
    }

    let path = match uri.path() {
        "" => "/",
        p => p,
    };
    Some(match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    })
}

fn fallback_path_and_query(raw: &str) -> String {
    let rest = get_fallback_regex()
        .captures(raw)
        .and_then(|caps| caps.name("rest"))
        .map_or("", |m| m.as_str());
    if rest.is_empty() {
        "/".to_string()
    } else if rest.starts_with('?') {
        format!("/{rest}")
    } else {
        rest.to_string()
    }
}
