//! Outgoing header composition for proxy-bound requests.
//!
//! Defaults go in first and caller headers are layered on top, replacing any
//! entry whose name matches ignoring ASCII case. The caller's spelling of the
//! name is what ends up on the wire.

use super::types::HttpMethod;
use crate::error::EchoError;
use hyper::header::{HeaderName, HeaderValue};
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Build the final header list for a request.
pub fn compose_headers(
    method: HttpMethod,
    body: Option<&str>,
    caller: &BTreeMap<String, String>,
) -> Result<Vec<(String, String)>, EchoError> {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(caller.len() + 1);

    if method.defaults_to_json() && body.is_some_and(|b| !b.is_empty()) {
        headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
    }

    for (name, value) in caller {
        validate_header(name, value)?;
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => headers.push((name.clone(), value.clone())),
        }
    }

    Ok(headers)
}

fn validate_header(name: &str, value: &str) -> Result<(), EchoError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| EchoError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    HeaderValue::from_str(value).map_err(|e| EchoError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}
