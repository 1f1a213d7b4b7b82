//! Observed request facts used by the unlock policy.
//!
//! Proxy-aware: forwarded headers win over the transport-level values, since
//! the chassis is normally deployed behind a reverse proxy.

use std::net::IpAddr;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use chassis_core::ResponseError;

/// Pull the bearer credential out of the `Authorization` header.
///
/// Distinguishes a missing header from a malformed one so the middleware can
/// respond with the matching error.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ResponseError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(ResponseError::missing_authorization_header)?;

    let header = header
        .to_str()
        .map_err(|_| ResponseError::invalid_authorization_header())?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(ResponseError::invalid_authorization_header)?
        .trim();

    if token.is_empty() {
        return Err(ResponseError::invalid_authorization_header());
    }

    Ok(token)
}

/// The origin (host) the request appears to come from: first non-empty of
/// `x-forwarded-host` then `host`.
pub fn observed_origin(headers: &HeaderMap) -> Option<String> {
    for name in ["x-forwarded-host", "host"] {
        let value = headers.get(name).and_then(|v| v.to_str().ok());
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            // A proxy chain may append hosts; the last entry is the nearest.
            let value = value.rsplit(',').next().unwrap_or(value).trim();
            return Some(value.to_string());
        }
    }

    None
}

/// The network address the request appears to come from: first non-empty of
/// `cf-connecting-ip`, `x-real-ip`, `x-forwarded-for`, else the transport
/// peer address.
pub fn observed_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<String> {
    for name in ["cf-connecting-ip", "x-real-ip", "x-forwarded-for"] {
        let value = headers.get(name).and_then(|v| v.to_str().ok());
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            // Same last-entry rule as origins: the nearest hop wins.
            let value = value.rsplit(',').next().unwrap_or(value).trim();
            return Some(value.to_string());
        }
    }

    peer.map(|ip| ip.to_string())
}
