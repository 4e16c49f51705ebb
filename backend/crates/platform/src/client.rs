//! Client identification for rate limiting.

use std::net::IpAddr;

use axum::http::HeaderMap;

/// Placeholder when neither the proxy header nor the socket gives an address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First entry of `X-Forwarded-For` when it parses as an IP address,
/// otherwise the direct connection address.
///
/// The header is client-controlled unless a trusted proxy overwrites it,
/// so this identity can be spoofed.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}

/// Client identifier used in rate-limit keys.
pub fn client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    extract_client_ip(headers, direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
