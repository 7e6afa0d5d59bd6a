//! Client IP resolution from the peer address and proxy headers.

use axum::http::HeaderMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolves the IP address a request should be attributed to.
///
/// When `behind_proxy` is set, the first hop of `X-Forwarded-For` wins, then
/// `X-Real-IP`. Unparseable header values are ignored. Otherwise, and as a
/// fallback, the socket peer address is used. Without any peer address the
/// unspecified address `0.0.0.0` is returned so that such requests still
/// share one rate-limit bucket.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = resolve_client_ip(&headers, None, true);
/// assert_eq!(ip.to_string(), "203.0.113.7");
/// ```
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> IpAddr {
    if behind_proxy {
        if let Some(ip) = forwarded_for(headers) {
            return ip;
        }
        if let Some(ip) = header_ip(headers, X_REAL_IP) {
            return ip;
        }
    }

    peer.map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .and_then(|hop| hop.trim().parse().ok())
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("192.0.2.10:51234".parse().unwrap())
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let ip = resolve_client_ip(&HeaderMap::new(), peer(), false);
        assert_eq!(ip.to_string(), "192.0.2.10");
    }

    #[test]
    fn test_headers_ignored_when_not_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"));

        let ip = resolve_client_ip(&headers, peer(), false);
        assert_eq!(ip.to_string(), "192.0.2.10");
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1, 10.0.0.2"),
        );
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.1"));

        let ip = resolve_client_ip(&headers, peer(), true);
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_when_no_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("2001:db8::1"));

        let ip = resolve_client_ip(&headers, peer(), true);
        assert_eq!(ip.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_invalid_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("not-an-ip"));

        let ip = resolve_client_ip(&headers, peer(), true);
        assert_eq!(ip.to_string(), "192.0.2.10");
    }

    #[test]
    fn test_no_peer_is_unspecified() {
        let ip = resolve_client_ip(&HeaderMap::new(), None, true);
        assert!(ip.is_unspecified());
    }
}
