//! Client identification utilities
//!
//! Resolves the address a request is attributed to, used as the rate
//! limiting key.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolve the client IP address.
///
/// `X-Forwarded-For` is only consulted when `trust_forwarded` is set, i.e.
/// when the service sits behind a proxy that overwrites the header. The
/// left-most parseable entry wins; otherwise the peer address is used.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_forwarded: bool,
) -> Option<IpAddr> {
    if trust_forwarded {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if forwarded.is_some() {
            return forwarded;
        }
    }
    direct_ip
}

/// Peer address as set by `into_make_service_with_connect_info`.
pub fn peer_ip(connect_info: Option<&SocketAddr>) -> Option<IpAddr> {
    connect_info.map(SocketAddr::ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR,
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        headers
    }

    #[test]
    fn test_forwarded_header_trusted() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        let ip = extract_client_ip(&forwarded_headers(), Some(direct), true);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_header_ignored_when_untrusted() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        let ip = extract_client_ip(&forwarded_headers(), Some(direct), false);
        assert_eq!(ip, Some(direct));
    }

    #[test]
    fn test_garbage_forwarded_header_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("unknown"));
        let direct: IpAddr = "10.1.2.3".parse().unwrap();
        assert_eq!(extract_client_ip(&headers, Some(direct), true), Some(direct));
    }

    #[test]
    fn test_no_address_at_all() {
        assert_eq!(extract_client_ip(&HeaderMap::new(), None, true), None);
    }

    #[test]
    fn test_peer_ip() {
        let addr: SocketAddr = "203.0.113.7:5555".parse().unwrap();
        assert_eq!(peer_ip(Some(&addr)), Some(addr.ip()));
        assert_eq!(peer_ip(None), None);
    }
}
