//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Two limiters keyed by client IP:
//! - `auth_rate_limiter`: strict, for register and login (~10/min)
//! - `api_rate_limiter`: relaxed, for catalog, cart and checkout (~100/min)

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Client IP as reported by the reverse proxy in front of the server.
///
/// `X-Real-IP` is set by the proxy and checked first. Otherwise the last
/// `X-Forwarded-For` hop, the one the proxy appended, is used; earlier hops
/// are client-supplied.
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("x-real-ip")
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            header("x-forwarded-for")
                .and_then(|s| s.rsplit(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
}

/// Key extractor using proxy headers, then the peer address.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if let Some(ip) = client_ip(req.headers()) {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// # Panics
///
/// Never: `per_second(6)` and `burst_size(5)` are valid positive values.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Rate limiter for the general API: ~100 requests per minute per IP.
///
/// # Panics
///
/// Never: `per_second(1)` and `burst_size(50)` are valid positive values.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(1)
        .burst_size(50)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(50) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    #[test]
    fn test_client_ip_prefers_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.1, 203.0.113.7"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.9"));

        assert_eq!(client_ip(&headers), "203.0.113.9".parse().ok());
    }

    #[test]
    fn test_client_ip_ignores_forged_forwarded_hops() {
        let mut headers = HeaderMap::new();
        // The client sent its own header; the proxy appended the real peer
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8, 203.0.113.7"),
        );

        assert_eq!(client_ip(&headers), "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_client_ip_falls_back_to_forwarded_when_real_ip_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("garbage"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("2001:db8::1"));

        assert_eq!(client_ip(&headers), "2001:db8::1".parse().ok());
    }

    #[test]
    fn test_client_ip_absent() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extractor_uses_peer_address_without_proxy_headers() {
        let peer: SocketAddr = "192.0.2.10:50000".parse().unwrap();
        let mut request = Request::new(());
        request.extensions_mut().insert(ConnectInfo(peer));

        let key = ClientIpKeyExtractor.extract(&request);
        assert_eq!(key.ok(), Some(peer.ip()));
    }
}
