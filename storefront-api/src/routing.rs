//! Host-based store routing
//!
//! Resolves the request's `Host` header to a routing decision. An
//! unmatched host is not an error: it falls back to the platform landing
//! experience.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use storefront_tenancy::RouteDecision;

use crate::state::AppState;

/// `GET /routing/decision`
///
/// Maps the inbound `Host` header (and its port, when present) to the
/// storefront, the local store application, or the landing fallback.
pub async fn route_decision(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<RouteDecision> {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let port = port_from_host(host).unwrap_or(443);
    Json(state.directory.decide_route(host, port).await)
}

/// Extract an explicit port from a host header, if any.
fn port_from_host(host: &str) -> Option<u16> {
    let after_ipv6 = host.rsplit(']').next().unwrap_or(host);
    let (_, port) = after_ipv6.rsplit_once(':')?;
    port.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_from_host() {
        assert_eq!(port_from_host("acme.example.dev:8443"), Some(8443));
        assert_eq!(port_from_host("acme.example.dev"), None);
        assert_eq!(port_from_host("[::1]:3000"), Some(3000));
        assert_eq!(port_from_host("[::1]"), None);
    }
}
