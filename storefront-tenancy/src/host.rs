//! Host resolution
//!
//! Pure mapping from an inbound host header (plus the connection port) to
//! a routing outcome. No I/O, no allocation beyond the extracted
//! subdomain; deterministic for identical input.

use serde::{Deserialize, Serialize};

use crate::config::RoutingConfig;

/// Outcome of resolving an inbound host.
///
/// `NoTenant` is not an error: the caller recovers it locally by routing
/// to the platform landing experience.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum HostRoute {
    /// `localhost`/`127.0.0.1` on a configured store port; routes to the
    /// store application regardless of subdomain.
    LocalDevPort(u16),

    /// `<sub>.localhost` during local development.
    LocalDevSubdomain(String),

    /// A production host strictly under the base domain; the value is the
    /// remaining prefix and may itself contain dots (e.g. "a.b").
    ProductionTenant(String),

    /// The base domain itself, an unrelated domain, or a malformed host.
    NoTenant,
}

/// Resolve an inbound host header and connection port to a route.
///
/// The algorithm is pure string matching:
/// 1. strip any port suffix from the header and lowercase the host;
/// 2. bare `localhost`/`127.0.0.1` routes by the connection port;
/// 3. `<sub>.localhost` yields the local-dev subdomain;
/// 4. a host with more labels than the base domain whose trailing labels
///    exactly equal the base domain yields the prefix as the tenant
///    subdomain;
/// 5. everything else, the base domain itself included, yields
///    `NoTenant`.
///
/// # Examples
///
/// ```
/// use storefront_tenancy::{resolve_host, HostRoute, RoutingConfig};
///
/// let config = RoutingConfig::default();
/// assert_eq!(
///     resolve_host(&config, "acme.jmarkets.example.dev", 443),
///     HostRoute::ProductionTenant("acme".to_string()),
/// );
/// assert_eq!(
///     resolve_host(&config, "jmarkets.example.dev", 443),
///     HostRoute::NoTenant,
/// );
/// ```
pub fn resolve_host(config: &RoutingConfig, host_header: &str, connection_port: u16) -> HostRoute {
    let host = strip_port(host_header).to_lowercase();
    if host.is_empty() {
        return HostRoute::NoTenant;
    }

    if host == "localhost" || host == "127.0.0.1" {
        if config.is_store_port(connection_port) {
            return HostRoute::LocalDevPort(connection_port);
        }
        return HostRoute::NoTenant;
    }

    if let Some(sub) = host.strip_suffix(".localhost") {
        if !sub.is_empty() && labels_are_well_formed(sub) {
            return HostRoute::LocalDevSubdomain(sub.to_string());
        }
        return HostRoute::NoTenant;
    }

    let base = config.base_domain.to_lowercase();
    if host == base {
        return HostRoute::NoTenant;
    }

    match host.strip_suffix(&format!(".{base}")) {
        Some(sub) if !sub.is_empty() && labels_are_well_formed(sub) => {
            HostRoute::ProductionTenant(sub.to_string())
        }
        _ => HostRoute::NoTenant,
    }
}

/// Strip a `:port` suffix from a host header, handling bracketed IPv6
/// literals (`[::1]:3000`).
fn strip_port(host_header: &str) -> &str {
    let trimmed = host_header.trim();
    if let Some(rest) = trimmed.strip_prefix('[') {
        return rest.split(']').next().unwrap_or("");
    }
    trimmed.split(':').next().unwrap_or("")
}

/// Every dot-separated label must be non-empty; "a..b" and ".acme" are
/// malformed hosts, not tenants.
fn labels_are_well_formed(prefix: &str) -> bool {
    prefix.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RoutingConfig {
        RoutingConfig {
            base_domain: "jmarkets.example.dev".to_string(),
            store_ports: vec![3001],
            ..RoutingConfig::default()
        }
    }

    #[test]
    fn test_production_subdomain() {
        assert_eq!(
            resolve_host(&config(), "acme.jmarkets.example.dev", 443),
            HostRoute::ProductionTenant("acme".to_string()),
        );
    }

    #[test]
    fn test_production_subdomain_with_port_and_case() {
        assert_eq!(
            resolve_host(&config(), "Acme.JMarkets.Example.Dev:8443", 8443),
            HostRoute::ProductionTenant("acme".to_string()),
        );
    }

    #[test]
    fn test_multi_label_prefix() {
        assert_eq!(
            resolve_host(&config(), "a.b.jmarkets.example.dev", 443),
            HostRoute::ProductionTenant("a.b".to_string()),
        );
    }

    #[test]
    fn test_base_domain_itself_is_no_tenant() {
        assert_eq!(
            resolve_host(&config(), "jmarkets.example.dev", 443),
            HostRoute::NoTenant,
        );
    }

    #[test]
    fn test_unrelated_domain_is_no_tenant() {
        assert_eq!(resolve_host(&config(), "example.com", 443), HostRoute::NoTenant);
        // Suffix must match on label boundaries, not substrings.
        assert_eq!(
            resolve_host(&config(), "evil-jmarkets.example.dev.attacker.io", 443),
            HostRoute::NoTenant,
        );
        assert_eq!(
            resolve_host(&config(), "notjmarkets.example.dev", 443),
            HostRoute::NoTenant,
        );
    }

    #[test]
    fn test_malformed_hosts() {
        assert_eq!(resolve_host(&config(), "", 443), HostRoute::NoTenant);
        assert_eq!(
            resolve_host(&config(), ".jmarkets.example.dev", 443),
            HostRoute::NoTenant,
        );
        assert_eq!(
            resolve_host(&config(), "a..jmarkets.example.dev", 443),
            HostRoute::NoTenant,
        );
    }

    #[test]
    fn test_localhost_store_port() {
        assert_eq!(
            resolve_host(&config(), "localhost:3001", 3001),
            HostRoute::LocalDevPort(3001),
        );
        assert_eq!(
            resolve_host(&config(), "127.0.0.1", 3001),
            HostRoute::LocalDevPort(3001),
        );
        assert_eq!(resolve_host(&config(), "localhost", 9999), HostRoute::NoTenant);
    }

    #[test]
    fn test_localhost_subdomain() {
        assert_eq!(
            resolve_host(&config(), "acme.localhost:3001", 3001),
            HostRoute::LocalDevSubdomain("acme".to_string()),
        );
        assert_eq!(resolve_host(&config(), ".localhost", 3001), HostRoute::NoTenant);
    }

    #[test]
    fn test_ipv6_host_header() {
        assert_eq!(resolve_host(&config(), "[::1]:3001", 3001), HostRoute::NoTenant);
    }

    #[test]
    fn test_deterministic() {
        let cfg = config();
        let first = resolve_host(&cfg, "acme.jmarkets.example.dev", 443);
        let second = resolve_host(&cfg, "acme.jmarkets.example.dev", 443);
        assert_eq!(first, second);
    }
}
