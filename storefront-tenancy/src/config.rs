//! Routing configuration.
//!
//! Process-wide routing values: the production base domain, the local-dev
//! store ports, and the conservative limits applied to storage reads and
//! cache entries. Configuration is loaded from environment variables once
//! at startup with sensible defaults for local development; changing it
//! requires a restart.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Routing configuration for tenant resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Production base domain (e.g. "jmarkets.example.dev").
    ///
    /// A request host with more labels than this and an exactly matching
    /// suffix resolves to a tenant subdomain.
    pub base_domain: String,

    /// Local-development ports that route to the store application
    /// regardless of subdomain.
    pub store_ports: Vec<u16>,

    /// Timeout for tenant directory reads against durable storage, in
    /// seconds. Reads that exceed it fail closed.
    pub storage_timeout_secs: u64,

    /// Time-to-live for cached subdomain resolutions, in seconds.
    pub tenant_cache_ttl_secs: u64,
}

impl Default for RoutingConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            base_domain: "jmarkets.example.dev".to_string(),
            store_ports: vec![3001],
            storage_timeout_secs: 3,
            tenant_cache_ttl_secs: 600,
        }
    }
}

impl RoutingConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STOREFRONT_BASE_DOMAIN`: Production base domain
    ///   (default: jmarkets.example.dev)
    /// - `STOREFRONT_STORE_PORTS`: Comma-separated local-dev store ports
    ///   (default: 3001)
    /// - `STOREFRONT_STORAGE_TIMEOUT_SECS`: Directory read timeout
    ///   (default: 3)
    /// - `STOREFRONT_TENANT_CACHE_TTL_SECS`: Subdomain cache TTL
    ///   (default: 600)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_domain: std::env::var("STOREFRONT_BASE_DOMAIN")
                .map(|s| s.to_lowercase())
                .unwrap_or(default.base_domain),
            store_ports: std::env::var("STOREFRONT_STORE_PORTS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .filter_map(|p| p.trim().parse().ok())
                        .collect::<Vec<u16>>()
                })
                .filter(|ports| !ports.is_empty())
                .unwrap_or(default.store_ports),
            storage_timeout_secs: std::env::var("STOREFRONT_STORAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.storage_timeout_secs),
            tenant_cache_ttl_secs: std::env::var("STOREFRONT_TENANT_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.tenant_cache_ttl_secs),
        }
    }

    /// Get the storage read timeout as a Duration.
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }

    /// Get the tenant cache TTL as a Duration.
    pub fn tenant_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.tenant_cache_ttl_secs)
    }

    /// Whether a connection port is one of the local-dev store ports.
    pub fn is_store_port(&self, port: u16) -> bool {
        self.store_ports.contains(&port)
    }
}
