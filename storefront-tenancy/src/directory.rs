//! Tenant directory
//!
//! Maps subdomains to organizations with a TTL cache in front of durable
//! storage, answers slug/subdomain availability, and owns the routing
//! fallback policy: when no tenant matches, requests route to the
//! platform landing experience, never to a default tenant.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use storefront_org::Organization;

use crate::cache::TenantCache;
use crate::config::RoutingConfig;
use crate::host::{resolve_host, HostRoute};
use crate::store::{TenantStore, TenantStoreError};

/// Subdomains and slugs reserved for the platform itself.
///
/// The list is server-side policy; availability endpoints return a bare
/// boolean and never expose it.
pub const RESERVED_NAMES: &[&str] = &[
    "www", "api", "admin", "app", "mail", "shop", "store", "static", "cdn", "support",
];

/// Errors surfaced by directory mutations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The requested slug or subdomain is reserved or already held.
    #[error("Slug or subdomain is not available")]
    Taken,

    /// The organization does not exist.
    #[error("Organization not found")]
    NotFound,

    /// The storage read or write exceeded the configured timeout.
    #[error("Storage timed out")]
    StorageTimeout,

    /// The backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for directory mutations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl From<TenantStoreError> for DirectoryError {
    fn from(err: TenantStoreError) -> Self {
        match err {
            TenantStoreError::NotFound => DirectoryError::NotFound,
            TenantStoreError::Conflict(_) => DirectoryError::Taken,
            TenantStoreError::Backend(message) => DirectoryError::Backend(message),
        }
    }
}

/// Where an inbound request should land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RouteDecision {
    /// Serve the organization's storefront.
    Storefront {
        /// The resolved tenant.
        organization: Box<Organization>,
    },

    /// Local development on a store port; the store application picks its
    /// tenant from its own configuration.
    LocalStorefront {
        /// The connection port that matched.
        port: u16,
    },

    /// No tenant matched; serve the platform landing experience.
    Landing,
}

/// Subdomain→organization resolution with caching and fail-closed reads.
pub struct TenantDirectory {
    store: Arc<dyn TenantStore>,
    cache: TenantCache,
    config: RoutingConfig,
    storage_timeout: Duration,
}

impl std::fmt::Debug for TenantDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantDirectory")
            .field("config", &self.config)
            .finish()
    }
}

impl TenantDirectory {
    /// Create a directory over a tenant store.
    pub fn new(store: Arc<dyn TenantStore>, config: RoutingConfig) -> Self {
        Self {
            cache: TenantCache::new(config.tenant_cache_ttl()),
            storage_timeout: config.storage_timeout(),
            store,
            config,
        }
    }

    /// The routing configuration this directory was built with.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Resolve an active organization by subdomain.
    ///
    /// Case-insensitive exact match. Inactive and missing organizations
    /// are both `None` so disabled stores are not distinguishable from
    /// absent ones. Storage reads are bounded by the configured timeout
    /// and fail closed.
    #[instrument(skip(self))]
    pub async fn resolve_by_subdomain(&self, subdomain: &str) -> Option<Organization> {
        let key = subdomain.to_lowercase();

        if let Some(org) = self.cache.get(&key).await {
            debug!(subdomain = %key, "Tenant cache hit");
            return Some(org);
        }

        match timeout(self.storage_timeout, self.store.find_active_by_subdomain(&key)).await {
            Ok(Ok(Some(org))) => {
                self.cache.insert(&key, org.clone()).await;
                Some(org)
            }
            Ok(Ok(None)) => None,
            Ok(Err(err)) => {
                warn!(subdomain = %key, error = %err, "Tenant lookup failed; failing closed");
                None
            }
            Err(_) => {
                warn!(subdomain = %key, "Tenant lookup timed out; failing closed");
                None
            }
        }
    }

    /// Resolve an inbound host and port to a routing decision.
    ///
    /// `NoTenant` outcomes and unresolvable subdomains both become
    /// [`RouteDecision::Landing`]; routing failures are recovered here and
    /// never surfaced as errors.
    #[instrument(skip(self))]
    pub async fn decide_route(&self, host_header: &str, connection_port: u16) -> RouteDecision {
        match resolve_host(&self.config, host_header, connection_port) {
            HostRoute::LocalDevPort(port) => RouteDecision::LocalStorefront { port },
            HostRoute::LocalDevSubdomain(sub) | HostRoute::ProductionTenant(sub) => {
                match self.resolve_by_subdomain(&sub).await {
                    Some(organization) => RouteDecision::Storefront {
                        organization: Box::new(organization),
                    },
                    None => RouteDecision::Landing,
                }
            }
            HostRoute::NoTenant => RouteDecision::Landing,
        }
    }

    /// Whether a slug can still be claimed.
    ///
    /// The reserved list is consulted before storage; a timed-out
    /// existence query reports unavailable.
    #[instrument(skip(self))]
    pub async fn is_slug_available(&self, slug: &str) -> bool {
        let slug = slug.to_lowercase();
        if is_reserved(&slug) {
            return false;
        }
        match timeout(self.storage_timeout, self.store.slug_exists(&slug)).await {
            Ok(Ok(exists)) => !exists,
            Ok(Err(err)) => {
                warn!(slug = %slug, error = %err, "Slug check failed; reporting unavailable");
                false
            }
            Err(_) => {
                warn!(slug = %slug, "Slug check timed out; reporting unavailable");
                false
            }
        }
    }

    /// Whether a subdomain can still be claimed.
    #[instrument(skip(self))]
    pub async fn is_subdomain_available(&self, subdomain: &str) -> bool {
        let subdomain = subdomain.to_lowercase();
        if is_reserved(&subdomain) {
            return false;
        }
        match timeout(self.storage_timeout, self.store.subdomain_exists(&subdomain)).await {
            Ok(Ok(exists)) => !exists,
            Ok(Err(err)) => {
                warn!(subdomain = %subdomain, error = %err, "Subdomain check failed; reporting unavailable");
                false
            }
            Err(_) => {
                warn!(subdomain = %subdomain, "Subdomain check timed out; reporting unavailable");
                false
            }
        }
    }

    /// Rename an organization's subdomain.
    ///
    /// Both the old and the new key are invalidated before this returns,
    /// so no response produced afterwards can observe the stale mapping.
    #[instrument(skip(self))]
    pub async fn change_subdomain(&self, id: Uuid, subdomain: &str) -> DirectoryResult<()> {
        let subdomain = subdomain.to_lowercase();
        if is_reserved(&subdomain) {
            return Err(DirectoryError::Taken);
        }

        let previous = timeout(self.storage_timeout, self.store.update_subdomain(id, &subdomain))
            .await
            .map_err(|_| DirectoryError::StorageTimeout)??;

        if let Some(previous) = previous {
            self.cache.invalidate(&previous).await;
        }
        self.cache.invalidate(&subdomain).await;
        debug!(organization = %id, subdomain = %subdomain, "Subdomain changed");
        Ok(())
    }

    /// Activate or soft-disable a store.
    ///
    /// Deactivation invalidates the subdomain key before returning so the
    /// disabled store stops resolving immediately.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: Uuid, active: bool) -> DirectoryResult<()> {
        let subdomain = timeout(self.storage_timeout, self.store.set_active(id, active))
            .await
            .map_err(|_| DirectoryError::StorageTimeout)??;

        if let Some(subdomain) = subdomain {
            self.cache.invalidate(&subdomain).await;
        }
        debug!(organization = %id, active, "Active flag changed");
        Ok(())
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}
