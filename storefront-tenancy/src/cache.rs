//! Tenant resolution cache
//!
//! An explicit cache abstraction with a declared TTL and an explicit
//! `invalidate` call. The subdomain→organization mapping changes rarely,
//! so resolutions are cached per subdomain; the mutations that change a
//! subdomain or an active flag invalidate their keys before returning.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use storefront_org::Organization;

struct CacheEntry {
    organization: Organization,
    inserted_at: Instant,
}

/// TTL cache for subdomain resolutions.
///
/// Keys are lowercase subdomains; only positive resolutions are cached so
/// that newly created stores become reachable without waiting out a
/// negative entry.
pub struct TenantCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl std::fmt::Debug for TenantCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantCache").field("ttl", &self.ttl).finish()
    }
}

impl TenantCache {
    /// Create a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a cached resolution.
    ///
    /// Entries older than the TTL are treated as absent and removed.
    pub async fn get(&self, subdomain: &str) -> Option<Organization> {
        let key = subdomain.to_lowercase();
        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return Some(entry.organization.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Expired; drop the stale entry.
        self.entries.write().await.remove(&key);
        None
    }

    /// Cache a resolution.
    pub async fn insert(&self, subdomain: &str, organization: Organization) {
        let mut entries = self.entries.write().await;
        entries.insert(
            subdomain.to_lowercase(),
            CacheEntry {
                organization,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop a single key.
    ///
    /// Called by the mutations that change a subdomain or deactivate a
    /// store, before any response that could reflect the new mapping.
    pub async fn invalidate(&self, subdomain: &str) {
        self.entries.write().await.remove(&subdomain.to_lowercase());
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of live entries (expired ones included until touched).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
