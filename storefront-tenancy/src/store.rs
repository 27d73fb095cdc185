//! Tenant storage interface
//!
//! The async seam between the tenant directory and durable storage, plus
//! an in-memory reference implementation suitable for single-process
//! deployments and testing.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use storefront_org::Organization;

/// Tenant storage error types.
#[derive(Debug, Error)]
pub enum TenantStoreError {
    /// No organization matched the query.
    #[error("Organization not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for tenant storage operations.
pub type TenantStoreResult<T> = Result<T, TenantStoreError>;

/// Storage operations needed by the tenant directory.
///
/// Mutations that change routing-relevant fields return the subdomain
/// keys they displaced so the caller can invalidate the cache before
/// responding.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Find an active organization by its subdomain (lowercase, exact).
    async fn find_active_by_subdomain(
        &self,
        subdomain: &str,
    ) -> TenantStoreResult<Option<Organization>>;

    /// Find an organization by ID, active or not.
    async fn find_by_id(&self, id: Uuid) -> TenantStoreResult<Option<Organization>>;

    /// Whether any organization holds the slug.
    async fn slug_exists(&self, slug: &str) -> TenantStoreResult<bool>;

    /// Whether any organization holds the subdomain.
    async fn subdomain_exists(&self, subdomain: &str) -> TenantStoreResult<bool>;

    /// Create an organization, enforcing slug and subdomain uniqueness.
    async fn insert(&self, organization: Organization) -> TenantStoreResult<()>;

    /// Replace an organization's subdomain.
    ///
    /// # Returns
    ///
    /// The previous subdomain, if one was assigned.
    async fn update_subdomain(
        &self,
        id: Uuid,
        subdomain: &str,
    ) -> TenantStoreResult<Option<String>>;

    /// Set the active flag.
    ///
    /// # Returns
    ///
    /// The organization's subdomain, if one is assigned.
    async fn set_active(&self, id: Uuid, active: bool) -> TenantStoreResult<Option<String>>;
}

/// In-memory tenant store.
///
/// Backs the directory in tests and single-process deployments; every
/// mutation runs under one write lock, so uniqueness checks and updates
/// are atomic.
#[derive(Default)]
pub struct MemoryTenantStore {
    organizations: RwLock<HashMap<Uuid, Organization>>,
}

impl std::fmt::Debug for MemoryTenantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTenantStore").finish()
    }
}

impl MemoryTenantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantStore for MemoryTenantStore {
    async fn find_active_by_subdomain(
        &self,
        subdomain: &str,
    ) -> TenantStoreResult<Option<Organization>> {
        let organizations = self.organizations.read().await;
        Ok(organizations
            .values()
            .find(|org| org.is_active && org.matches_subdomain(subdomain))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> TenantStoreResult<Option<Organization>> {
        Ok(self.organizations.read().await.get(&id).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> TenantStoreResult<bool> {
        let organizations = self.organizations.read().await;
        Ok(organizations
            .values()
            .any(|org| org.slug.eq_ignore_ascii_case(slug)))
    }

    async fn subdomain_exists(&self, subdomain: &str) -> TenantStoreResult<bool> {
        let organizations = self.organizations.read().await;
        Ok(organizations
            .values()
            .any(|org| org.matches_subdomain(subdomain)))
    }

    async fn insert(&self, organization: Organization) -> TenantStoreResult<()> {
        let mut organizations = self.organizations.write().await;
        if organizations
            .values()
            .any(|org| org.slug.eq_ignore_ascii_case(&organization.slug))
        {
            return Err(TenantStoreError::Conflict(format!(
                "slug '{}' is taken",
                organization.slug
            )));
        }
        if let Some(subdomain) = organization.subdomain.as_deref() {
            if organizations
                .values()
                .any(|org| org.matches_subdomain(subdomain))
            {
                return Err(TenantStoreError::Conflict(format!(
                    "subdomain '{subdomain}' is taken"
                )));
            }
        }
        organizations.insert(organization.id, organization);
        Ok(())
    }

    async fn update_subdomain(
        &self,
        id: Uuid,
        subdomain: &str,
    ) -> TenantStoreResult<Option<String>> {
        let mut organizations = self.organizations.write().await;
        if organizations
            .values()
            .any(|org| org.id != id && org.matches_subdomain(subdomain))
        {
            return Err(TenantStoreError::Conflict(format!(
                "subdomain '{subdomain}' is taken"
            )));
        }
        let org = organizations
            .get_mut(&id)
            .ok_or(TenantStoreError::NotFound)?;
        let previous = org.subdomain.clone();
        org.set_subdomain(subdomain);
        Ok(previous)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> TenantStoreResult<Option<String>> {
        let mut organizations = self.organizations.write().await;
        let org = organizations
            .get_mut(&id)
            .ok_or(TenantStoreError::NotFound)?;
        if active {
            org.activate();
        } else {
            org.deactivate();
        }
        Ok(org.subdomain.clone())
    }
}
