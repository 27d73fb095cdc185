//! Membership resolution
//!
//! Resolves which organizations a user belongs to, with which role, and
//! which one is the user's default landing context. The default flag is
//! self-healing: a user with memberships but no flagged default gets the
//! earliest-joined remaining membership promoted, persisted as part of
//! the read path.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use uuid::Uuid;

use storefront_org::{Organization, OrganizationMember, OrganizationSummary, Role, RoleCatalog};
use storefront_tenancy::TenantStore;

use crate::error::{AccessError, AccessResult};
use crate::store::{AccessStoreError, MembershipStore};
use crate::{bounded, DEFAULT_STORAGE_TIMEOUT};

/// Resolves user↔organization relationships.
pub struct MembershipResolver {
    memberships: Arc<dyn MembershipStore>,
    tenants: Arc<dyn TenantStore>,
    catalog: Arc<RoleCatalog>,
    storage_timeout: Duration,
}

impl std::fmt::Debug for MembershipResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipResolver")
            .field("storage_timeout", &self.storage_timeout)
            .finish()
    }
}

impl MembershipResolver {
    /// Create a resolver over the membership and tenant stores.
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        tenants: Arc<dyn TenantStore>,
        catalog: Arc<RoleCatalog>,
    ) -> Self {
        Self {
            memberships,
            tenants,
            catalog,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Override the storage read timeout.
    pub fn with_storage_timeout(mut self, storage_timeout: Duration) -> Self {
        self.storage_timeout = storage_timeout;
        self
    }

    /// The role catalog this resolver consults.
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// A user's membership in one organization, if any.
    pub async fn membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> AccessResult<Option<OrganizationMember>> {
        bounded(
            self.storage_timeout,
            self.memberships.find(organization_id, user_id),
        )
        .await?
        .map_err(storage_error)
    }

    /// The organizations a user belongs to, with the user's role in each,
    /// ordered by join time.
    ///
    /// Memberships whose organization or role record no longer resolves
    /// are skipped rather than surfaced.
    #[instrument(skip(self))]
    pub async fn organizations_for_user(
        &self,
        user_id: Uuid,
    ) -> AccessResult<Vec<(Organization, Role)>> {
        let mut memberships = self.user_memberships_sorted(user_id).await?;
        let mut result = Vec::with_capacity(memberships.len());
        for membership in memberships.drain(..) {
            let Some(organization) = self.find_organization(membership.organization_id).await?
            else {
                continue;
            };
            let Some(role) = self.catalog.role(membership.role_id) else {
                continue;
            };
            result.push((organization, role.clone()));
        }
        Ok(result)
    }

    /// Organization summaries for list displays, ordered by join time.
    #[instrument(skip(self))]
    pub async fn summaries(&self, user_id: Uuid) -> AccessResult<Vec<OrganizationSummary>> {
        let memberships = self.user_memberships_sorted(user_id).await?;
        let mut result = Vec::with_capacity(memberships.len());
        for membership in memberships {
            let Some(organization) = self.find_organization(membership.organization_id).await?
            else {
                continue;
            };
            let Some(role) = self.catalog.role(membership.role_id) else {
                continue;
            };
            result.push(OrganizationSummary {
                id: organization.id,
                name: organization.name,
                slug: organization.slug,
                subdomain: organization.subdomain,
                role_id: role.id,
                role_name: role.name.clone(),
                is_default: membership.is_default,
            });
        }
        Ok(result)
    }

    /// The user's default organization.
    ///
    /// When memberships exist but none carries the default flag (the
    /// previous default organization may have been deleted), the
    /// earliest-joined membership whose organization still resolves is
    /// promoted and persisted before being returned.
    #[instrument(skip(self))]
    pub async fn default_organization(&self, user_id: Uuid) -> AccessResult<Option<Organization>> {
        let memberships = self.user_memberships_sorted(user_id).await?;
        if memberships.is_empty() {
            return Ok(None);
        }

        if let Some(flagged) = memberships.iter().find(|m| m.is_default) {
            if let Some(organization) = self.find_organization(flagged.organization_id).await? {
                return Ok(Some(organization));
            }
        }

        for membership in &memberships {
            if let Some(organization) = self.find_organization(membership.organization_id).await? {
                debug!(
                    user = %user_id,
                    organization = %organization.id,
                    "Promoting earliest-joined membership to default"
                );
                self.set_default(user_id, organization.id).await?;
                return Ok(Some(organization));
            }
        }
        Ok(None)
    }

    /// Make `organization_id` the user's default.
    ///
    /// The store performs the clear-then-set as one transaction, so
    /// concurrent calls serialize and exactly one default survives.
    #[instrument(skip(self))]
    pub async fn set_default(&self, user_id: Uuid, organization_id: Uuid) -> AccessResult<()> {
        bounded(
            self.storage_timeout,
            self.memberships.set_default(user_id, organization_id),
        )
        .await?
        .map_err(|err| match err {
            AccessStoreError::NotFound => AccessError::NotAMember,
            other => storage_error(other),
        })
    }

    async fn user_memberships_sorted(
        &self,
        user_id: Uuid,
    ) -> AccessResult<Vec<OrganizationMember>> {
        let mut memberships = bounded(
            self.storage_timeout,
            self.memberships.memberships_for_user(user_id),
        )
        .await?
        .map_err(storage_error)?;
        memberships.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.id.cmp(&b.id)));
        Ok(memberships)
    }

    async fn find_organization(&self, id: Uuid) -> AccessResult<Option<Organization>> {
        bounded(self.storage_timeout, self.tenants.find_by_id(id))
            .await?
            .map_err(|err| AccessError::Storage(err.to_string()))
    }
}

fn storage_error(err: AccessStoreError) -> AccessError {
    match err {
        AccessStoreError::NotFound => AccessError::NotFound,
        other => AccessError::Storage(other.to_string()),
    }
}
