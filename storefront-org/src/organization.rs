//! Organization domain models
//!
//! This module provides the core Organization entity for multi-tenant
//! storefront management. Organizations are the top-level tenant entities:
//! each one is an isolated store reachable through a unique subdomain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::settings::StoreSettings;

/// An organization represents a tenant in the multi-tenant storefront system.
///
/// Users can belong to multiple organizations with different roles.
/// Each organization owns its store settings, members, and pending
/// invitations, and is reachable through its unique subdomain.
///
/// # Architecture
///
/// ```text
/// Organization
///   ├─ Members (via OrganizationMember)
///   ├─ Invitations (via OrganizationInvitation)
///   ├─ StoreSettings (theme / contact / payment / shipping)
///   └─ Subdomain routing (storefront-tenancy)
/// ```
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use storefront_org::Organization;
///
/// let owner_id = Uuid::now_v7();
/// let org = Organization::new("Acme Outfitters", "acme-outfitters", owner_id);
/// assert_eq!(org.name, "Acme Outfitters");
/// assert!(org.is_active);
/// assert!(org.subdomain.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable store name
    pub name: String,

    /// URL-friendly slug (unique across the platform, immutable once assigned)
    pub slug: String,

    /// Subdomain the store is served from (unique across the platform).
    ///
    /// `None` until the owner claims one. Changing it afterwards is an
    /// explicit admin action that must invalidate the tenant cache.
    pub subdomain: Option<String>,

    /// Optional custom domain pointed at the store
    pub custom_domain: Option<String>,

    /// Optional description shown on the storefront
    pub description: Option<String>,

    /// Owner user ID (the user who created the org)
    pub owner_id: Uuid,

    /// Whether the organization is active.
    ///
    /// Inactive stores are indistinguishable from missing ones to
    /// unauthenticated callers.
    pub is_active: bool,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,

    /// Store-level settings
    pub settings: StoreSettings,

    /// Custom metadata for extensibility
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Organization {
    /// Creates a new organization with default store settings.
    ///
    /// The organization is created with:
    /// - A newly generated UUID v7 ID
    /// - Active status
    /// - No subdomain or custom domain claimed yet
    /// - Current timestamp for created_at and updated_at
    ///
    /// # Arguments
    ///
    /// * `name` - The store name
    /// * `slug` - URL-friendly slug (must be unique)
    /// * `owner_id` - The user ID who owns this organization
    ///
    /// # Examples
    ///
    /// ```
    /// use uuid::Uuid;
    /// use storefront_org::Organization;
    ///
    /// let owner_id = Uuid::now_v7();
    /// let org = Organization::new("Acme Outfitters", "acme-outfitters", owner_id);
    /// ```
    pub fn new(name: impl Into<String>, slug: impl Into<String>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            slug: slug.into(),
            subdomain: None,
            custom_domain: None,
            description: None,
            owner_id,
            is_active: true,
            created_at: now,
            updated_at: now,
            settings: StoreSettings::default(),
            metadata: HashMap::new(),
        }
    }

    /// Claim a subdomain for this organization.
    ///
    /// The subdomain is stored lowercased so lookups stay case-insensitive.
    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into().to_lowercase());
        self
    }

    /// Point a custom domain at this store.
    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domain = Some(domain.into().to_lowercase());
        self
    }

    /// Replace the subdomain.
    ///
    /// This is the explicit admin rename path; callers in the tenancy layer
    /// must invalidate the cache entry for the old subdomain before serving
    /// any response that could reflect the new mapping.
    pub fn set_subdomain(&mut self, subdomain: impl Into<String>) {
        self.subdomain = Some(subdomain.into().to_lowercase());
        self.updated_at = Utc::now();
    }

    /// Soft-disable the store.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Re-enable a soft-disabled store.
    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Check whether this organization is served from the given subdomain.
    ///
    /// The comparison is case-insensitive and exact; no partial or wildcard
    /// matching.
    pub fn matches_subdomain(&self, subdomain: &str) -> bool {
        self.subdomain
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(subdomain))
    }
}

/// Summary of an organization for list displays.
///
/// This is a lightweight representation of an organization that includes
/// user-specific information like role and default status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSummary {
    /// Organization ID
    pub id: Uuid,

    /// Store name
    pub name: String,

    /// Slug
    pub slug: String,

    /// Subdomain, if claimed
    pub subdomain: Option<String>,

    /// ID of the user's role in this organization
    pub role_id: Uuid,

    /// Name of the user's role in this organization
    pub role_name: String,

    /// Whether this is the user's default org
    pub is_default: bool,
}
