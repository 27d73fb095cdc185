//! # Storefront Organization Management
//!
//! This crate provides the multi-tenant organization domain model for the
//! jMarkets storefront platform: each organization is an isolated store
//! reachable by subdomain, with team members holding role-scoped
//! permissions.
//!
//! ## Overview
//!
//! The storefront-org crate handles:
//! - **Organizations**: Top-level tenant entities with store settings
//! - **Roles**: Built-in tenant roles plus org-scoped custom roles
//! - **Members**: User-organization relationships with a default flag
//! - **Invitations**: Time-boxed, single-use join tokens
//!
//! ## Architecture
//!
//! ```text
//! User
//!   ├─ OrganizationMember ─→ Organization
//!   │        │                   ├─ StoreSettings
//!   │        └─ Role             └─ Subdomain (storefront-tenancy)
//!   └─ OrganizationInvitation (pending → accepted/cancelled/expired)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storefront_org::{BuiltinRole, Organization, OrganizationMember, RoleCatalog};
//! use uuid::Uuid;
//!
//! // Create an organization with a claimed subdomain
//! let owner_id = Uuid::now_v7();
//! let org = Organization::new("Acme Outfitters", "acme-outfitters", owner_id)
//!     .with_subdomain("acme");
//!
//! // The owner gets the built-in owner role
//! let catalog = RoleCatalog::with_builtins();
//! let owner_role = catalog.builtin(BuiltinRole::Owner);
//! let membership = OrganizationMember::new(org.id, owner_id, owner_role.id).as_default();
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `storefront-rbac`: The module/submodule/action permission matrix
//! - `storefront-tenancy`: Host resolution and the tenant directory
//! - `storefront-access`: Membership resolution and the authorization gate

pub mod invitation;
pub mod membership;
pub mod organization;
pub mod roles;
pub mod settings;

// Re-export main types for convenience
pub use invitation::{InvitationStatus, OrganizationInvitation, INVITATION_VALIDITY_DAYS};
pub use membership::OrganizationMember;
pub use organization::{Organization, OrganizationSummary};
pub use roles::{BuiltinRole, Role, RoleCatalog, PLATFORM_ADMIN};
pub use settings::StoreSettings;
