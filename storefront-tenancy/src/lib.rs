//! # Storefront Tenancy
//!
//! Tenant resolution for the jMarkets storefront platform: mapping an
//! inbound request host to exactly one organization, with correct
//! fallback to the platform landing experience when none matches.
//!
//! ## Overview
//!
//! The storefront-tenancy crate handles:
//! - **Host resolution**: Pure host/port → routing outcome matching
//! - **Tenant directory**: Subdomain → organization lookup with a TTL
//!   cache and explicit invalidation
//! - **Availability checks**: Slug/subdomain checks with a server-side
//!   reserved list
//! - **Routing configuration**: Base domain and store ports from the
//!   environment, read once at startup
//!
//! ## Resolution flow
//!
//! ```text
//! Host header + port
//!   └─ resolve_host (pure)
//!        ├─ LocalDevPort        → store application
//!        ├─ LocalDevSubdomain ─┐
//!        ├─ ProductionTenant  ─┴→ TenantDirectory (cache → store, fail closed)
//!        │                          ├─ active org  → RouteDecision::Storefront
//!        │                          └─ none        → RouteDecision::Landing
//!        └─ NoTenant            → RouteDecision::Landing
//! ```
//!
//! Inactive organizations resolve exactly like missing ones, so the
//! existence of a disabled store never leaks. Storage reads are bounded
//! by a conservative timeout and fail closed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront_tenancy::{MemoryTenantStore, RoutingConfig, TenantDirectory};
//!
//! # async fn example() {
//! let config = RoutingConfig::from_env();
//! let store = Arc::new(MemoryTenantStore::new());
//! let directory = TenantDirectory::new(store, config);
//!
//! let decision = directory.decide_route("acme.jmarkets.example.dev", 443).await;
//! # let _ = decision;
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod directory;
pub mod host;
pub mod store;

// Re-export main types for convenience
pub use cache::TenantCache;
pub use config::RoutingConfig;
pub use directory::{
    DirectoryError, DirectoryResult, RouteDecision, TenantDirectory, RESERVED_NAMES,
};
pub use host::{resolve_host, HostRoute};
pub use store::{MemoryTenantStore, TenantStore, TenantStoreError, TenantStoreResult};
