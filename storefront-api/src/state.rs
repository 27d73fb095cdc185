//! Shared application state
//!
//! All services are behind `Arc`, so the state clones cheaply into every
//! handler.

use std::sync::Arc;

use storefront_access::{
    AuthorizationGate, InvitationLifecycle, MembershipResolver, MembershipStore,
};
use storefront_tenancy::TenantDirectory;

/// Shared state for the storefront API.
#[derive(Clone)]
pub struct AppState {
    /// Subdomain→organization resolution and availability checks.
    pub directory: Arc<TenantDirectory>,

    /// User↔organization membership resolution.
    pub resolver: Arc<MembershipResolver>,

    /// The mandatory gate in front of organization-scoped mutations.
    pub gate: Arc<AuthorizationGate>,

    /// Invitation issuance and acceptance.
    pub invitations: Arc<InvitationLifecycle>,

    /// Membership storage, for team listings and removals.
    pub memberships: Arc<dyn MembershipStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}

impl AppState {
    /// Assemble the state from its services.
    pub fn new(
        directory: Arc<TenantDirectory>,
        resolver: Arc<MembershipResolver>,
        gate: Arc<AuthorizationGate>,
        invitations: Arc<InvitationLifecycle>,
        memberships: Arc<dyn MembershipStore>,
    ) -> Self {
        Self {
            directory,
            resolver,
            gate,
            invitations,
            memberships,
        }
    }
}
