//! Roles for organization members
//!
//! This module defines the Role entity, the built-in tenant roles every
//! store starts with, and the catalog that answers which roles may be
//! assigned to members of a given organization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine name of the platform-wide administrator role.
///
/// This role operates the platform itself and is never assignable to
/// tenant members; every assignable-roles listing filters it out.
pub const PLATFORM_ADMIN: &str = "platform_admin";

/// The built-in tenant roles every organization starts with.
///
/// Roles are hierarchical: Staff < Manager < Admin < Owner. The hierarchy
/// only orders the built-ins; the authoritative permission decisions come
/// from the permission matrix, not from this ordering.
///
/// # Examples
///
/// ```
/// use storefront_org::BuiltinRole;
///
/// assert_eq!(BuiltinRole::parse("admin"), Some(BuiltinRole::Admin));
/// assert!(BuiltinRole::Owner > BuiltinRole::Staff);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRole {
    /// Day-to-day store operation, narrow edit rights
    Staff = 1,

    /// Runs the catalog and orders
    Manager = 2,

    /// Manages members and most settings
    Admin = 3,

    /// Full organization control
    Owner = 4,
}

impl BuiltinRole {
    /// Parse a built-in role from its machine name.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(BuiltinRole)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "staff" => Some(Self::Staff),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get the machine name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Staff => "Staff",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
            Self::Owner => "Owner",
        }
    }

    /// All built-in tenant roles, lowest first.
    pub fn all() -> [Self; 4] {
        [Self::Staff, Self::Manager, Self::Admin, Self::Owner]
    }
}

/// A role assignable to organization members.
///
/// System roles (`is_system`) are the built-in tenant roles plus the
/// platform administrator; their permission sets are fixed at load time.
/// Organizations can define additional custom roles scoped to themselves
/// via `organization_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Machine name (e.g. "manager")
    pub name: String,

    /// Human-readable name (e.g. "Manager")
    pub display_name: String,

    /// Whether this is a fixed system role
    pub is_system: bool,

    /// Owning organization for custom roles; `None` for platform-wide roles
    pub organization_id: Option<Uuid>,
}

impl Role {
    /// Create a custom role scoped to an organization.
    pub fn custom(
        organization_id: Uuid,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display_name: display_name.into(),
            is_system: false,
            organization_id: Some(organization_id),
        }
    }

    fn system(name: &str, display_name: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            is_system: true,
            organization_id: None,
        }
    }

    /// Whether this role may be assigned to members of `organization_id`.
    ///
    /// The platform administrator role is never assignable. System tenant
    /// roles are assignable everywhere; custom roles only within the
    /// organization that owns them.
    pub fn is_assignable_in(&self, organization_id: Uuid) -> bool {
        if self.name == PLATFORM_ADMIN {
            return false;
        }
        match self.organization_id {
            Some(owner) => owner == organization_id,
            None => self.is_system,
        }
    }
}

/// Catalog of known roles.
///
/// Owns the built-in role records (created once at load time with stable
/// ids for the process lifetime) plus any custom roles registered by
/// organizations.
///
/// # Examples
///
/// ```
/// use storefront_org::{BuiltinRole, RoleCatalog};
/// use uuid::Uuid;
///
/// let catalog = RoleCatalog::with_builtins();
/// let owner = catalog.builtin(BuiltinRole::Owner);
/// assert!(owner.is_system);
///
/// let org_id = Uuid::now_v7();
/// let assignable = catalog.assignable_roles(org_id);
/// assert!(assignable.iter().all(|r| r.name != "platform_admin"));
/// ```
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: Vec<Role>,
}

impl RoleCatalog {
    /// Create a catalog seeded with the built-in tenant roles and the
    /// platform administrator.
    pub fn with_builtins() -> Self {
        let mut roles = Vec::with_capacity(5);
        for builtin in BuiltinRole::all() {
            roles.push(Role::system(builtin.as_str(), builtin.display_name()));
        }
        roles.push(Role::system(PLATFORM_ADMIN, "Platform Admin"));
        Self { roles }
    }

    /// Look up a role by ID.
    pub fn role(&self, id: Uuid) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    /// Look up the record for a built-in tenant role.
    ///
    /// Built-ins are always present, so this never fails.
    pub fn builtin(&self, builtin: BuiltinRole) -> &Role {
        self.roles
            .iter()
            .find(|r| r.is_system && r.name == builtin.as_str())
            .unwrap_or_else(|| unreachable!("built-in roles are seeded at construction"))
    }

    /// Look up a role by machine name within an organization's scope.
    pub fn find_by_name(&self, organization_id: Uuid, name: &str) -> Option<&Role> {
        self.roles
            .iter()
            .find(|r| r.name == name && r.is_assignable_in(organization_id))
    }

    /// Register a custom role for an organization.
    ///
    /// # Returns
    ///
    /// The ID of the new role.
    pub fn register_custom(
        &mut self,
        organization_id: Uuid,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Uuid {
        let role = Role::custom(organization_id, name, display_name);
        let id = role.id;
        self.roles.push(role);
        id
    }

    /// Roles assignable to members of the given organization.
    ///
    /// Returns the system tenant roles plus the organization's own custom
    /// roles. The platform administrator role never appears here.
    pub fn assignable_roles(&self, organization_id: Uuid) -> Vec<&Role> {
        self.roles
            .iter()
            .filter(|r| r.is_assignable_in(organization_id))
            .collect()
    }

    /// All roles in the catalog, platform-wide ones included.
    pub fn all(&self) -> &[Role] {
        &self.roles
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_role_hierarchy() {
        assert!(BuiltinRole::Owner > BuiltinRole::Admin);
        assert!(BuiltinRole::Admin > BuiltinRole::Manager);
        assert!(BuiltinRole::Manager > BuiltinRole::Staff);
    }

    #[test]
    fn test_builtin_role_parse() {
        assert_eq!(BuiltinRole::parse("admin"), Some(BuiltinRole::Admin));
        assert_eq!(BuiltinRole::parse("OWNER"), Some(BuiltinRole::Owner));
        assert_eq!(BuiltinRole::parse("platform_admin"), None);
        assert_eq!(BuiltinRole::parse("invalid"), None);
    }

    #[test]
    fn test_catalog_seeds_builtins() {
        let catalog = RoleCatalog::with_builtins();

        for builtin in BuiltinRole::all() {
            let role = catalog.builtin(builtin);
            assert!(role.is_system);
            assert_eq!(role.name, builtin.as_str());
            assert!(role.organization_id.is_none());
        }
    }

    #[test]
    fn test_platform_admin_never_assignable() {
        let catalog = RoleCatalog::with_builtins();
        let org_id = Uuid::now_v7();

        let assignable = catalog.assignable_roles(org_id);
        assert_eq!(assignable.len(), 4);
        assert!(assignable.iter().all(|r| r.name != PLATFORM_ADMIN));
    }

    #[test]
    fn test_custom_role_scoped_to_org() {
        let mut catalog = RoleCatalog::with_builtins();
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();

        let role_id = catalog.register_custom(org_a, "fulfillment", "Fulfillment");

        let role = catalog.role(role_id).unwrap();
        assert!(!role.is_system);
        assert!(role.is_assignable_in(org_a));
        assert!(!role.is_assignable_in(org_b));

        assert!(catalog
            .assignable_roles(org_a)
            .iter()
            .any(|r| r.id == role_id));
        assert!(!catalog
            .assignable_roles(org_b)
            .iter()
            .any(|r| r.id == role_id));
    }

    #[test]
    fn test_find_by_name_respects_scope() {
        let mut catalog = RoleCatalog::with_builtins();
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();
        catalog.register_custom(org_a, "fulfillment", "Fulfillment");

        assert!(catalog.find_by_name(org_a, "fulfillment").is_some());
        assert!(catalog.find_by_name(org_b, "fulfillment").is_none());
        assert!(catalog.find_by_name(org_b, "manager").is_some());
        assert!(catalog.find_by_name(org_a, PLATFORM_ADMIN).is_none());
    }
}
