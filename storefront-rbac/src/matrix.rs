//! # Permission matrix
//!
//! The Role→Permission matrix. Module-level grants are presence-based
//! (absence = denied); submodule rules are explicit Allow/Deny entries
//! that, when present for an action, govern the decision without
//! consulting the module row. A submodule row is never synthesized from a
//! module row.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use storefront_org::{BuiltinRole, RoleCatalog};

use crate::actions::Action;
use crate::modules::{Module, Submodule};

/// Errors raised when mutating the permission matrix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// The role is a system role; its permission set is fixed.
    #[error("Permissions of a system role cannot be edited")]
    SystemRoleImmutable,

    /// The (module, submodule) pair is outside the catalog.
    #[error("Submodule '{}' does not belong to module '{}'", submodule.as_str(), module.as_str())]
    SubmoduleMismatch {
        /// The module named in the request.
        module: Module,
        /// The submodule named in the request.
        submodule: Submodule,
    },
}

/// Result type for matrix mutations.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// The effect of a submodule rule.
///
/// `Deny` is how a role granted a module-level action is still denied that
/// action on one submodule: the rule overrides the module row with an
/// absent grant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// The action is granted on the submodule.
    Allow,

    /// The action is denied on the submodule even if granted module-wide.
    Deny,
}

/// The Role→Permission matrix.
///
/// # Evaluation order
///
/// For `has_permission(role, module, Some(submodule), action)`:
/// 1. a submodule rule for the action, when present, governs (positively
///    or negatively);
/// 2. otherwise the module-level grant for the action decides;
/// 3. otherwise the action is denied (default-deny).
///
/// # Examples
///
/// ```
/// use storefront_rbac::{Action, Effect, Module, PermissionMatrix, Submodule};
/// use uuid::Uuid;
///
/// let mut matrix = PermissionMatrix::new();
/// let role = Uuid::now_v7();
///
/// matrix.grant(role, Module::Products, Action::View).unwrap();
/// matrix
///     .set_submodule_rule(role, Module::Products, Submodule::Pricing, Action::View, Effect::Deny)
///     .unwrap();
///
/// assert!(matrix.has_permission(role, Module::Products, None, Action::View));
/// assert!(!matrix.has_permission(role, Module::Products, Some(Submodule::Pricing), Action::View));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    /// Module-level grants; presence = granted.
    module_grants: HashSet<(Uuid, Module, Action)>,

    /// Submodule rules; checked before the module row.
    submodule_rules: HashMap<(Uuid, Module, Submodule, Action), Effect>,

    /// Roles whose permission sets are fixed.
    locked_roles: HashSet<Uuid>,
}

impl PermissionMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matrix seeded with the built-in tenant role permission
    /// sets and lock every system role against mutation.
    ///
    /// Seeded sets:
    /// - **owner**: every action on every module
    /// - **admin**: every action on every module, except billing settings
    ///   deletion and administration
    /// - **manager**: view/create/edit across the catalog, orders and
    ///   content; view-only on members and settings
    /// - **staff**: view across the store, plus fulfillment editing
    ///
    /// The platform administrator role receives no tenant grants; it is
    /// kept out of tenant flows by the membership check in the gate.
    pub fn with_system_roles(catalog: &RoleCatalog) -> Self {
        let mut matrix = Self::new();

        let owner = catalog.builtin(BuiltinRole::Owner).id;
        let admin = catalog.builtin(BuiltinRole::Admin).id;
        let manager = catalog.builtin(BuiltinRole::Manager).id;
        let staff = catalog.builtin(BuiltinRole::Staff).id;

        for module in Module::all() {
            for action in Action::all() {
                matrix.insert_grant(owner, module, action);
                matrix.insert_grant(admin, module, action);
            }
        }
        matrix.insert_rule(admin, Submodule::Billing, Action::Delete, Effect::Deny);
        matrix.insert_rule(admin, Submodule::Billing, Action::Manage, Effect::Deny);

        for module in [
            Module::Products,
            Module::Categories,
            Module::Orders,
            Module::Content,
        ] {
            for action in [Action::View, Action::Create, Action::Edit] {
                matrix.insert_grant(manager, module, action);
            }
            matrix.insert_grant(staff, module, Action::View);
        }
        matrix.insert_grant(manager, Module::Members, Action::View);
        matrix.insert_grant(manager, Module::Settings, Action::View);
        matrix.insert_rule(staff, Submodule::Fulfillment, Action::Edit, Effect::Allow);

        for role in catalog.all().iter().filter(|r| r.is_system) {
            matrix.locked_roles.insert(role.id);
        }

        matrix
    }

    fn insert_grant(&mut self, role_id: Uuid, module: Module, action: Action) {
        self.module_grants.insert((role_id, module, action));
    }

    fn insert_rule(&mut self, role_id: Uuid, submodule: Submodule, action: Action, effect: Effect) {
        self.submodule_rules
            .insert((role_id, submodule.module(), submodule, action), effect);
    }

    /// Whether the role's permission set is fixed.
    pub fn is_locked(&self, role_id: Uuid) -> bool {
        self.locked_roles.contains(&role_id)
    }

    fn check_editable(&self, role_id: Uuid) -> MatrixResult<()> {
        if self.is_locked(role_id) {
            return Err(MatrixError::SystemRoleImmutable);
        }
        Ok(())
    }

    fn check_pair(module: Module, submodule: Submodule) -> MatrixResult<()> {
        if submodule.module() != module {
            return Err(MatrixError::SubmoduleMismatch { module, submodule });
        }
        Ok(())
    }

    /// Grant an action at module level to a custom role.
    pub fn grant(&mut self, role_id: Uuid, module: Module, action: Action) -> MatrixResult<()> {
        self.check_editable(role_id)?;
        self.insert_grant(role_id, module, action);
        Ok(())
    }

    /// Revoke a module-level grant from a custom role.
    pub fn revoke(&mut self, role_id: Uuid, module: Module, action: Action) -> MatrixResult<()> {
        self.check_editable(role_id)?;
        self.module_grants.remove(&(role_id, module, action));
        Ok(())
    }

    /// Install a submodule rule for a custom role.
    ///
    /// The rule becomes the authoritative source for the action on that
    /// submodule until cleared.
    pub fn set_submodule_rule(
        &mut self,
        role_id: Uuid,
        module: Module,
        submodule: Submodule,
        action: Action,
        effect: Effect,
    ) -> MatrixResult<()> {
        self.check_editable(role_id)?;
        Self::check_pair(module, submodule)?;
        self.submodule_rules
            .insert((role_id, module, submodule, action), effect);
        Ok(())
    }

    /// Remove a submodule rule, restoring module-level fallback.
    pub fn clear_submodule_rule(
        &mut self,
        role_id: Uuid,
        module: Module,
        submodule: Submodule,
        action: Action,
    ) -> MatrixResult<()> {
        self.check_editable(role_id)?;
        Self::check_pair(module, submodule)?;
        self.submodule_rules
            .remove(&(role_id, module, submodule, action));
        Ok(())
    }

    /// Decide whether a role holds a permission.
    ///
    /// Pure and deterministic; safe to call per request without a timeout.
    /// A (module, submodule) pair outside the catalog is denied.
    pub fn has_permission(
        &self,
        role_id: Uuid,
        module: Module,
        submodule: Option<Submodule>,
        action: Action,
    ) -> bool {
        if let Some(submodule) = submodule {
            if submodule.module() != module {
                return false;
            }
            if let Some(effect) = self
                .submodule_rules
                .get(&(role_id, module, submodule, action))
            {
                return *effect == Effect::Allow;
            }
        }
        self.module_grants.contains(&(role_id, module, action))
    }

    /// The module-level grants held by a role, for permission editors.
    pub fn module_grants_for(&self, role_id: Uuid) -> Vec<(Module, Action)> {
        self.module_grants
            .iter()
            .filter(|(r, _, _)| *r == role_id)
            .map(|(_, m, a)| (*m, *a))
            .collect()
    }

    /// The submodule rules held by a role, for permission editors.
    pub fn submodule_rules_for(&self, role_id: Uuid) -> Vec<(Submodule, Action, Effect)> {
        self.submodule_rules
            .iter()
            .filter(|((r, _, _, _), _)| *r == role_id)
            .map(|((_, _, s, a), e)| (*s, *a, *e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deny() {
        let matrix = PermissionMatrix::new();
        let role = Uuid::now_v7();

        assert!(!matrix.has_permission(role, Module::Products, None, Action::View));
        assert!(!matrix.has_permission(
            role,
            Module::Products,
            Some(Submodule::Pricing),
            Action::View
        ));
    }

    #[test]
    fn test_module_grant_covers_submodules_without_rules() {
        let mut matrix = PermissionMatrix::new();
        let role = Uuid::now_v7();
        matrix.grant(role, Module::Products, Action::View).unwrap();

        assert!(matrix.has_permission(role, Module::Products, None, Action::View));
        assert!(matrix.has_permission(
            role,
            Module::Products,
            Some(Submodule::Inventory),
            Action::View
        ));
    }

    #[test]
    fn test_submodule_deny_overrides_module_grant() {
        let mut matrix = PermissionMatrix::new();
        let role = Uuid::now_v7();
        matrix.grant(role, Module::Products, Action::View).unwrap();
        matrix
            .set_submodule_rule(
                role,
                Module::Products,
                Submodule::Pricing,
                Action::View,
                Effect::Deny,
            )
            .unwrap();

        // The module row still answers for the module and its other submodules.
        assert!(matrix.has_permission(role, Module::Products, None, Action::View));
        assert!(matrix.has_permission(
            role,
            Module::Products,
            Some(Submodule::Inventory),
            Action::View
        ));
        assert!(!matrix.has_permission(
            role,
            Module::Products,
            Some(Submodule::Pricing),
            Action::View
        ));
    }

    #[test]
    fn test_submodule_allow_without_module_grant() {
        let mut matrix = PermissionMatrix::new();
        let role = Uuid::now_v7();
        matrix
            .set_submodule_rule(
                role,
                Module::Orders,
                Submodule::Fulfillment,
                Action::Edit,
                Effect::Allow,
            )
            .unwrap();

        assert!(!matrix.has_permission(role, Module::Orders, None, Action::Edit));
        assert!(matrix.has_permission(
            role,
            Module::Orders,
            Some(Submodule::Fulfillment),
            Action::Edit
        ));
    }

    #[test]
    fn test_clearing_rule_restores_fallback() {
        let mut matrix = PermissionMatrix::new();
        let role = Uuid::now_v7();
        matrix.grant(role, Module::Products, Action::View).unwrap();
        matrix
            .set_submodule_rule(
                role,
                Module::Products,
                Submodule::Pricing,
                Action::View,
                Effect::Deny,
            )
            .unwrap();
        matrix
            .clear_submodule_rule(role, Module::Products, Submodule::Pricing, Action::View)
            .unwrap();

        assert!(matrix.has_permission(
            role,
            Module::Products,
            Some(Submodule::Pricing),
            Action::View
        ));
    }

    #[test]
    fn test_mismatched_pair_is_rejected() {
        let mut matrix = PermissionMatrix::new();
        let role = Uuid::now_v7();
        matrix.grant(role, Module::Orders, Action::View).unwrap();

        // Pricing belongs to products, not orders.
        assert!(!matrix.has_permission(
            role,
            Module::Orders,
            Some(Submodule::Pricing),
            Action::View
        ));
        assert_eq!(
            matrix.set_submodule_rule(
                role,
                Module::Orders,
                Submodule::Pricing,
                Action::View,
                Effect::Allow
            ),
            Err(MatrixError::SubmoduleMismatch {
                module: Module::Orders,
                submodule: Submodule::Pricing,
            })
        );
    }

    #[test]
    fn test_system_roles_are_locked() {
        let catalog = RoleCatalog::with_builtins();
        let mut matrix = PermissionMatrix::with_system_roles(&catalog);
        let staff = catalog.builtin(BuiltinRole::Staff).id;

        assert!(matrix.is_locked(staff));
        assert_eq!(
            matrix.grant(staff, Module::Settings, Action::Manage),
            Err(MatrixError::SystemRoleImmutable)
        );
        assert_eq!(
            matrix.revoke(staff, Module::Products, Action::View),
            Err(MatrixError::SystemRoleImmutable)
        );
    }

    #[test]
    fn test_seeded_owner_and_admin() {
        let catalog = RoleCatalog::with_builtins();
        let matrix = PermissionMatrix::with_system_roles(&catalog);
        let owner = catalog.builtin(BuiltinRole::Owner).id;
        let admin = catalog.builtin(BuiltinRole::Admin).id;

        for module in Module::all() {
            for action in Action::all() {
                assert!(matrix.has_permission(owner, module, None, action));
            }
        }

        assert!(matrix.has_permission(admin, Module::Settings, None, Action::Delete));
        assert!(!matrix.has_permission(
            admin,
            Module::Settings,
            Some(Submodule::Billing),
            Action::Delete
        ));
        assert!(matrix.has_permission(
            owner,
            Module::Settings,
            Some(Submodule::Billing),
            Action::Delete
        ));
    }

    #[test]
    fn test_seeded_staff() {
        let catalog = RoleCatalog::with_builtins();
        let matrix = PermissionMatrix::with_system_roles(&catalog);
        let staff = catalog.builtin(BuiltinRole::Staff).id;

        assert!(matrix.has_permission(staff, Module::Orders, None, Action::View));
        assert!(!matrix.has_permission(staff, Module::Orders, None, Action::Edit));
        assert!(matrix.has_permission(
            staff,
            Module::Orders,
            Some(Submodule::Fulfillment),
            Action::Edit
        ));
        assert!(!matrix.has_permission(staff, Module::Members, None, Action::View));
    }

    #[test]
    fn test_platform_admin_has_no_tenant_grants() {
        let catalog = RoleCatalog::with_builtins();
        let matrix = PermissionMatrix::with_system_roles(&catalog);
        let platform_admin = catalog
            .all()
            .iter()
            .find(|r| r.name == storefront_org::PLATFORM_ADMIN)
            .unwrap();

        assert!(matrix.is_locked(platform_admin.id));
        for module in Module::all() {
            assert!(!matrix.has_permission(platform_admin.id, module, None, Action::View));
        }
    }
}
