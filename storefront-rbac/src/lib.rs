//! # Storefront RBAC (Role-Based Access Control)
//!
//! This crate provides the permission model for the jMarkets storefront
//! platform: a static catalog of protectable modules, submodules, and
//! actions, and the Role→Permission matrix consulted by the authorization
//! gate.
//!
//! ## Overview
//!
//! The storefront-rbac crate handles:
//! - **Modules / Submodules**: The protectable areas of a store
//! - **Actions**: The verbs performable on each area
//! - **PermissionMatrix**: Module-level grants plus submodule overrides
//!
//! ## Architecture
//!
//! ```text
//! Permission = Role + Module [+ Submodule] + Action
//!
//! Examples:
//!   (manager, products, -, edit)          - edit any product
//!   (staff, orders, fulfillment, edit)    - edit fulfillment only
//!   (admin, settings, billing, delete)    - denied by submodule rule
//! ```
//!
//! ## Evaluation order
//!
//! A submodule rule for an action, when present, governs the decision,
//! positively or negatively, without consulting the module row. Without a
//! rule, the module-level grant decides. Without either, the action is
//! denied: the matrix is default-deny, and a submodule row is never
//! synthesized from a module row.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storefront_org::{BuiltinRole, RoleCatalog};
//! use storefront_rbac::{Action, Module, PermissionMatrix, Submodule};
//!
//! let catalog = RoleCatalog::with_builtins();
//! let matrix = PermissionMatrix::with_system_roles(&catalog);
//!
//! let staff = catalog.builtin(BuiltinRole::Staff).id;
//! assert!(matrix.has_permission(staff, Module::Products, None, Action::View));
//! assert!(!matrix.has_permission(staff, Module::Products, None, Action::Delete));
//! ```
//!
//! ## Integration with storefront-org
//!
//! Role records live in `storefront-org`; this crate keys the matrix by
//! role ID, seeds the fixed sets for the built-in system roles, and
//! refuses mutation of any system role.

pub mod actions;
pub mod matrix;
pub mod modules;

// Re-export main types for convenience
pub use actions::Action;
pub use matrix::{Effect, MatrixError, MatrixResult, PermissionMatrix};
pub use modules::{Module, Submodule};
