//! # Modules and submodules
//!
//! The enumerated catalog of protectable resources. Modules are the
//! coarse-grained areas of a store; submodules subdivide a module where
//! finer-grained control is needed. The catalog is fixed at compile time,
//! so an unknown module or an impossible (module, submodule) pairing is
//! unrepresentable instead of a runtime string mismatch.

use serde::{Deserialize, Serialize};

/// The protectable areas of a store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Product catalog
    Products,

    /// Category tree
    Categories,

    /// Customer orders
    Orders,

    /// Storefront content (pages, banners)
    Content,

    /// Team membership and invitations
    Members,

    /// Store settings
    Settings,
}

impl Module {
    /// Get the string representation of the module.
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Products => "products",
            Module::Categories => "categories",
            Module::Orders => "orders",
            Module::Content => "content",
            Module::Members => "members",
            Module::Settings => "settings",
        }
    }

    /// Parse a module from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Module)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "products" => Some(Module::Products),
            "categories" => Some(Module::Categories),
            "orders" => Some(Module::Orders),
            "content" => Some(Module::Content),
            "members" => Some(Module::Members),
            "settings" => Some(Module::Settings),
            _ => None,
        }
    }

    /// Get all modules.
    pub fn all() -> Vec<Self> {
        vec![
            Module::Products,
            Module::Categories,
            Module::Orders,
            Module::Content,
            Module::Members,
            Module::Settings,
        ]
    }

    /// The submodules belonging to this module.
    ///
    /// Empty for modules that are only protected at module level.
    pub fn submodules(&self) -> &'static [Submodule] {
        match self {
            Module::Products => &[Submodule::Pricing, Submodule::Inventory],
            Module::Orders => &[Submodule::Fulfillment],
            Module::Content => &[Submodule::Pages],
            Module::Settings => &[Submodule::Billing],
            Module::Categories | Module::Members => &[],
        }
    }
}

/// Finer-grained subdivisions of a module.
///
/// Every submodule belongs to exactly one module; a permission lookup with
/// a (module, submodule) pair outside the catalog is denied outright.
///
/// # Examples
///
/// ```
/// use storefront_rbac::{Module, Submodule};
///
/// assert_eq!(Submodule::Pricing.module(), Module::Products);
/// assert!(Module::Products.submodules().contains(&Submodule::Pricing));
/// assert!(!Module::Orders.submodules().contains(&Submodule::Pricing));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Submodule {
    /// Product pricing (products)
    Pricing,

    /// Stock levels (products)
    Inventory,

    /// Order fulfillment (orders)
    Fulfillment,

    /// Content pages (content)
    Pages,

    /// Billing settings (settings)
    Billing,
}

impl Submodule {
    /// Get the string representation of the submodule.
    pub fn as_str(&self) -> &'static str {
        match self {
            Submodule::Pricing => "pricing",
            Submodule::Inventory => "inventory",
            Submodule::Fulfillment => "fulfillment",
            Submodule::Pages => "pages",
            Submodule::Billing => "billing",
        }
    }

    /// Parse a submodule from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pricing" => Some(Submodule::Pricing),
            "inventory" => Some(Submodule::Inventory),
            "fulfillment" => Some(Submodule::Fulfillment),
            "pages" => Some(Submodule::Pages),
            "billing" => Some(Submodule::Billing),
            _ => None,
        }
    }

    /// The module this submodule belongs to.
    pub fn module(&self) -> Module {
        match self {
            Submodule::Pricing | Submodule::Inventory => Module::Products,
            Submodule::Fulfillment => Module::Orders,
            Submodule::Pages => Module::Content,
            Submodule::Billing => Module::Settings,
        }
    }
}
