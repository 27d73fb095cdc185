//! Store settings
//!
//! This module provides the nested settings types carried by every
//! organization: theme, contact, payment, and shipping configuration.
//! These are plain data consumed by the storefront renderer and checkout
//! collaborators; no resolution or authorization logic lives here.

use serde::{Deserialize, Serialize};

/// Store-level settings for an organization.
///
/// Every group has serde defaults so stored documents stay forward
/// compatible when new settings are added.
///
/// # Examples
///
/// ```
/// use storefront_org::settings::StoreSettings;
///
/// let settings = StoreSettings::default();
/// assert_eq!(settings.payment.currency, "USD");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Theme and branding
    #[serde(default)]
    pub theme: ThemeSettings,

    /// Contact details shown on the storefront
    #[serde(default)]
    pub contact: ContactSettings,

    /// Payment configuration
    #[serde(default)]
    pub payment: PaymentSettings,

    /// Shipping configuration
    #[serde(default)]
    pub shipping: ShippingSettings,
}

/// Theme and branding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Primary brand color (hex)
    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    /// Accent color (hex)
    #[serde(default = "default_accent_color")]
    pub accent_color: String,

    /// Logo URL
    #[serde(default)]
    pub logo_url: Option<String>,

    /// Favicon URL
    #[serde(default)]
    pub favicon_url: Option<String>,
}

fn default_primary_color() -> String {
    "#1a1a2e".to_string()
}

fn default_accent_color() -> String {
    "#e94560".to_string()
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            accent_color: default_accent_color(),
            logo_url: None,
            favicon_url: None,
        }
    }
}

/// Contact details shown on the storefront.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSettings {
    /// Support email address
    #[serde(default)]
    pub email: Option<String>,

    /// Support phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Physical address lines
    #[serde(default)]
    pub address_lines: Vec<String>,
}

/// Payment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettings {
    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Enabled payment method identifiers
    #[serde(default)]
    pub enabled_methods: Vec<String>,

    /// Whether checkout collects a billing address
    #[serde(default = "default_true")]
    pub collect_billing_address: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            enabled_methods: Vec::new(),
            collect_billing_address: true,
        }
    }
}

/// Shipping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingSettings {
    /// Flat shipping rate in minor currency units (0 = free shipping)
    #[serde(default)]
    pub flat_rate_minor: u32,

    /// Region codes the store ships to (empty = worldwide)
    #[serde(default)]
    pub regions: Vec<String>,

    /// Whether local pickup is offered
    #[serde(default)]
    pub local_pickup: bool,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            flat_rate_minor: 0,
            regions: Vec::new(),
            local_pickup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_settings_default() {
        let settings = StoreSettings::default();
        assert_eq!(settings.payment.currency, "USD");
        assert!(settings.payment.collect_billing_address);
        assert_eq!(settings.shipping.flat_rate_minor, 0);
        assert!(settings.shipping.regions.is_empty());
    }

    #[test]
    fn test_theme_defaults() {
        let theme = ThemeSettings::default();
        assert_eq!(theme.primary_color, "#1a1a2e");
        assert!(theme.logo_url.is_none());
    }

    #[test]
    fn test_settings_deserialize_with_missing_groups() {
        // Older stored documents may omit whole groups.
        let settings: StoreSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.payment.currency, "USD");

        let settings: StoreSettings =
            serde_json::from_str(r#"{"payment":{"currency":"EUR"}}"#).unwrap();
        assert_eq!(settings.payment.currency, "EUR");
        assert!(settings.payment.collect_billing_address);
    }
}
