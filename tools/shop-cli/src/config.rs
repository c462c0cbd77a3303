//! CLI configuration.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use shop_api::ApiConfig;
use shop_commerce::cart::PricingRules;
use shop_commerce::Currency;

/// Contents of `shop.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the cart and session are kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Totals calculation.
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl ShopConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per record, relative to the working
    /// directory unless absolute.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

fn default_storage_dir() -> String {
    ".shop".to_string()
}

/// Pricing settings, in decimal units of `currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub currency: String,
    pub free_shipping_threshold: f64,
    pub flat_shipping_rate: f64,
    pub tax_rate_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default().code().to_string(),
            free_shipping_threshold: 100.0,
            flat_shipping_rate: 100.0,
            tax_rate_percent: 15.0,
        }
    }
}

impl PricingConfig {
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.currency)
            .ok_or_else(|| anyhow!("Unknown currency in [pricing]: {}", self.currency))
    }

    /// Build the pricing rules this config describes.
    pub fn rules(&self) -> Result<PricingRules> {
        PricingRules::from_decimal(
            self.currency()?,
            self.free_shipping_threshold,
            self.flat_shipping_rate,
            self.tax_rate_percent,
        )
        .context("Invalid [pricing] section")
    }
}

/// Commented starter config written by `shop config init`.
pub fn generate_default_config() -> String {
    r#"# Storefront CLI configuration

[api]
base_url = "http://localhost:7000"
connect_timeout_secs = 5
request_timeout_secs = 30

[storage]
# Cart and session records live here, one JSON file per key
dir = ".shop"

[pricing]
currency = "BDT"
# Orders strictly above this ship free
free_shipping_threshold = 100.0
flat_shipping_rate = 100.0
tax_rate_percent = 15.0
"#
    .to_string()
}
