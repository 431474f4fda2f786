//! Configuration management for the storefront.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::query::PriceRange;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Storefront configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// JSON catalog to load instead of the built-in seed data
    pub catalog_path: Option<PathBuf>,
    /// Simulated payment latency (default: 3s)
    pub purchase_delay: Duration,
    /// Simulated sign-in latency (default: 2s)
    pub auth_delay: Duration,
    /// Service fee on the checkout subtotal, in percent (default: 5)
    pub service_fee_percent: u32,
    /// Most tickets offered by the detail page selector (default: 10)
    pub max_tickets_per_order: u32,
    /// Upper bound of the price filter after clearing filters (default: $1000)
    pub default_max_price: Money,
    /// Fallback log filter when `RUST_LOG` is unset (default: info)
    pub log_level: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        };
        let small = |key: &str, default: u32| {
            lookup(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            catalog_path: lookup("CATALOG_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            purchase_delay: Duration::from_millis(number("PURCHASE_DELAY_MS", 3000)),
            auth_delay: Duration::from_millis(number("AUTH_DELAY_MS", 2000)),
            service_fee_percent: small("SERVICE_FEE_PERCENT", 5),
            max_tickets_per_order: small("MAX_TICKETS_PER_ORDER", 10).max(1),
            default_max_price: Money::from_dollars(number(
                "DEFAULT_MAX_PRICE_DOLLARS",
                PriceRange::DEFAULT_MAX_DOLLARS,
            )),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Price bounds restored by "Clear filters"
    #[must_use]
    pub const fn default_price_range(&self) -> PriceRange {
        PriceRange::new(Money::ZERO, self.default_max_price)
    }

    /// Loads the configured catalog, or the seed data when no path is set.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the configured file cannot be read or
    /// parsed.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_path(path),
            None => {
                tracing::debug!("No CATALOG_PATH set, using seed catalog");
                Ok(Catalog::seed())
            },
        }
    }
}
