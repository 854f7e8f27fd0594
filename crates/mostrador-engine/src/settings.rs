//! # Engine Settings
//!
//! Configuration loaded at startup. Read-only after initialization,
//! so no locking is needed.
//!
//! ## Sources (priority order)
//! 1. Environment variables (`MOSTRADOR_*`)
//! 2. Defaults (this file)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use mostrador_core::Money;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Page size for catalog listings.
    pub catalog_page_size: u32,

    /// How long the settlement success notice stays visible, in
    /// milliseconds.
    pub notice_ttl_ms: u64,
}

impl Default for Settings {
    /// Defaults for a Peruvian retail counter: soles, 10-product pages,
    /// 4-second success notice.
    fn default() -> Self {
        Settings {
            currency_code: "PEN".to_string(),
            currency_symbol: "S/".to_string(),
            catalog_page_size: 10,
            notice_ttl_ms: 4_000,
        }
    }
}

impl Settings {
    /// Creates Settings from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MOSTRADOR_CURRENCY_CODE` / `MOSTRADOR_CURRENCY_SYMBOL`
    /// - `MOSTRADOR_PAGE_SIZE`: catalog page size
    /// - `MOSTRADOR_NOTICE_TTL_MS`: success-notice lifetime
    pub fn from_env() -> Self {
        let mut settings = Settings::default();

        if let Ok(code) = std::env::var("MOSTRADOR_CURRENCY_CODE") {
            settings.currency_code = code;
        }
        if let Ok(symbol) = std::env::var("MOSTRADOR_CURRENCY_SYMBOL") {
            settings.currency_symbol = symbol;
        }
        if let Ok(size) = std::env::var("MOSTRADOR_PAGE_SIZE") {
            if let Ok(size) = size.parse::<u32>() {
                settings.catalog_page_size = size.max(1);
            }
        }
        if let Ok(ttl) = std::env::var("MOSTRADOR_NOTICE_TTL_MS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                settings.notice_ttl_ms = ttl;
            }
        }

        settings
    }

    /// Success-notice lifetime as a [`Duration`].
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    /// Formats an amount for display: `S/ 118.00`.
    pub fn format_amount(&self, amount: Money) -> String {
        format!("{} {}", self.currency_symbol, amount)
    }
}
