//! # Configuration State
//!
//! Storefront settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FOODIE_*`)
//! 2. Defaults (this file)
//!
//! Backend connection settings live in `foodie_backend::BackendConfig`.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use foodie_core::validation::validate_menu_limit;
use foodie_core::{Money, DEFAULT_MENU_LIMIT};

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontConfig {
    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Flat delivery fee added to every non-empty order
    pub delivery_fee: Money,

    /// Flat discount taken off every non-empty order
    pub discount: Money,

    /// Dishes per menu listing
    pub menu_limit: u32,
}

impl Default for StorefrontConfig {
    /// ## Default Values
    /// - Currency: USD ($)
    /// - Delivery fee: $5.00
    /// - Discount: $0.50
    /// - Menu limit: 6
    fn default() -> Self {
        StorefrontConfig {
            currency_symbol: "$".to_string(),
            delivery_fee: Money::from_cents(500),
            discount: Money::from_cents(50),
            menu_limit: DEFAULT_MENU_LIMIT,
        }
    }
}

impl StorefrontConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FOODIE_DELIVERY_FEE_CENTS`: Override delivery fee (e.g., "499")
    /// - `FOODIE_DISCOUNT_CENTS`: Override discount
    /// - `FOODIE_MENU_LIMIT`: Override menu page size (1-100)
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = StorefrontConfig::default();

        if let Some(cents) = parse_cents(&lookup, "FOODIE_DELIVERY_FEE_CENTS") {
            config.delivery_fee = cents;
        }

        if let Some(cents) = parse_cents(&lookup, "FOODIE_DISCOUNT_CENTS") {
            config.discount = cents;
        }

        if let Some(value) = lookup("FOODIE_MENU_LIMIT") {
            match value.trim().parse::<u32>() {
                Ok(limit) if validate_menu_limit(limit).is_ok() => config.menu_limit = limit,
                _ => warn!(value = %value, "Ignoring invalid FOODIE_MENU_LIMIT"),
            }
        }

        config
    }

    /// Formats a Money amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use foodie_core::Money;
    /// use foodie_storefront::state::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}",
            sign,
            self.currency_symbol,
            amount.abs().to_decimal_string()
        )
    }
}

fn parse_cents(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Money> {
    let value = lookup(key)?;
    match value.trim().parse::<i64>() {
        Ok(cents) if cents >= 0 => Some(Money::from_cents(cents)),
        _ => {
            warn!(key, value = %value, "Ignoring invalid amount");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_format_currency() {
        let config = StorefrontConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "-$5.50");
        assert_eq!(
            config.format_currency(Money::from_cents(123_456_789)),
            "$1234567.89"
        );

        let rupees = StorefrontConfig {
            currency_symbol: "Rs ".to_string(),
            ..StorefrontConfig::default()
        };
        assert_eq!(rupees.format_currency(Money::from_cents(1234)), "Rs 12.34");
    }

    #[test]
    fn test_env_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("FOODIE_DELIVERY_FEE_CENTS", "299"),
            ("FOODIE_MENU_LIMIT", "12"),
        ]));
        assert_eq!(config.delivery_fee.cents(), 299);
        assert_eq!(config.discount.cents(), 50);
        assert_eq!(config.menu_limit, 12);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("FOODIE_DISCOUNT_CENTS", "-10"),
            ("FOODIE_DELIVERY_FEE_CENTS", "five"),
            ("FOODIE_MENU_LIMIT", "0"),
        ]));
        assert_eq!(config, StorefrontConfig::default());
    }
}
