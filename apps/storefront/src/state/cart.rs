//! # Cart State
//!
//! Holds the session's shopping cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several screens (menu details, cart, tab badge) touch the same cart
//! 2. Only one of them should modify it at a time
//! 3. Every operation is synchronous, so the lock is never held across `.await`
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Screen Action            CartState               Cart Change           │
//! │  ─────────────            ─────────               ───────────           │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_item() ──────────► qty + 1 or new line  │
//! │                                                                         │
//! │  "+" / "−" ──────────────► increase/decrease ───► qty ± 1 (1 → gone)   │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_item() ───────► line removed         │
//! │                                                                         │
//! │  Order placed / log out ─► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  Cart screen ────────────► summary() ───────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

use foodie_core::{Cart, CartCustomization, CartItemDraft, CartLineItem, Money};

use super::config::StorefrontConfig;

/// Cart totals for the tab badge and list footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct lines.
    pub line_count: usize,

    /// Sum of quantities.
    pub total_items: u64,

    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.lines().len(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

/// Payment summary shown on the cart screen.
///
/// ```text
/// Total Items (3)        $22.00
/// Delivery Fee            $5.00
/// Discount               -$0.50
/// ─────────────────────────────
/// Total                  $26.50
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub total_items: u64,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub discount: Money,
    pub total: Money,
}

impl CheckoutSummary {
    /// Builds the summary. An empty cart has no fee and no discount.
    pub fn from_cart(cart: &Cart, config: &StorefrontConfig) -> Self {
        if cart.is_empty() {
            return CheckoutSummary {
                total_items: 0,
                subtotal: Money::zero(),
                delivery_fee: Money::zero(),
                discount: Money::zero(),
                total: Money::zero(),
            };
        }

        let subtotal = cart.total_price();
        let total = (subtotal + config.delivery_fee - config.discount).max(Money::zero());
        CheckoutSummary {
            total_items: cart.total_items(),
            subtotal,
            delivery_fee: config.delivery_fee,
            discount: config.discount,
            total,
        }
    }
}

/// Session-scoped cart shared by every screen.
///
/// Cloning yields another handle to the same cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| CartTotals::from(cart));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    pub fn add_item(&self, draft: CartItemDraft) {
        self.with_cart_mut(|cart| cart.add_item(draft));
    }

    pub fn remove_item(&self, id: &str, customizations: &[CartCustomization]) -> bool {
        self.with_cart_mut(|cart| cart.remove_item(id, customizations))
    }

    pub fn increase_qty(&self, id: &str, customizations: &[CartCustomization]) -> bool {
        self.with_cart_mut(|cart| cart.increase_qty(id, customizations))
    }

    pub fn decrease_qty(&self, id: &str, customizations: &[CartCustomization]) -> bool {
        self.with_cart_mut(|cart| cart.decrease_qty(id, customizations))
    }

    pub fn clear(&self) {
        self.with_cart_mut(Cart::clear);
    }

    /// Copy of the lines in display order.
    pub fn lines(&self) -> Vec<CartLineItem> {
        self.with_cart(|cart| cart.lines().to_vec())
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }

    pub fn summary(&self, config: &StorefrontConfig) -> CheckoutSummary {
        self.with_cart(|cart| CheckoutSummary::from_cart(cart, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodie_core::cart::CustomizationKind;

    fn topping(id: &str, cents: i64) -> CartCustomization {
        CartCustomization::new(id, id, Money::from_cents(cents), CustomizationKind::Topping)
    }

    fn burger(customizations: Vec<CartCustomization>) -> CartItemDraft {
        CartItemDraft::new("burger", "Classic Burger", Money::from_cents(1000))
            .with_customizations(customizations)
    }

    #[test]
    fn test_shared_handles_see_same_cart() {
        let state = CartState::new();
        let other = state.clone();

        state.add_item(burger(vec![topping("cheese", 100)]));
        other.add_item(burger(vec![topping("cheese", 100)]));

        let totals = state.totals();
        assert_eq!(totals.line_count, 1);
        assert_eq!(totals.total_items, 2);
        assert_eq!(totals.total_price.cents(), 2200);
    }

    #[test]
    fn test_quantity_operations() {
        let state = CartState::new();
        let extras = vec![topping("bacon", 150), topping("cheese", 100)];
        state.add_item(burger(extras.clone()));

        let reordered = vec![topping("cheese", 100), topping("bacon", 150)];
        assert!(state.increase_qty("burger", &reordered));
        assert_eq!(state.lines()[0].quantity, 2);

        assert!(state.decrease_qty("burger", &extras));
        assert!(state.decrease_qty("burger", &extras));
        assert!(state.lines().is_empty());

        assert!(!state.decrease_qty("burger", &extras));
        assert!(!state.remove_item("burger", &extras));
    }

    #[test]
    fn test_checkout_summary() {
        let state = CartState::new();
        let config = StorefrontConfig::default();

        state.add_item(burger(vec![topping("cheese", 100)]));
        state.add_item(burger(vec![topping("cheese", 100)]));

        let summary = state.summary(&config);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.subtotal.cents(), 2200);
        assert_eq!(summary.delivery_fee.cents(), 500);
        assert_eq!(summary.discount.cents(), 50);
        assert_eq!(summary.total.cents(), 2650);
        assert_eq!(config.format_currency(summary.total), "$26.50");
    }

    #[test]
    fn test_checkout_summary_empty_cart() {
        let state = CartState::new();
        let summary = state.summary(&StorefrontConfig::default());
        assert_eq!(summary.total, Money::zero());
        assert_eq!(summary.delivery_fee, Money::zero());
        assert_eq!(summary.discount, Money::zero());
    }

    #[test]
    fn test_clear() {
        let state = CartState::new();
        state.add_item(burger(Vec::new()));
        state.clear();
        assert_eq!(state.totals().total_items, 0);
        assert_eq!(state.totals().total_price, Money::zero());
    }
}
