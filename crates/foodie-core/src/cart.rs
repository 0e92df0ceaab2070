//! # Cart
//!
//! The shopping cart: line items keyed by dish + selected customizations.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          LineKey                                        │
//! │                                                                         │
//! │  add_item(burger, [bacon, cheese])  ──► key: burger|bacon,cheese        │
//! │  add_item(burger, [cheese, bacon])  ──► key: burger|bacon,cheese  (=)   │
//! │  add_item(burger, [cheese])         ──► key: burger|cheese        (≠)   │
//! │  add_item(burger, [])               ──► key: burger|              (≠)   │
//! │                                                                         │
//! │  Customization ids are sorted and deduplicated, so selection order     │
//! │  and repeated taps never create a second line for the same combo.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//! ```text
//! Screen Action            Cart Method              Line Change
//! ─────────────            ───────────              ───────────
//! Add to Cart ───────────► add_item() ────────────► qty + 1 or push(qty 1)
//! Tap "+" ───────────────► increase_qty() ────────► qty + 1
//! Tap "−" ───────────────► decrease_qty() ────────► qty − 1, removed at 0
//! Swipe to delete ───────► remove_item() ─────────► removed
//! Checkout / logout ─────► clear() ───────────────► all removed
//! ```
//!
//! Every operation is total: a missing line is a no-op, never an error.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customization, MenuItem};

pub use crate::types::CustomizationKind;

// =============================================================================
// Cart Customization
// =============================================================================

/// A customization frozen into a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartCustomization {
    pub id: String,
    pub name: String,
    pub price: Money,
    #[serde(rename = "type")]
    #[ts(as = "String")]
    pub kind: CustomizationKind,
}

impl CartCustomization {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        kind: CustomizationKind,
    ) -> Self {
        CartCustomization {
            id: id.into(),
            name: name.into(),
            price,
            kind,
        }
    }
}

impl From<&Customization> for CartCustomization {
    fn from(customization: &Customization) -> Self {
        CartCustomization {
            id: customization.id.clone(),
            name: customization.name.clone(),
            price: customization.price,
            kind: customization.kind.clone(),
        }
    }
}

// =============================================================================
// Line Key
// =============================================================================

/// Canonical identity of a cart line: item id + set of customization ids.
///
/// ## Example
/// ```rust
/// use foodie_core::cart::LineKey;
///
/// let a = LineKey::from_ids("burger", ["bacon", "cheese"]);
/// let b = LineKey::from_ids("burger", ["cheese", "bacon", "cheese"]);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "burger|bacon,cheese");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    item_id: String,
    customization_ids: BTreeSet<String>,
}

impl LineKey {
    /// Builds the key for a dish and its selected customizations.
    pub fn new(item_id: &str, customizations: &[CartCustomization]) -> Self {
        Self::from_ids(item_id, customizations.iter().map(|c| c.id.as_str()))
    }

    /// Builds the key from raw customization ids.
    pub fn from_ids<I, S>(item_id: &str, customization_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LineKey {
            item_id: item_id.to_string(),
            customization_ids: customization_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Customization ids in canonical (sorted, unique) order.
    pub fn customization_ids(&self) -> impl Iterator<Item = &str> {
        self.customization_ids.iter().map(String::as_str)
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|", self.item_id)?;
        for (i, id) in self.customization_ids.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(id)?;
        }
        Ok(())
    }
}

// =============================================================================
// Cart Item Draft
// =============================================================================

/// What the menu screen hands to [`Cart::add_item`]: a line without quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItemDraft {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub image_url: String,
    pub customizations: Vec<CartCustomization>,
}

impl CartItemDraft {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        CartItemDraft {
            id: id.into(),
            name: name.into(),
            price,
            image_url: String::new(),
            customizations: Vec::new(),
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_customizations(mut self, customizations: Vec<CartCustomization>) -> Self {
        self.customizations = customizations;
        self
    }

    /// Snapshots a dish and the customizations the user picked.
    ///
    /// ## Price Freezing
    /// Prices are captured now; later catalog edits do not change the line.
    pub fn from_menu_item(item: &MenuItem, selected: &[Customization]) -> Self {
        CartItemDraft {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image_url: item.image_url.clone(),
            customizations: selected.iter().map(CartCustomization::from).collect(),
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(&self.id, &self.customizations)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One distinct dish + customization combination in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Catalog item id.
    pub id: String,

    pub name: String,

    /// Unit price of the dish alone, frozen when added.
    pub price: Money,

    pub image_url: String,

    /// Selected customizations in the order the user picked them.
    pub customizations: Vec<CartCustomization>,

    /// Always at least 1.
    pub quantity: u32,
}

impl CartLineItem {
    fn from_draft(draft: CartItemDraft) -> Self {
        CartLineItem {
            id: draft.id,
            name: draft.name,
            price: draft.price,
            image_url: draft.image_url,
            customizations: draft.customizations,
            quantity: 1,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(&self.id, &self.customizations)
    }

    /// Dish price plus every customization price, for one unit.
    pub fn unit_price(&self) -> Money {
        self.price + self.customizations.iter().map(|c| c.price).sum::<Money>()
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - At most one line per [`LineKey`] (adding the same combo bumps quantity)
/// - Every line has quantity >= 1 (decrementing from 1 removes the line)
/// - Lines keep insertion order for display
/// - Totals are derived on read, never stored
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartLineItem>,

    /// When the cart was created/last cleared.
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a dish + customization combination.
    ///
    /// ## Behavior
    /// - Same key already in cart: quantity + 1
    /// - Otherwise: appended with quantity 1
    pub fn add_item(&mut self, draft: CartItemDraft) {
        let key = draft.key();
        match self.position(&key) {
            Some(index) => {
                let line = &mut self.items[index];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.items.push(CartLineItem::from_draft(draft)),
        }
    }

    /// Removes the matching line regardless of quantity.
    ///
    /// Returns `false` (and changes nothing) when no line matches.
    pub fn remove_item(&mut self, id: &str, customizations: &[CartCustomization]) -> bool {
        self.remove_key(&LineKey::new(id, customizations))
    }

    /// Removes the line with the given key.
    pub fn remove_key(&mut self, key: &LineKey) -> bool {
        match self.position(key) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Adds one to the matching line's quantity.
    pub fn increase_qty(&mut self, id: &str, customizations: &[CartCustomization]) -> bool {
        let key = LineKey::new(id, customizations);
        match self.position(&key) {
            Some(index) => {
                let line = &mut self.items[index];
                line.quantity = line.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Subtracts one from the matching line's quantity.
    ///
    /// A line at quantity 1 is removed instead of dropping to 0.
    pub fn decrease_qty(&mut self, id: &str, customizations: &[CartCustomization]) -> bool {
        let key = LineKey::new(id, customizations);
        let Some(index) = self.position(&key) else {
            return false;
        };

        if self.items[index].quantity <= 1 {
            self.items.remove(index);
        } else {
            self.items[index].quantity -= 1;
        }
        true
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Looks up a line by key.
    pub fn line(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.position(key).map(|index| &self.items[index])
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of every line total.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.items.iter().position(|line| &line.key() == key)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn topping(id: &str, cents: i64) -> CartCustomization {
        CartCustomization::new(id, id, Money::from_cents(cents), CustomizationKind::Topping)
    }

    fn burger(customizations: Vec<CartCustomization>) -> CartItemDraft {
        CartItemDraft::new("burger", "Classic Burger", Money::from_cents(1000))
            .with_image_url("https://cdn.example.com/burger.png")
            .with_customizations(customizations)
    }

    #[test]
    fn test_same_combination_twice_increments_quantity() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![topping("cheese", 100)]));
        cart.add_item(burger(vec![topping("cheese", 100)]));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_customization_order_does_not_matter() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![topping("a", 50), topping("b", 75)]));
        cart.add_item(burger(vec![topping("b", 75), topping("a", 50)]));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_different_customizations_are_separate_lines() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![topping("a", 50)]));
        cart.add_item(burger(vec![topping("a", 50), topping("b", 75)]));
        cart.add_item(burger(vec![]));

        assert_eq!(cart.lines().len(), 3);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_duplicate_ids_in_selection_collapse() {
        let a = LineKey::new("burger", &[topping("a", 50), topping("a", 50)]);
        let b = LineKey::new("burger", &[topping("a", 50)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_decrease_at_one_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![]));

        assert!(cart.decrease_qty("burger", &[]));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increase_then_decrease() {
        let mut cart = Cart::new();
        let extras = vec![topping("cheese", 100)];
        cart.add_item(burger(extras.clone()));

        assert!(cart.increase_qty("burger", &extras));
        assert!(cart.increase_qty("burger", &extras));
        assert_eq!(cart.total_items(), 3);

        assert!(cart.decrease_qty("burger", &extras));
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_quantity_ops_on_missing_line_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![]));

        assert!(!cart.increase_qty("pizza", &[]));
        assert!(!cart.decrease_qty("burger", &[topping("cheese", 100)]));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_remove_missing_key_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![topping("cheese", 100)]));
        let before = cart.lines().to_vec();

        assert!(!cart.remove_item("burger", &[]));
        assert!(!cart.remove_item("pizza", &[topping("cheese", 100)]));
        assert_eq!(cart.lines(), before.as_slice());
    }

    #[test]
    fn test_remove_drops_whole_line() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![]));
        cart.add_item(burger(vec![]));
        cart.add_item(burger(vec![topping("cheese", 100)]));

        assert!(cart.remove_item("burger", &[]));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_total_price_includes_customizations() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![topping("cheese", 100)]));
        cart.add_item(burger(vec![topping("cheese", 100)]));

        // 2 × ($10.00 + $1.00)
        assert_eq!(cart.total_price(), Money::from_cents(2200));
        assert_eq!(cart.total_price().to_string(), "$22.00");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(CartItemDraft::new("fries", "Fries", Money::from_cents(300)));
        cart.add_item(burger(vec![]));
        cart.add_item(CartItemDraft::new("fries", "Fries", Money::from_cents(300)));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["fries", "burger"]);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(burger(vec![]));
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_draft_from_menu_item() {
        let item = MenuItem {
            id: "menu-1".to_string(),
            name: "Pepperoni Pizza".to_string(),
            description: String::new(),
            image_url: "https://cdn.example.com/pizza.png".to_string(),
            price: Money::from_cents(1499),
            rating: 4.7,
            calories: 800,
            protein: 30,
            category_id: "cat-pizza".to_string(),
        };
        let crust = Customization {
            id: "cus-crust".to_string(),
            name: "Stuffed Crust".to_string(),
            price: Money::from_cents(250),
            kind: CustomizationKind::Crust,
        };

        let mut cart = Cart::new();
        cart.add_item(CartItemDraft::from_menu_item(&item, &[crust]));

        let line = &cart.lines()[0];
        assert_eq!(line.unit_price().cents(), 1749);
        assert_eq!(line.key().to_string(), "menu-1|cus-crust");
    }
}
