//! # Domain Types
//!
//! Catalog and account types shared by every layer of the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    MenuItem     │   │  Customization  │       │
//! │  │  ─────────────  │◄──│  ─────────────  │──►│  ─────────────  │       │
//! │  │  $id            │   │  $id            │   │  $id            │       │
//! │  │  name           │   │  name, price    │   │  name, price    │       │
//! │  │  description    │   │  categories(FK) │   │  type           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                               ▲    menu_customizations    ▲            │
//! │                               └───────── (join rows) ─────┘            │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │    MenuQuery    │                             │
//! │  │  accountId (FK) │   │  category?      │                             │
//! │  │  name, email    │   │  query?, limit? │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Shape
//! Every record is decoded from a backend document. Documents carry their
//! identifier as `$id`; prices are stored in major units and converted to
//! [`Money`] on the way in.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{self, Money};
use crate::DEFAULT_MENU_LIMIT;

// =============================================================================
// Customization Kind
// =============================================================================

/// What kind of add-on a customization is.
///
/// Stored as a free-form string in the `type` column; the well-known values
/// get their own variants and anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomizationKind {
    Topping,
    Side,
    Size,
    Crust,
    Other(String),
}

impl CustomizationKind {
    pub fn as_str(&self) -> &str {
        match self {
            CustomizationKind::Topping => "topping",
            CustomizationKind::Side => "side",
            CustomizationKind::Size => "size",
            CustomizationKind::Crust => "crust",
            CustomizationKind::Other(other) => other,
        }
    }
}

impl From<String> for CustomizationKind {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "topping" => CustomizationKind::Topping,
            "side" => CustomizationKind::Side,
            "size" => CustomizationKind::Size,
            "crust" => CustomizationKind::Crust,
            _ => CustomizationKind::Other(value),
        }
    }
}

impl From<CustomizationKind> for String {
    fn from(kind: CustomizationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for CustomizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Category
// =============================================================================

/// A menu category ("Burgers", "Pizzas", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    #[serde(rename = "$id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    #[serde(rename = "$id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// View URL of the dish image in the file store.
    pub image_url: String,

    /// Unit price without customizations.
    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub price: Money,

    /// Average rating out of 5 (display only).
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub calories: u32,

    /// Protein in grams.
    #[serde(default)]
    pub protein: u32,

    /// Category document id. The column is named `categories` in the store.
    #[serde(rename = "categories")]
    pub category_id: String,
}

impl MenuItem {
    /// Returns the unit price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }
}

// =============================================================================
// Customization
// =============================================================================

/// An optional add-on (topping, side, size) with its own price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customization {
    #[serde(rename = "$id")]
    pub id: String,

    pub name: String,

    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub price: Money,

    #[serde(rename = "type")]
    #[ts(as = "String")]
    pub kind: CustomizationKind,
}

/// A `menu_customizations` join row linking a dish to one customization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCustomizationLink {
    #[serde(rename = "$id")]
    pub id: String,

    /// Menu item document id.
    pub menu: String,

    /// Customization document id.
    #[serde(rename = "customizations")]
    pub customization_id: String,
}

/// Everything the menu details screen shows for one dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuDetails {
    pub menu: MenuItem,
    pub category: Category,
    pub customizations: Vec<Customization>,
}

// =============================================================================
// User
// =============================================================================

/// A storefront user profile (the `users` table row, not the auth account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,

    /// Identifier of the auth account this profile belongs to.
    #[serde(rename = "accountId")]
    pub account_id: String,

    pub name: String,

    pub email: String,

    /// Avatar image URL.
    pub avatar: String,
}

// =============================================================================
// Menu Query
// =============================================================================

/// Parameters of a catalog listing.
///
/// ## Example
/// ```rust
/// use foodie_core::MenuQuery;
///
/// let query = MenuQuery::default().category("burgers").search("cheese");
/// assert_eq!(query.effective_limit(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuQuery {
    /// Category id filter; `None` lists every category.
    pub category: Option<String>,

    /// Free-text search on the dish name.
    pub query: Option<String>,

    /// Maximum number of dishes; defaults to [`DEFAULT_MENU_LIMIT`].
    pub limit: Option<u32>,
}

impl MenuQuery {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the limit applied to the listing.
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_MENU_LIMIT)
    }
}

// =============================================================================
// Auth Forms
// =============================================================================

/// Sign-in form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
