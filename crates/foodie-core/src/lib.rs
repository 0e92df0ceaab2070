//! # foodie-core: Pure Business Logic for the Foodie Storefront
//!
//! This crate holds the storefront's business rules as pure functions and
//! plain data, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Foodie Storefront Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (TypeScript)                       │   │
//! │  │    Home ──► Search ──► Menu Details ──► Cart ──► Profile        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 foodie-storefront (app state)                   │   │
//! │  │    Fetcher, CartState, AuthStore, MenuSearch                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ foodie-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ MenuItem  │  │   Money   │  │   Cart    │  │   forms   │  │   │
//! │  │   │ Category  │  │           │  │  LineKey  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO BACKEND • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  foodie-backend (Service Layer)                 │   │
//! │  │          auth, documents, files, catalog, seeding               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and account types (MenuItem, Category, User, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Shopping cart with order-independent customization identity
//! - [`error`] - Domain error types
//! - [`validation`] - Form and business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use foodie_core::cart::{Cart, CartCustomization, CartItemDraft, CustomizationKind};
//! use foodie_core::money::Money;
//!
//! let mut cart = Cart::new();
//! let cheese = CartCustomization::new("cheese", "Cheese", Money::from_cents(100), CustomizationKind::Topping);
//!
//! let burger = CartItemDraft::new("burger", "Classic Burger", Money::from_cents(1000))
//!     .with_customizations(vec![cheese]);
//!
//! cart.add_item(burger.clone());
//! cart.add_item(burger);
//!
//! assert_eq!(cart.lines().len(), 1);
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().cents(), 2200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartCustomization, CartItemDraft, CartLineItem, LineKey};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of menu items a catalog listing returns when no limit is given.
pub const DEFAULT_MENU_LIMIT: u32 = 6;

/// Upper bound accepted for a catalog listing limit.
pub const MAX_MENU_LIMIT: u32 = 100;

/// Minimum password length accepted by the hosted authentication service.
pub const MIN_PASSWORD_LENGTH: usize = 8;
