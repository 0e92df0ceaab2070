//! # Foodie Storefront Library
//!
//! Client-side state for the Foodie mobile storefront. The UI layer renders
//! what these types hold and calls their methods on user actions.
//!
//! ## Module Organization
//! ```text
//! foodie_storefront/
//! ├── lib.rs          ◄─── You are here (tracing setup)
//! ├── fetch.rs        ◄─── Data-fetch wrapper (loading/error/data + refetch)
//! ├── search.rs       ◄─── Search screen controller
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState root
//! │   ├── auth.rs     ◄─── Auth store
//! │   ├── cart.rs     ◄─── Cart state, totals, checkout summary
//! │   └── config.rs   ◄─── Storefront configuration
//! └── error.rs        ◄─── App error type for actions
//! ```
//!
//! ## Startup
//! ```rust,ignore
//! foodie_storefront::init_tracing();
//!
//! let backend_config = BackendConfig::load_or_default(None);
//! let (app, _backend) = AppState::in_memory(StorefrontConfig::from_env(), backend_config);
//! app.restore_session().await;
//! ```

pub mod error;
pub mod fetch;
pub mod search;
pub mod state;

pub use error::{AppError, ErrorCode};
pub use fetch::{FetchOptions, FetchState, Fetcher};
pub use search::MenuSearch;
pub use state::{AppState, AuthStore, CartState, CheckoutSummary, StorefrontConfig};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=foodie_storefront=trace` - Trace this crate only
/// - Default: INFO level
///
/// Calling it again after a subscriber is installed does nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
