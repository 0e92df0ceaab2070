//! # State Module
//!
//! Session state owned by the application root and handed to screens by
//! reference. There are no global stores.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      AppState (root)                            │   │
//! │  │  sign_in / sign_up / sign_out / restore_session                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  AuthStore   │  │  CartState   │  │ StorefrontConfig │              │
//! │  │              │  │              │  │                  │              │
//! │  │  RwLock<     │  │  Arc<Mutex<  │  │  delivery fee    │              │
//! │  │   AuthState> │  │    Cart>>    │  │  discount, limit │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • AuthStore / CartState: short synchronous critical sections          │
//! │  • StorefrontConfig: read-only after initialization                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;
mod config;

pub use auth::{AuthState, AuthStore};
pub use cart::{CartState, CartTotals, CheckoutSummary};
pub use config::StorefrontConfig;

use std::sync::Arc;
use tracing::{info, warn};

use foodie_backend::{
    AccountService, AuthProvider, BackendConfig, Catalog, DocumentStore, MemoryBackend,
};
use foodie_core::{SignInForm, SignUpForm, User};

use crate::error::AppError;
use crate::search::MenuSearch;

/// Root of the storefront's session state.
#[derive(Clone)]
pub struct AppState {
    config: StorefrontConfig,
    catalog: Catalog,
    account: AccountService,
    auth: AuthStore,
    cart: CartState,
}

impl AppState {
    pub fn new(
        config: StorefrontConfig,
        backend_config: Arc<BackendConfig>,
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let catalog = Catalog::new(store.clone(), backend_config.clone());
        let account = AccountService::new(auth, store, backend_config);
        AppState {
            config,
            catalog,
            auth: AuthStore::new(account.clone()),
            account,
            cart: CartState::new(),
        }
    }

    /// App state over an in-memory backend (development and tests).
    pub fn in_memory(
        config: StorefrontConfig,
        backend_config: BackendConfig,
    ) -> (Self, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new(backend_config.clone()));
        let state = AppState::new(
            config,
            Arc::new(backend_config),
            backend.clone(),
            backend.clone(),
        );
        (state, backend)
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Picks up an existing session at launch.
    pub async fn restore_session(&self) {
        self.auth.fetch_authenticated_user().await;
    }

    /// Signs in and loads the user's profile.
    ///
    /// If the profile cannot be loaded the new session is closed again, so
    /// the backend never holds a session the UI shows as signed out.
    pub async fn sign_in(&self, form: &SignInForm) -> Result<User, AppError> {
        self.account.sign_in(form).await?;
        let user = match self.account.get_current_user().await {
            Ok(user) => user,
            Err(e) => {
                if let Err(close) = self.account.log_out().await {
                    warn!(error = %close, "Could not close session after failed sign in");
                }
                self.auth.sign_out();
                return Err(e.into());
            }
        };

        self.auth.set_user(Some(user.clone()));
        self.auth.set_authenticated(true);
        self.auth.set_loading(false);

        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Creates an account, signs it in and stores the new profile.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<User, AppError> {
        let user = self.account.create_user(form).await?;

        self.auth.set_user(Some(user.clone()));
        self.auth.set_authenticated(true);
        self.auth.set_loading(false);

        Ok(user)
    }

    /// Ends the session. Local auth state and the cart are cleared even when
    /// the backend call fails.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let result = self.account.log_out().await;

        self.auth.sign_out();
        self.cart.clear();

        result.map_err(AppError::from)
    }

    /// Mounts a search screen controller with this app's menu limit.
    pub async fn menu_search(&self, category: Option<&str>, query: Option<&str>) -> MenuSearch {
        MenuSearch::mount(self.catalog.clone(), &self.config, category, query).await
    }

    pub fn checkout_summary(&self) -> CheckoutSummary {
        self.cart.summary(&self.config)
    }
}
