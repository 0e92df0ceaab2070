//! # Auth State
//!
//! Who is signed in, as far as the UI is concerned.
//!
//! ```text
//! initial ─────────────► { is_authenticated: false, user: None, is_loading: true }
//!
//! fetch_authenticated_user()
//!     ├── Ok(user) ────► { true,  Some(user), false }
//!     └── Err(_)   ────► { false, None,       false }   (logged, never returned)
//! ```

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

use foodie_backend::AccountService;
use foodie_core::User;

/// Snapshot of the auth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        AuthState {
            is_authenticated: false,
            user: None,
            is_loading: true,
        }
    }
}

/// Session-scoped auth state backed by the account service.
#[derive(Clone)]
pub struct AuthStore {
    account: AccountService,
    state: Arc<RwLock<AuthState>>,
}

impl AuthStore {
    pub fn new(account: AccountService) -> Self {
        AuthStore {
            account,
            state: Arc::new(RwLock::new(AuthState::default())),
        }
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated
    }

    pub fn user(&self) -> Option<User> {
        self.state().user
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn set_authenticated(&self, value: bool) {
        self.update(|state| state.is_authenticated = value);
    }

    pub fn set_user(&self, user: Option<User>) {
        self.update(|state| state.user = user);
    }

    pub fn set_loading(&self, value: bool) {
        self.update(|state| state.is_loading = value);
    }

    /// Resolves the signed-in user from the backend.
    ///
    /// Never fails: any error (no session, missing profile, network) leaves
    /// the store signed out.
    pub async fn fetch_authenticated_user(&self) {
        self.set_loading(true);

        let result = self.account.get_current_user().await;

        self.update(|state| {
            match result {
                Ok(user) => {
                    debug!(user_id = %user.id, "Authenticated user loaded");
                    state.is_authenticated = true;
                    state.user = Some(user);
                }
                Err(e) => {
                    warn!(error = %e, "Could not load authenticated user");
                    state.is_authenticated = false;
                    state.user = None;
                }
            }
            state.is_loading = false;
        });
    }

    /// Forgets the local session.
    pub fn sign_out(&self) {
        self.update(|state| {
            state.is_authenticated = false;
            state.user = None;
            state.is_loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodie_backend::{BackendConfig, MemoryBackend};
    use foodie_core::SignUpForm;

    fn store() -> (Arc<MemoryBackend>, AccountService, AuthStore) {
        let backend = Arc::new(MemoryBackend::default());
        let account = AccountService::new(
            backend.clone(),
            backend.clone(),
            Arc::new(BackendConfig::default()),
        );
        let store = AuthStore::new(account.clone());
        (backend, account, store)
    }

    #[test]
    fn test_initial_state() {
        let (_, _, store) = store();
        assert_eq!(
            store.state(),
            AuthState {
                is_authenticated: false,
                user: None,
                is_loading: true,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_authenticated_user() {
        let (_, account, store) = store();
        let user = account
            .create_user(&SignUpForm {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "password1".to_string(),
            })
            .await
            .unwrap();

        store.fetch_authenticated_user().await;
        assert!(store.is_authenticated());
        assert_eq!(store.user(), Some(user));
        assert!(!store.is_loading());

        store.sign_out();
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), None);
    }

    #[tokio::test]
    async fn test_errors_collapse_to_signed_out() {
        let (backend, _, store) = store();

        store.set_authenticated(true);
        store.fetch_authenticated_user().await;
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());

        backend.set_offline(true);
        store.fetch_authenticated_user().await;
        assert_eq!(
            store.state(),
            AuthState {
                is_authenticated: false,
                user: None,
                is_loading: false,
            }
        );
    }
}
