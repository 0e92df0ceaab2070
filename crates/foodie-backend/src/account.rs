//! # Account Service
//!
//! Sign up, sign in, current user and log out.
//!
//! ## Sign Up Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_user(form)                                                      │
//! │       │                                                                 │
//! │       ├── validate_sign_up(form)          (no call on bad input)       │
//! │       ├── auth.create_account(email, password, name)                   │
//! │       ├── auth.create_session(email, password)                         │
//! │       ├── config.initials_avatar_url(name)                             │
//! │       └── docs.create_row(users, { accountId, name, email, avatar })   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::{debug, info};

use foodie_core::validation::{validate_sign_in, validate_sign_up};
use foodie_core::{SignInForm, SignUpForm, User};

use crate::config::BackendConfig;
use crate::contracts::{to_row_data, unique_id, AuthProvider, DocumentStore, Session};
use crate::error::{BackendError, BackendResult};
use crate::query::Query;

/// Managed auth plus the `users` profile table.
#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
    config: Arc<BackendConfig>,
}

impl AccountService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DocumentStore>,
        config: Arc<BackendConfig>,
    ) -> Self {
        AccountService {
            auth,
            store,
            config,
        }
    }

    /// Registers an account, signs it in and creates its profile row.
    pub async fn create_user(&self, form: &SignUpForm) -> BackendResult<User> {
        validate_sign_up(form)?;
        let name = form.name.trim();
        let email = form.email.trim();

        let account = self
            .auth
            .create_account(email, &form.password, name)
            .await?;
        self.sign_in(&SignInForm {
            email: email.to_string(),
            password: form.password.clone(),
        })
        .await?;

        let avatar = self.config.initials_avatar_url(name)?;
        let user = User {
            id: unique_id(),
            account_id: account.id,
            name: name.to_string(),
            email: email.to_string(),
            avatar,
        };

        let db = &self.config.database;
        let row = self
            .store
            .create_row(
                &db.id,
                &db.users,
                &user.id,
                to_row_data(&user)?,
            )
            .await?;

        info!(user_id = %user.id, "User created");
        row.decode()
    }

    /// Opens an email/password session.
    pub async fn sign_in(&self, form: &SignInForm) -> BackendResult<Session> {
        validate_sign_in(form)?;
        let session = self
            .auth
            .create_session(form.email.trim(), &form.password)
            .await?;
        debug!(session_id = %session.id, "Signed in");
        Ok(session)
    }

    /// Returns the profile of the signed-in account.
    ///
    /// ## Errors
    /// - `NoSession` when nobody is signed in
    /// - `NotFound` when the account has no `users` row
    pub async fn get_current_user(&self) -> BackendResult<User> {
        let account = self.auth.get_current_account().await?;

        let db = &self.config.database;
        let rows = self
            .store
            .list_rows(
                &db.id,
                &db.users,
                &[Query::equal("accountId", account.id.as_str()), Query::limit(1)],
            )
            .await?;

        rows.first()
            .ok_or_else(|| BackendError::not_found(&db.users, &account.id))?
            .decode()
    }

    /// Ends the current session.
    pub async fn log_out(&self) -> BackendResult<()> {
        self.auth.delete_current_session().await?;
        info!("Logged out");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn service() -> (Arc<MemoryBackend>, AccountService) {
        let backend = Arc::new(MemoryBackend::default());
        let service = AccountService::new(
            backend.clone(),
            backend.clone(),
            Arc::new(BackendConfig::default()),
        );
        (backend, service)
    }

    fn ada() -> SignUpForm {
        SignUpForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "password1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_and_get_current_user() {
        let (backend, service) = service();

        let user = service.create_user(&ada()).await.unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.avatar.contains("/avatars/initials?name=Ada+Lovelace"));
        assert!(user.avatar.contains("width=256&height=256"));

        let current = service.get_current_user().await.unwrap();
        assert_eq!(current, user);

        let account = backend.get_current_account().await.unwrap();
        assert_eq!(current.account_id, account.id);
    }

    #[tokio::test]
    async fn test_create_user_validates_first() {
        let (backend, service) = service();
        let mut form = ada();
        form.password = "short".to_string();

        let result = service.create_user(&form).await;
        assert!(matches!(result, Err(BackendError::Validation(_))));
        assert!(backend
            .create_session("ada@example.com", "short")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_duplicate_sign_up() {
        let (_, service) = service();
        service.create_user(&ada()).await.unwrap();
        assert!(matches!(
            service.create_user(&ada()).await,
            Err(BackendError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_sign_in_and_log_out() {
        let (_, service) = service();
        service.create_user(&ada()).await.unwrap();
        service.log_out().await.unwrap();

        assert!(matches!(
            service.get_current_user().await,
            Err(BackendError::NoSession)
        ));

        let wrong = SignInForm {
            email: "ada@example.com".to_string(),
            password: "not-the-password".to_string(),
        };
        assert!(matches!(
            service.sign_in(&wrong).await,
            Err(BackendError::Unauthorized)
        ));

        let right = SignInForm {
            email: "ada@example.com".to_string(),
            password: "password1".to_string(),
        };
        service.sign_in(&right).await.unwrap();
        assert_eq!(service.get_current_user().await.unwrap().name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_current_user_without_profile_row() {
        let (backend, service) = service();
        backend
            .create_account("bob@example.com", "password1", "Bob")
            .await
            .unwrap();
        backend
            .create_session("bob@example.com", "password1")
            .await
            .unwrap();

        assert!(matches!(
            service.get_current_user().await,
            Err(BackendError::NotFound { .. })
        ));
    }
}
