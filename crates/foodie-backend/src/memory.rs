//! # In-Memory Backend
//!
//! A process-local implementation of [`AuthProvider`], [`DocumentStore`] and
//! [`FileStore`]. Used by tests, local development and seeding dry runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MemoryBackend                                                          │
//! │                                                                         │
//! │  RwLock<MemoryState>                                                    │
//! │   ├── accounts   email → (Account, password)                           │
//! │   ├── sessions   id → Session, plus the current session id             │
//! │   ├── tables     (database, table) → rows in insertion order           │
//! │   └── buckets    bucket → files                                        │
//! │                                                                         │
//! │  offline flag: every call fails with Transport while set               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::BackendConfig;
use crate::contracts::{
    unique_id, Account, AuthProvider, Document, DocumentStore, FileStore, FileUpload, Session,
    StoredFile,
};
use crate::error::{BackendError, BackendResult};
use crate::query::{limit_of, matches_all, Query};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, (Account, String)>,
    sessions: HashMap<String, Session>,
    current_session: Option<String>,
    tables: HashMap<(String, String), Vec<Document>>,
    buckets: HashMap<String, Vec<StoredFile>>,
}

/// In-process backend holding every table and bucket in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    config: BackendConfig,
    state: RwLock<MemoryState>,
    offline: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

impl MemoryBackend {
    /// Creates an empty backend. `config` is used to build file view URLs.
    pub fn new(config: BackendConfig) -> Self {
        MemoryBackend {
            config,
            state: RwLock::new(MemoryState::default()),
            offline: AtomicBool::new(false),
        }
    }

    /// While offline, every call fails with [`BackendError::Transport`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> BackendResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("backend unreachable".to_string()));
        }
        Ok(())
    }

    /// Number of rows currently stored in a table.
    pub async fn row_count(&self, database_id: &str, table_id: &str) -> usize {
        let state = self.state.read().await;
        state
            .tables
            .get(&(database_id.to_string(), table_id.to_string()))
            .map_or(0, Vec::len)
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// Auth
// =============================================================================

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> BackendResult<Account> {
        self.check_online()?;
        let mut state = self.state.write().await;

        let key = email_key(email);
        if state.accounts.contains_key(&key) {
            return Err(BackendError::already_exists("account", email));
        }

        let account = Account {
            id: unique_id(),
            email: email.trim().to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };
        state
            .accounts
            .insert(key, (account.clone(), password.to_string()));

        debug!(account_id = %account.id, "Account created");
        Ok(account)
    }

    async fn create_session(&self, email: &str, password: &str) -> BackendResult<Session> {
        self.check_online()?;
        let mut state = self.state.write().await;

        let account_id = match state.accounts.get(&email_key(email)) {
            Some((account, stored)) if stored == password => account.id.clone(),
            _ => return Err(BackendError::Unauthorized),
        };

        let session = Session {
            id: unique_id(),
            account_id,
            created_at: Utc::now(),
        };
        state.sessions.insert(session.id.clone(), session.clone());
        state.current_session = Some(session.id.clone());

        debug!(session_id = %session.id, "Session created");
        Ok(session)
    }

    async fn get_current_account(&self) -> BackendResult<Account> {
        self.check_online()?;
        let state = self.state.read().await;

        let session = state
            .current_session
            .as_ref()
            .and_then(|id| state.sessions.get(id))
            .ok_or(BackendError::NoSession)?;

        state
            .accounts
            .values()
            .map(|(account, _)| account)
            .find(|account| account.id == session.account_id)
            .cloned()
            .ok_or_else(|| BackendError::not_found("account", &session.account_id))
    }

    async fn delete_current_session(&self) -> BackendResult<()> {
        self.check_online()?;
        let mut state = self.state.write().await;

        let id = state.current_session.take().ok_or(BackendError::NoSession)?;
        state.sessions.remove(&id);

        debug!(session_id = %id, "Session deleted");
        Ok(())
    }
}

// =============================================================================
// Documents
// =============================================================================

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn list_rows(
        &self,
        database_id: &str,
        table_id: &str,
        queries: &[Query],
    ) -> BackendResult<Vec<Document>> {
        self.check_online()?;
        let state = self.state.read().await;

        let rows = match state
            .tables
            .get(&(database_id.to_string(), table_id.to_string()))
        {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        let limit = limit_of(queries).unwrap_or(usize::MAX);
        Ok(rows
            .iter()
            .filter(|row| matches_all(queries, &row.data))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
    ) -> BackendResult<Document> {
        self.check_online()?;
        let state = self.state.read().await;

        state
            .tables
            .get(&(database_id.to_string(), table_id.to_string()))
            .and_then(|rows| rows.iter().find(|row| row.id == row_id))
            .cloned()
            .ok_or_else(|| BackendError::not_found(table_id, row_id))
    }

    async fn create_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        mut data: Map<String, Value>,
    ) -> BackendResult<Document> {
        self.check_online()?;
        let mut state = self.state.write().await;

        let rows = state
            .tables
            .entry((database_id.to_string(), table_id.to_string()))
            .or_default();
        if rows.iter().any(|row| row.id == row_id) {
            return Err(BackendError::already_exists(table_id, row_id));
        }

        data.retain(|key, _| !key.starts_with('$'));
        let now = Utc::now();
        let document = Document {
            id: row_id.to_string(),
            created_at: now,
            updated_at: now,
            data,
        };
        rows.push(document.clone());

        Ok(document)
    }

    async fn delete_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
    ) -> BackendResult<()> {
        self.check_online()?;
        let mut state = self.state.write().await;

        let rows = state
            .tables
            .get_mut(&(database_id.to_string(), table_id.to_string()))
            .ok_or_else(|| BackendError::not_found(table_id, row_id))?;
        let position = rows
            .iter()
            .position(|row| row.id == row_id)
            .ok_or_else(|| BackendError::not_found(table_id, row_id))?;
        rows.remove(position);

        Ok(())
    }
}

// =============================================================================
// Files
// =============================================================================

#[async_trait]
impl FileStore for MemoryBackend {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        upload: FileUpload,
    ) -> BackendResult<StoredFile> {
        self.check_online()?;
        let mut state = self.state.write().await;

        let files = state.buckets.entry(bucket_id.to_string()).or_default();
        if files.iter().any(|file| file.id == file_id) {
            return Err(BackendError::already_exists(bucket_id, file_id));
        }

        let file = StoredFile {
            id: file_id.to_string(),
            bucket_id: bucket_id.to_string(),
            name: upload.name,
            mime_type: upload.mime_type,
            created_at: Utc::now(),
        };
        files.push(file.clone());

        Ok(file)
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> BackendResult<()> {
        self.check_online()?;
        let mut state = self.state.write().await;

        let files = state
            .buckets
            .get_mut(bucket_id)
            .ok_or_else(|| BackendError::not_found(bucket_id, file_id))?;
        let before = files.len();
        files.retain(|file| file.id != file_id);
        if files.len() == before {
            return Err(BackendError::not_found(bucket_id, file_id));
        }

        Ok(())
    }

    async fn list_files(&self, bucket_id: &str) -> BackendResult<Vec<StoredFile>> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state.buckets.get(bucket_id).cloned().unwrap_or_default())
    }

    async fn file_view_url(&self, bucket_id: &str, file_id: &str) -> BackendResult<String> {
        self.check_online()?;
        let state = self.state.read().await;

        let exists = state
            .buckets
            .get(bucket_id)
            .is_some_and(|files| files.iter().any(|file| file.id == file_id));
        if !exists {
            return Err(BackendError::not_found(bucket_id, file_id));
        }

        self.config.file_view_url(bucket_id, file_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_account_and_session_lifecycle() {
        let backend = MemoryBackend::default();

        assert!(matches!(
            backend.get_current_account().await,
            Err(BackendError::NoSession)
        ));

        let account = backend
            .create_account("ada@example.com", "password1", "Ada")
            .await
            .unwrap();
        assert!(matches!(
            backend.create_account("ADA@example.com", "other-pass", "Ada").await,
            Err(BackendError::AlreadyExists { .. })
        ));

        assert!(matches!(
            backend.create_session("ada@example.com", "wrong-pass").await,
            Err(BackendError::Unauthorized)
        ));

        let session = backend
            .create_session("ada@example.com", "password1")
            .await
            .unwrap();
        assert_eq!(session.account_id, account.id);
        assert_eq!(backend.get_current_account().await.unwrap(), account);

        backend.delete_current_session().await.unwrap();
        assert!(matches!(
            backend.get_current_account().await,
            Err(BackendError::NoSession)
        ));
        assert!(matches!(
            backend.delete_current_session().await,
            Err(BackendError::NoSession)
        ));
    }

    #[tokio::test]
    async fn test_rows_keep_insertion_order_and_filter() {
        let backend = MemoryBackend::default();
        for (id, name) in [("a", "Cheeseburger"), ("b", "Pepperoni Pizza"), ("c", "Bacon Burger")] {
            backend
                .create_row("db", "menu", id, data(json!({ "name": name })))
                .await
                .unwrap();
        }

        let all = backend.list_rows("db", "menu", &[]).await.unwrap();
        let ids: Vec<_> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let burgers = backend
            .list_rows("db", "menu", &[Query::search("name", "burger"), Query::limit(1)])
            .await
            .unwrap();
        assert_eq!(burgers.len(), 1);
        assert_eq!(burgers[0].id, "a");

        assert!(backend.list_rows("db", "unknown", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_row_crud_errors() {
        let backend = MemoryBackend::default();
        backend
            .create_row("db", "menu", "a", data(json!({ "$id": "ignored", "name": "x" })))
            .await
            .unwrap();

        let row = backend.get_row("db", "menu", "a").await.unwrap();
        assert!(!row.data.contains_key("$id"));

        assert!(matches!(
            backend.create_row("db", "menu", "a", Map::new()).await,
            Err(BackendError::AlreadyExists { .. })
        ));

        backend.delete_row("db", "menu", "a").await.unwrap();
        assert!(matches!(
            backend.get_row("db", "menu", "a").await,
            Err(BackendError::NotFound { .. })
        ));
        assert!(backend.delete_row("db", "menu", "a").await.is_err());
        assert_eq!(backend.row_count("db", "menu").await, 0);
    }

    #[tokio::test]
    async fn test_files() {
        let backend = MemoryBackend::default();
        let upload = FileUpload::image_from_url("https://cdn.example.com/burger.png");

        let file = backend.create_file("images", "f1", upload).await.unwrap();
        assert_eq!(file.name, "burger.png");
        assert_eq!(backend.list_files("images").await.unwrap().len(), 1);

        let url = backend.file_view_url("images", "f1").await.unwrap();
        assert!(url.ends_with("/storage/buckets/images/files/f1/view?project=foodie-dev"));

        backend.delete_file("images", "f1").await.unwrap();
        assert!(backend.list_files("images").await.unwrap().is_empty());
        assert!(backend.file_view_url("images", "f1").await.is_err());
        assert!(backend.delete_file("images", "f1").await.is_err());
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let backend = MemoryBackend::default();
        backend.set_offline(true);

        let err = backend.list_rows("db", "menu", &[]).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(backend.get_current_account().await.is_err());

        backend.set_offline(false);
        assert!(backend.list_rows("db", "menu", &[]).await.is_ok());
    }
}
