//! # Backend Contracts
//!
//! The three managed services the storefront talks to. Services in this
//! crate only ever hold `Arc<dyn ...>` handles, so the hosted backend and
//! [`crate::memory::MemoryBackend`] are interchangeable.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │   AuthProvider   │   │  DocumentStore   │   │    FileStore     │
//! │ accounts         │   │ databases/tables │   │ buckets/files    │
//! │ sessions         │   │ rows (JSON)      │   │ view URLs        │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BackendResult;
use crate::query::Query;

// =============================================================================
// Documents
// =============================================================================

/// Generates a fresh row, account or file identifier.
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A stored row: system attributes plus the caller's JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Map<String, Value>,
}

impl Document {
    /// Returns the row as a single JSON object with `$id`, `$createdAt` and
    /// `$updatedAt` alongside the data fields.
    pub fn to_value(&self) -> Value {
        let mut object = self.data.clone();
        object.insert("$id".to_string(), Value::String(self.id.clone()));
        object.insert(
            "$createdAt".to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        object.insert(
            "$updatedAt".to_string(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        Value::Object(object)
    }

    /// Decodes the row into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> BackendResult<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }
}

/// Serializes a record into row data, dropping system attributes.
pub fn to_row_data<T: Serialize>(record: &T) -> BackendResult<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(mut map) => {
            map.retain(|key, _| !key.starts_with('$'));
            Ok(map)
        }
        other => Err(crate::error::BackendError::InvalidDocument(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

// =============================================================================
// Auth
// =============================================================================

/// A managed auth account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

/// An email/password session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub account_id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers a new account. Fails with `AlreadyExists` for a taken email.
    async fn create_account(&self, email: &str, password: &str, name: &str)
        -> BackendResult<Account>;

    /// Opens a session and makes it current. Fails with `Unauthorized`.
    async fn create_session(&self, email: &str, password: &str) -> BackendResult<Session>;

    /// Returns the account of the current session, or `NoSession`.
    async fn get_current_account(&self) -> BackendResult<Account>;

    /// Ends the current session.
    async fn delete_current_session(&self) -> BackendResult<()>;
}

// =============================================================================
// Document Store
// =============================================================================

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_rows(
        &self,
        database_id: &str,
        table_id: &str,
        queries: &[Query],
    ) -> BackendResult<Vec<Document>>;

    async fn get_row(&self, database_id: &str, table_id: &str, row_id: &str)
        -> BackendResult<Document>;

    async fn create_row(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: Map<String, Value>,
    ) -> BackendResult<Document>;

    async fn delete_row(&self, database_id: &str, table_id: &str, row_id: &str)
        -> BackendResult<()>;
}

// =============================================================================
// File Store
// =============================================================================

/// A file to upload, referenced by where its bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub uri: String,
}

impl FileUpload {
    /// Describes a remote image, naming it after the last path segment.
    ///
    /// ```rust
    /// use foodie_backend::contracts::FileUpload;
    ///
    /// let upload = FileUpload::image_from_url("https://cdn.example.com/img/burger.png?v=2");
    /// assert_eq!(upload.name, "burger.png");
    /// assert_eq!(upload.mime_type, "image/png");
    /// ```
    pub fn image_from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let name = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("file-{}", uuid::Uuid::new_v4()));

        let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
        let mime_type = match extension.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "image/png",
        };

        FileUpload {
            name,
            mime_type: mime_type.to_string(),
            uri: url.to_string(),
        }
    }
}

/// Metadata of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "bucketId")]
    pub bucket_id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        upload: FileUpload,
    ) -> BackendResult<StoredFile>;

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> BackendResult<()>;

    async fn list_files(&self, bucket_id: &str) -> BackendResult<Vec<StoredFile>>;

    /// Public URL the UI can load the file from.
    async fn file_view_url(&self, bucket_id: &str, file_id: &str) -> BackendResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodie_core::{Category, MenuItem, Money};
    use serde_json::json;

    fn document(data: Value) -> Document {
        Document {
            id: "cat-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            data: match data {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    #[test]
    fn test_decode_document() {
        let doc = document(json!({ "name": "Burgers", "description": "Grilled" }));
        let category: Category = doc.decode().unwrap();
        assert_eq!(category.id, "cat-1");
        assert_eq!(category.name, "Burgers");

        let value = doc.to_value();
        assert!(value.get("$createdAt").is_some());
    }

    #[test]
    fn test_decode_wrong_shape() {
        let doc = document(json!({ "title": "Burgers" }));
        let result: BackendResult<Category> = doc.decode();
        assert!(matches!(
            result,
            Err(crate::error::BackendError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_to_row_data_strips_system_fields() {
        let item = MenuItem {
            id: "menu-1".to_string(),
            name: "Cheeseburger".to_string(),
            description: String::new(),
            image_url: "https://cdn.example.com/burger.png".to_string(),
            price: Money::from_cents(2599),
            rating: 4.5,
            calories: 550,
            protein: 25,
            category_id: "cat-1".to_string(),
        };
        let data = to_row_data(&item).unwrap();
        assert!(!data.contains_key("$id"));
        assert_eq!(data["price"], json!(25.99));
        assert_eq!(data["categories"], json!("cat-1"));
    }

    #[test]
    fn test_image_from_url_fallbacks() {
        let upload = FileUpload::image_from_url("https://cdn.example.com/photos/fries.JPG");
        assert_eq!(upload.name, "fries.JPG");
        assert_eq!(upload.mime_type, "image/jpeg");

        let upload = FileUpload::image_from_url("https://cdn.example.com/photos/");
        assert_eq!(upload.name, "photos");
    }
}
