//! # Backend Configuration
//!
//! Where the hosted backend lives and which database, tables and bucket
//! the storefront reads.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FOODIE_ENDPOINT=https://backend.example.com/v1                     │
//! │     FOODIE_PROJECT_ID=foodie-prod                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/backend.toml (Linux)                          │
//! │     ~/Library/Application Support/com.foodie.storefront/backend.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     local development backend                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [project]
//! endpoint = "https://backend.example.com/v1"
//! id = "foodie-prod"
//! platform = "com.foodie.storefront"
//!
//! [database]
//! id = "foodie"
//! users = "users"
//! categories = "categories"
//! menu = "menu"
//! customizations = "customizations"
//! menu_customizations = "menu_customizations"
//!
//! [storage]
//! bucket_id = "menu-images"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{BackendError, BackendResult};

// =============================================================================
// Project Configuration
// =============================================================================

/// Connection settings for the hosted project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// API endpoint, including the version path.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Project identifier sent with every request.
    #[serde(default = "default_project_id")]
    pub id: String,

    /// Client platform identifier registered with the project.
    #[serde(default = "default_platform")]
    pub platform: String,
}

fn default_endpoint() -> String {
    "http://localhost/v1".to_string()
}

fn default_project_id() -> String {
    "foodie-dev".to_string()
}

fn default_platform() -> String {
    "com.foodie.storefront".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            endpoint: default_endpoint(),
            id: default_project_id(),
            platform: default_platform(),
        }
    }
}

// =============================================================================
// Database Configuration
// =============================================================================

/// Database id and the table ids inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_id")]
    pub id: String,

    #[serde(default = "default_users_table")]
    pub users: String,

    #[serde(default = "default_categories_table")]
    pub categories: String,

    #[serde(default = "default_menu_table")]
    pub menu: String,

    #[serde(default = "default_customizations_table")]
    pub customizations: String,

    #[serde(default = "default_menu_customizations_table")]
    pub menu_customizations: String,
}

fn default_database_id() -> String {
    "foodie".to_string()
}
fn default_users_table() -> String {
    "users".to_string()
}
fn default_categories_table() -> String {
    "categories".to_string()
}
fn default_menu_table() -> String {
    "menu".to_string()
}
fn default_customizations_table() -> String {
    "customizations".to_string()
}
fn default_menu_customizations_table() -> String {
    "menu_customizations".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            id: default_database_id(),
            users: default_users_table(),
            categories: default_categories_table(),
            menu: default_menu_table(),
            customizations: default_customizations_table(),
            menu_customizations: default_menu_customizations_table(),
        }
    }
}

impl DatabaseConfig {
    /// The catalog tables the seeder resets, in dependency order.
    pub fn catalog_tables(&self) -> [&str; 4] {
        [
            self.categories.as_str(),
            self.customizations.as_str(),
            self.menu.as_str(),
            self.menu_customizations.as_str(),
        ]
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

/// File storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding menu images.
    #[serde(default = "default_bucket_id")]
    pub bucket_id: String,
}

fn default_bucket_id() -> String {
    "menu-images".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            bucket_id: default_bucket_id(),
        }
    }
}

// =============================================================================
// Main Backend Configuration
// =============================================================================

/// Complete backend configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl BackendConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (backend.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> BackendResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading backend config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load backend config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BackendResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BackendError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Backend config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BackendResult<()> {
        let endpoint = Url::parse(&self.project.endpoint).map_err(|e| {
            BackendError::InvalidConfig(format!(
                "endpoint '{}' is not a URL: {}",
                self.project.endpoint, e
            ))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(BackendError::InvalidConfig(format!(
                "endpoint must start with http:// or https://, got: {}",
                self.project.endpoint
            )));
        }

        let ids = [
            ("project.id", &self.project.id),
            ("database.id", &self.database.id),
            ("database.users", &self.database.users),
            ("database.categories", &self.database.categories),
            ("database.menu", &self.database.menu),
            ("database.customizations", &self.database.customizations),
            ("database.menu_customizations", &self.database.menu_customizations),
            ("storage.bucket_id", &self.storage.bucket_id),
        ];
        if let Some((name, _)) = ids.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(BackendError::InvalidConfig(format!("{} must not be empty", name)));
        }

        Ok(())
    }

    /// Applies `FOODIE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("FOODIE_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding endpoint from environment");
            self.project.endpoint = endpoint;
        }

        if let Some(id) = lookup("FOODIE_PROJECT_ID") {
            debug!(project_id = %id, "Overriding project id from environment");
            self.project.id = id;
        }

        if let Some(platform) = lookup("FOODIE_PLATFORM") {
            self.project.platform = platform;
        }

        if let Some(id) = lookup("FOODIE_DATABASE_ID") {
            debug!(database_id = %id, "Overriding database id from environment");
            self.database.id = id;
        }

        if let Some(bucket) = lookup("FOODIE_BUCKET_ID") {
            self.storage.bucket_id = bucket;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "foodie", "storefront")
            .map(|dirs| dirs.config_dir().join("backend.toml"))
    }

    // =========================================================================
    // URL Builders
    // =========================================================================

    /// URL of a generated initials avatar for `name` (256×256).
    pub fn initials_avatar_url(&self, name: &str) -> BackendResult<String> {
        self.api_url(
            "avatars/initials",
            &[("name", name), ("width", "256"), ("height", "256")],
        )
    }

    /// Public view URL of a stored file.
    pub fn file_view_url(&self, bucket_id: &str, file_id: &str) -> BackendResult<String> {
        self.api_url(
            &format!("storage/buckets/{}/files/{}/view", bucket_id, file_id),
            &[],
        )
    }

    fn api_url(&self, path: &str, params: &[(&str, &str)]) -> BackendResult<String> {
        let base = format!("{}/{}", self.project.endpoint.trim_end_matches('/'), path);
        let mut url = Url::parse(&base).map_err(|e| BackendError::InvalidConfig(e.to_string()))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("project", &self.project.id);
        Ok(url.into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = BackendConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.menu, "menu");
        assert_eq!(config.storage.bucket_id, "menu-images");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: BackendConfig = toml::from_str(
            r#"
            [project]
            endpoint = "https://backend.example.com/v1"
            id = "foodie-prod"

            [database]
            menu = "dishes"
            "#,
        )
        .unwrap();

        assert_eq!(config.project.id, "foodie-prod");
        assert_eq!(config.project.platform, "com.foodie.storefront");
        assert_eq!(config.database.menu, "dishes");
        assert_eq!(config.database.users, "users");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FOODIE_ENDPOINT", "https://eu.backend.example.com/v1"),
            ("FOODIE_BUCKET_ID", "images-eu"),
        ]
        .into_iter()
        .collect();

        let mut config = BackendConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.project.endpoint, "https://eu.backend.example.com/v1");
        assert_eq!(config.storage.bucket_id, "images-eu");
        assert_eq!(config.project.id, "foodie-dev");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BackendConfig::default();
        config.project.endpoint = "ftp://backend.example.com".to_string();
        assert!(matches!(config.validate(), Err(BackendError::InvalidConfig(_))));

        let mut config = BackendConfig::default();
        config.database.menu = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.menu"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("foodie-{}.toml", uuid::Uuid::new_v4()));
        let mut config = BackendConfig::default();
        config.project.endpoint = "https://backend.example.com/v1".to_string();

        config.save(Some(path.clone())).unwrap();
        let loaded: BackendConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_url_builders() {
        let mut config = BackendConfig::default();
        config.project.endpoint = "https://backend.example.com/v1/".to_string();

        let avatar = config.initials_avatar_url("Ada Lovelace").unwrap();
        assert_eq!(
            avatar,
            "https://backend.example.com/v1/avatars/initials?name=Ada+Lovelace&width=256&height=256&project=foodie-dev"
        );

        let view = config.file_view_url("menu-images", "file-1").unwrap();
        assert_eq!(
            view,
            "https://backend.example.com/v1/storage/buckets/menu-images/files/file-1/view?project=foodie-dev"
        );
    }
}
