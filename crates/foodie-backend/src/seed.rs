//! # Catalog Seeder
//!
//! Replaces the whole catalog with the contents of a seed file.
//!
//! ## Seeding Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0. check the seed data (prices, category names) before touching data  │
//! │  1. clear categories, customizations, menu, menu_customizations        │
//! │     and every file in the image bucket                                 │
//! │  2. create categories          name → id                               │
//! │  3. create customizations      name → id                               │
//! │  4. for each dish:                                                     │
//! │       upload image → view URL                                          │
//! │       create menu row (category resolved by name)                      │
//! │       create one menu_customizations row per named customization       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Seed File Format
//! ```json
//! {
//!   "categories": [{ "name": "Burgers", "description": "Juicy grilled burgers" }],
//!   "customizations": [{ "name": "Extra Cheese", "price": 1.25, "type": "topping" }],
//!   "menu": [{
//!     "name": "Classic Cheeseburger",
//!     "description": "Beef patty, cheese, lettuce",
//!     "image_url": "https://cdn.example.com/burger.png",
//!     "price": 25.99, "rating": 4.5, "calories": 550, "protein": 25,
//!     "category_name": "Burgers",
//!     "customizations": ["Extra Cheese"]
//!   }]
//! }
//! ```

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use foodie_core::money;
use foodie_core::validation::{validate_customization_price, validate_item_price};
use foodie_core::{Category, Customization, CustomizationKind, MenuCustomizationLink, MenuItem, Money};

use crate::config::BackendConfig;
use crate::contracts::{to_row_data, unique_id, DocumentStore, FileStore, FileUpload};
use crate::error::{BackendError, BackendResult};

// =============================================================================
// Seed Data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCustomization {
    pub name: String,
    #[serde(with = "money::major_units")]
    pub price: Money,
    #[serde(rename = "type")]
    pub kind: CustomizationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Source image; re-hosted in the bucket during seeding.
    pub image_url: String,
    #[serde(with = "money::major_units")]
    pub price: Money,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein: u32,
    pub category_name: String,
    /// Customization names.
    #[serde(default)]
    pub customizations: Vec<String>,
}

/// Full catalog to import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub customizations: Vec<SeedCustomization>,
    #[serde(default)]
    pub menu: Vec<SeedMenuItem>,
}

impl SeedData {
    /// Parses a seed file.
    pub fn from_json(json: &str) -> BackendResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks prices and category references.
    pub fn validate(&self) -> BackendResult<()> {
        let categories: HashSet<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();

        for cus in &self.customizations {
            validate_customization_price(cus.price)?;
        }
        for item in &self.menu {
            validate_item_price(item.price)?;
            if !categories.contains(item.category_name.as_str()) {
                return Err(BackendError::InvalidDocument(format!(
                    "menu item '{}' references unknown category '{}'",
                    item.name, item.category_name
                )));
            }
        }

        Ok(())
    }
}

/// What a seeding run created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub rows_cleared: usize,
    pub files_cleared: usize,
    pub categories: usize,
    pub customizations: usize,
    pub menu_items: usize,
    pub links: usize,
    pub files_uploaded: usize,
    /// Customization names a dish listed but the seed data did not define.
    pub skipped_links: usize,
}

// =============================================================================
// Seeder
// =============================================================================

/// Resets and imports the catalog.
pub struct Seeder {
    store: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    config: Arc<BackendConfig>,
}

impl Seeder {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
        config: Arc<BackendConfig>,
    ) -> Self {
        Seeder {
            store,
            files,
            config,
        }
    }

    /// Replaces the catalog with `data`.
    ///
    /// Fails before deleting anything if `data` does not validate. A failure
    /// part-way through leaves a partially seeded catalog; run it again.
    pub async fn seed(&self, data: &SeedData) -> BackendResult<SeedReport> {
        data.validate()?;
        let mut report = SeedReport::default();

        info!("Clearing existing catalog");
        for table in self.config.database.catalog_tables() {
            report.rows_cleared += self.clear_table(table).await?;
        }
        report.files_cleared = self.clear_bucket().await?;

        let db = &self.config.database;

        info!(count = data.categories.len(), "Creating categories");
        let mut category_ids = HashMap::with_capacity(data.categories.len());
        for cat in &data.categories {
            let category = Category {
                id: unique_id(),
                name: cat.name.clone(),
                description: cat.description.clone(),
            };
            self.store
                .create_row(&db.id, &db.categories, &category.id, to_row_data(&category)?)
                .await?;
            category_ids.insert(cat.name.as_str(), category.id);
            report.categories += 1;
        }

        info!(count = data.customizations.len(), "Creating customizations");
        let mut customization_ids = HashMap::with_capacity(data.customizations.len());
        for cus in &data.customizations {
            let customization = Customization {
                id: unique_id(),
                name: cus.name.clone(),
                price: cus.price,
                kind: cus.kind.clone(),
            };
            self.store
                .create_row(
                    &db.id,
                    &db.customizations,
                    &customization.id,
                    to_row_data(&customization)?,
                )
                .await?;
            customization_ids.insert(cus.name.as_str(), customization.id);
            report.customizations += 1;
        }

        info!(count = data.menu.len(), "Creating menu items");
        for item in &data.menu {
            let category_id = category_ids
                .get(item.category_name.as_str())
                .cloned()
                .ok_or_else(|| BackendError::not_found(&db.categories, &item.category_name))?;

            let image_url = self.upload_image(&item.image_url).await?;
            report.files_uploaded += 1;

            let menu = MenuItem {
                id: unique_id(),
                name: item.name.clone(),
                description: item.description.clone(),
                image_url,
                price: item.price,
                rating: item.rating,
                calories: item.calories,
                protein: item.protein,
                category_id,
            };
            self.store
                .create_row(&db.id, &db.menu, &menu.id, to_row_data(&menu)?)
                .await?;
            report.menu_items += 1;
            debug!(menu_id = %menu.id, name = %menu.name, "Menu item created");

            for cus_name in &item.customizations {
                let Some(customization_id) = customization_ids.get(cus_name.as_str()) else {
                    warn!(
                        menu = %item.name,
                        customization = %cus_name,
                        "Unknown customization, skipping link"
                    );
                    report.skipped_links += 1;
                    continue;
                };

                let link = MenuCustomizationLink {
                    id: unique_id(),
                    menu: menu.id.clone(),
                    customization_id: customization_id.clone(),
                };
                self.store
                    .create_row(&db.id, &db.menu_customizations, &link.id, to_row_data(&link)?)
                    .await?;
                report.links += 1;
            }
        }

        info!(?report, "Seeding complete");
        Ok(report)
    }

    async fn clear_table(&self, table_id: &str) -> BackendResult<usize> {
        let db_id = &self.config.database.id;
        let rows = self.store.list_rows(db_id, table_id, &[]).await?;

        try_join_all(
            rows.iter()
                .map(|row| self.store.delete_row(db_id, table_id, &row.id)),
        )
        .await?;

        debug!(table_id, count = rows.len(), "Table cleared");
        Ok(rows.len())
    }

    async fn clear_bucket(&self) -> BackendResult<usize> {
        let bucket_id = &self.config.storage.bucket_id;
        let files = self.files.list_files(bucket_id).await?;

        try_join_all(
            files
                .iter()
                .map(|file| self.files.delete_file(bucket_id, &file.id)),
        )
        .await?;

        debug!(bucket_id = %bucket_id, count = files.len(), "Bucket cleared");
        Ok(files.len())
    }

    async fn upload_image(&self, image_url: &str) -> BackendResult<String> {
        let bucket_id = &self.config.storage.bucket_id;
        let upload = FileUpload::image_from_url(image_url);
        debug!(image_url, name = %upload.name, "Uploading image");

        let file = self
            .files
            .create_file(bucket_id, &unique_id(), upload)
            .await?;
        self.files.file_view_url(bucket_id, &file.id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
