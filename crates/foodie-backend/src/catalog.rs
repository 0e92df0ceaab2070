//! # Catalog Service
//!
//! Read-only access to categories, dishes and their customizations.
//!
//! ## Menu Details Join
//! ```text
//! menu row ──categories──► category row
//!    │
//!    └──◄── menu_customizations rows (menu = id) ──customizations──► customization rows
//! ```

use std::sync::Arc;
use tracing::{debug, warn};

use foodie_core::validation::{validate_menu_limit, validate_search_query};
use foodie_core::{Category, Customization, MenuCustomizationLink, MenuDetails, MenuItem, MenuQuery};

use crate::config::BackendConfig;
use crate::contracts::DocumentStore;
use crate::error::{BackendError, BackendResult};
use crate::query::Query;

/// Catalog reads against the configured database.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn DocumentStore>,
    config: Arc<BackendConfig>,
}

impl Catalog {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<BackendConfig>) -> Self {
        Catalog { store, config }
    }

    /// Lists dishes matching `query`.
    ///
    /// ## Filters
    /// - `category`: `Equal("categories", id)`
    /// - `query`: `Search("name", text)`; blank text means no search
    /// - `Limit(limit)`, default 6
    pub async fn get_menu(&self, query: &MenuQuery) -> BackendResult<Vec<MenuItem>> {
        let limit = query.effective_limit();
        validate_menu_limit(limit)?;

        let mut queries = Vec::with_capacity(3);
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            queries.push(Query::equal("categories", category));
        }
        if let Some(text) = query.query.as_deref() {
            let text = validate_search_query(text)?;
            if !text.is_empty() {
                queries.push(Query::search("name", text));
            }
        }
        queries.push(Query::limit(limit));

        debug!(?query, "Listing menu");
        let db = &self.config.database;
        self.store
            .list_rows(&db.id, &db.menu, &queries)
            .await?
            .iter()
            .map(|doc| doc.decode())
            .collect()
    }

    /// Lists every category.
    pub async fn get_categories(&self) -> BackendResult<Vec<Category>> {
        let db = &self.config.database;
        self.store
            .list_rows(&db.id, &db.categories, &[])
            .await?
            .iter()
            .map(|doc| doc.decode())
            .collect()
    }

    /// Loads one dish with its category and linked customizations.
    ///
    /// Links pointing at a customization that no longer exists are skipped.
    pub async fn get_menu_details(&self, menu_id: &str) -> BackendResult<MenuDetails> {
        let db = &self.config.database;

        let menu: MenuItem = self.store.get_row(&db.id, &db.menu, menu_id).await?.decode()?;
        let category: Category = self
            .store
            .get_row(&db.id, &db.categories, &menu.category_id)
            .await?
            .decode()?;

        let links = self
            .store
            .list_rows(
                &db.id,
                &db.menu_customizations,
                &[Query::equal("menu", menu_id)],
            )
            .await?;

        let mut customizations = Vec::with_capacity(links.len());
        for doc in &links {
            let link: MenuCustomizationLink = doc.decode()?;
            match self
                .store
                .get_row(&db.id, &db.customizations, &link.customization_id)
                .await
            {
                Ok(row) => customizations.push(row.decode::<Customization>()?),
                Err(BackendError::NotFound { .. }) => {
                    warn!(
                        menu_id,
                        customization_id = %link.customization_id,
                        "Skipping dangling customization link"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(MenuDetails {
            menu,
            category,
            customizations,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
