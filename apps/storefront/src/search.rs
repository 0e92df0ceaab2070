//! # Menu Search Controller
//!
//! Owns the search screen's current category and query, and refetches the
//! menu whenever either changes.
//!
//! ```text
//! set_category("cat-pizzas") ──┐
//!                              ├──► MenuQuery { category, query, limit } ──► menu.refetch(..)
//! set_query("pepperoni") ──────┘
//! ```
//!
//! Overlapping changes are safe: the menu fetcher keeps only the response
//! of the latest call.

use std::sync::{Mutex, PoisonError};

use foodie_backend::Catalog;
use foodie_core::{Category, MenuItem, MenuQuery};

use crate::fetch::{FetchOptions, FetchState, Fetcher};
use crate::state::StorefrontConfig;

/// Category value that lists every category.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default)]
struct SearchParams {
    category: Option<String>,
    query: Option<String>,
}

/// Search screen state: categories, current filters and matching dishes.
pub struct MenuSearch {
    params: Mutex<SearchParams>,
    limit: u32,
    menu: Fetcher<Vec<MenuItem>, MenuQuery>,
    categories: Fetcher<Vec<Category>, ()>,
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_CATEGORIES))
        .map(str::to_string)
}

impl MenuSearch {
    /// Mounts the screen with its initial filters and loads both lists.
    pub async fn mount(
        catalog: Catalog,
        config: &StorefrontConfig,
        category: Option<&str>,
        query: Option<&str>,
    ) -> Self {
        let params = SearchParams {
            category: normalize(category),
            query: query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_string),
        };
        let initial = to_query(&params, config.menu_limit);

        let menu_catalog = catalog.clone();
        let menu = Fetcher::mount(
            move |query: MenuQuery| {
                let catalog = menu_catalog.clone();
                async move { catalog.get_menu(&query).await }
            },
            FetchOptions::with_params(initial),
        )
        .await;

        let categories = Fetcher::mount(
            move |_: ()| {
                let catalog = catalog.clone();
                async move { catalog.get_categories().await }
            },
            FetchOptions::default(),
        )
        .await;

        MenuSearch {
            params: Mutex::new(params),
            limit: config.menu_limit,
            menu,
            categories,
        }
    }

    /// Selects a category; `None`, empty or `"all"` clears the filter.
    pub async fn set_category(&self, category: Option<&str>) {
        let query = self.update(|params| params.category = normalize(category));
        self.menu.refetch(Some(query)).await;
    }

    /// Sets the free-text query; blank clears it.
    pub async fn set_query(&self, query: &str) {
        let trimmed = query.trim();
        let text = (!trimmed.is_empty()).then(|| trimmed.to_string());
        let query = self.update(|params| params.query = text);
        self.menu.refetch(Some(query)).await;
    }

    fn update(&self, f: impl FnOnce(&mut SearchParams)) -> MenuQuery {
        let mut params = self.params.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut params);
        to_query(&params, self.limit)
    }

    /// The query the menu list currently reflects.
    pub fn current_query(&self) -> MenuQuery {
        let params = self.params.lock().unwrap_or_else(PoisonError::into_inner);
        to_query(&params, self.limit)
    }

    pub fn menu(&self) -> FetchState<Vec<MenuItem>> {
        self.menu.state()
    }

    pub fn categories(&self) -> FetchState<Vec<Category>> {
        self.categories.state()
    }

    /// Re-runs the menu listing with the current filters.
    pub async fn reload(&self) {
        self.menu.refetch(Some(self.current_query())).await;
    }

    /// Stops in-flight listings from landing after the screen is gone.
    pub fn unmount(&self) {
        self.menu.invalidate();
        self.categories.invalidate();
    }
}

fn to_query(params: &SearchParams, limit: u32) -> MenuQuery {
    MenuQuery {
        category: params.category.clone(),
        query: params.query.clone(),
        limit: Some(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodie_backend::{BackendConfig, MemoryBackend, SeedData, Seeder};
    use std::sync::Arc;

    const SEED: &str = r#"{
        "categories": [{ "name": "Burgers" }, { "name": "Pizzas" }],
        "customizations": [],
        "menu": [
            { "name": "Classic Cheeseburger", "image_url": "https://cdn.example.com/a.png",
              "price": 25.99, "category_name": "Burgers" },
            { "name": "Bacon Burger", "image_url": "https://cdn.example.com/b.png",
              "price": 27.5, "category_name": "Burgers" },
            { "name": "Pepperoni Pizza", "image_url": "https://cdn.example.com/c.png",
              "price": 30.99, "category_name": "Pizzas" }
        ]
    }"#;

    async fn seeded_catalog() -> (Arc<MemoryBackend>, Catalog) {
        let config = Arc::new(BackendConfig::default());
        let backend = Arc::new(MemoryBackend::new((*config).clone()));
        Seeder::new(backend.clone(), backend.clone(), config.clone())
            .seed(&SeedData::from_json(SEED).unwrap())
            .await
            .unwrap();
        (backend.clone(), Catalog::new(backend, config))
    }

    fn names(state: &FetchState<Vec<MenuItem>>) -> Vec<String> {
        state
            .data
            .as_ref()
            .map(|items| items.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_mount_loads_menu_and_categories() {
        let (_, catalog) = seeded_catalog().await;
        let search =
            MenuSearch::mount(catalog, &StorefrontConfig::default(), Some("all"), None).await;

        assert_eq!(search.menu().data.map(|m| m.len()), Some(3));
        assert_eq!(search.categories().data.map(|c| c.len()), Some(2));
        assert_eq!(search.current_query().category, None);
        assert_eq!(search.current_query().limit, Some(6));
    }

    #[tokio::test]
    async fn test_filters_refetch() {
        let (_, catalog) = seeded_catalog().await;
        let search = MenuSearch::mount(catalog, &StorefrontConfig::default(), None, None).await;

        let pizzas = search
            .categories()
            .data
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Pizzas")
            .unwrap();

        search.set_category(Some(pizzas.id.as_str())).await;
        assert_eq!(names(&search.menu()), vec!["Pepperoni Pizza"]);

        search.set_category(Some("all")).await;
        search.set_query("burger").await;
        assert_eq!(
            names(&search.menu()),
            vec!["Classic Cheeseburger", "Bacon Burger"]
        );

        search.set_query("   ").await;
        assert_eq!(search.current_query().query, None);
        assert_eq!(names(&search.menu()).len(), 3);
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_last_menu() {
        let (backend, catalog) = seeded_catalog().await;
        let search = MenuSearch::mount(catalog, &StorefrontConfig::default(), None, None).await;

        backend.set_offline(true);
        search.set_query("pizza").await;

        let menu = search.menu();
        assert_eq!(names(&menu).len(), 3);
        assert!(menu.error.is_some());
        assert!(!menu.loading);

        backend.set_offline(false);
        search.reload().await;
        assert_eq!(names(&search.menu()), vec!["Pepperoni Pizza"]);
        assert!(search.menu().error.is_none());
    }
}
