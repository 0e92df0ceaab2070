//! # foodie-backend: Backend-as-a-Service Layer for the Foodie Storefront
//!
//! Everything the storefront asks of its hosted backend goes through this
//! crate: managed auth, the document database and file storage.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Backend Service Layer                            │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │    Catalog     │  │ AccountService │  │        Seeder          │    │
//! │  │                │  │                │  │                        │    │
//! │  │ get_menu       │  │ create_user    │  │ clear tables + bucket  │    │
//! │  │ get_categories │  │ sign_in        │  │ import categories,     │    │
//! │  │ get_menu_      │  │ get_current_   │  │ customizations, menu,  │    │
//! │  │   details      │  │   user, log_out│  │ links, images          │    │
//! │  └───────┬────────┘  └───────┬────────┘  └───────────┬────────────┘    │
//! │          │                   │                       │                  │
//! │          ▼                   ▼                       ▼                  │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   contracts: AuthProvider · DocumentStore · FileStore (async)   │   │
//! │  └───────────────────────────────┬─────────────────────────────────┘   │
//! │                                  │                                      │
//! │            ┌─────────────────────┴───────────────────┐                 │
//! │            ▼                                         ▼                  │
//! │   hosted backend client                     memory::MemoryBackend       │
//! │   (provided by the host app)                (tests, dev, dry runs)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - Endpoint, project, database, tables and bucket
//! - [`contracts`] - Collaborator traits and their record types
//! - [`query`] - Row filters (`Equal`, `Search`, `Limit`)
//! - [`memory`] - In-process implementation of the contracts
//! - [`catalog`] - Menu and category reads
//! - [`account`] - Sign up, sign in, current user, log out
//! - [`seed`] - Catalog reset and import
//! - [`error`] - Backend error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use foodie_backend::{BackendConfig, Catalog, MemoryBackend};
//! use foodie_core::MenuQuery;
//!
//! let config = Arc::new(BackendConfig::load_or_default(None));
//! let backend = Arc::new(MemoryBackend::new((*config).clone()));
//! let catalog = Catalog::new(backend, config);
//!
//! let burgers = catalog.get_menu(&MenuQuery::default().category("cat-burgers")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod catalog;
pub mod config;
pub mod contracts;
pub mod error;
pub mod memory;
pub mod query;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use account::AccountService;
pub use catalog::Catalog;
pub use config::BackendConfig;
pub use contracts::{AuthProvider, Document, DocumentStore, FileStore};
pub use error::{BackendError, BackendResult};
pub use memory::MemoryBackend;
pub use query::Query;
pub use seed::{SeedData, SeedReport, Seeder};
