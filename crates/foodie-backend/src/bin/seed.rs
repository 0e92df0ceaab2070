//! # Seed Dry Run
//!
//! Imports a seed file into the in-memory backend and prints what a real
//! seeding run would create.
//!
//! ## Usage
//! ```bash
//! # Bundled catalog
//! cargo run -p foodie-backend --bin seed
//!
//! # Custom seed file and backend config
//! cargo run -p foodie-backend --bin seed -- --file ./catalog.json --config ./backend.toml
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use foodie_backend::{BackendConfig, Catalog, MemoryBackend, SeedData, Seeder};
use foodie_core::MenuQuery;
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/seed.json");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    let mut seed_file = PathBuf::from(DEFAULT_SEED_FILE);
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    seed_file = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Foodie Seed Dry Run");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --file <PATH>     Seed file (default: data/seed.json)");
                println!("  -c, --config <PATH>   Backend config file (default: platform config dir)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Foodie Seed Dry Run");
    println!("======================");
    println!("Seed file: {}", seed_file.display());
    println!();

    let config = Arc::new(BackendConfig::load(config_path)?);
    let data = SeedData::from_json(&std::fs::read_to_string(&seed_file)?)?;

    let backend = Arc::new(MemoryBackend::new((*config).clone()));
    let seeder = Seeder::new(backend.clone(), backend.clone(), config.clone());

    let start = std::time::Instant::now();
    let report = seeder.seed(&data).await?;

    println!("✓ Seeded in {:?}", start.elapsed());
    println!("  Categories:      {}", report.categories);
    println!("  Customizations:  {}", report.customizations);
    println!("  Menu items:      {}", report.menu_items);
    println!("  Links:           {}", report.links);
    println!("  Images uploaded: {}", report.files_uploaded);
    if report.skipped_links > 0 {
        println!("⚠ Skipped {} links to unknown customizations", report.skipped_links);
    }

    println!();
    println!("Verifying catalog...");
    let catalog = Catalog::new(backend, config);
    for category in catalog.get_categories().await? {
        let dishes = catalog
            .get_menu(&MenuQuery::default().category(category.id.as_str()))
            .await?;
        println!("  {}: {} dishes", category.name, dishes.len());
    }

    Ok(())
}
