//! # Seed Data Generator
//!
//! Populates the catalog with categories, products, variants and album
//! photos for development.
//!
//! ## Usage
//! ```bash
//! # Seed every product in the built-in catalog
//! cargo run -p coop-db --bin seed
//!
//! # Seed only the first 6 products
//! cargo run -p coop-db --bin seed -- --count 6
//!
//! # Specify database path (overrides COOP_DB_PATH)
//! cargo run -p coop-db --bin seed -- --db ./data/coop.db
//! ```
//!
//! Logging follows `RUST_LOG` (default `info,coop=debug,sqlx=warn`).

use std::env;

use coop_core::{CreateOutcome, NewCategory, NewProduct, NewVariant, ProductStatus, StockOperation};
use coop_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Stand-in image: the 8-byte PNG signature is enough for the storefront
/// placeholder renderer.
const PLACEHOLDER_IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// (category, [(product, base price in cents)])
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "Grains",
        &[
            ("Brown Rice", 6_500),
            ("Jasmine Rice", 7_200),
            ("Rolled Oats", 4_800),
            ("Corn Grits", 3_900),
        ],
    ),
    (
        "Snacks",
        &[
            ("Banana Chips", 4_500),
            ("Roasted Peanuts", 3_500),
            ("Cassava Crackers", 2_800),
        ],
    ),
    (
        "Beverages",
        &[
            ("Barako Coffee", 18_000),
            ("Calamansi Juice", 6_000),
            ("Ginger Tea", 9_500),
        ],
    ),
    (
        "Household",
        &[
            ("Coconut Soap", 5_500),
            ("Bamboo Broom", 12_000),
        ],
    ),
];

/// (variant name, symbol, price multiplier in percent)
const SIZES: &[(&str, &str, i64)] = &[("500", "g", 55), ("1", "kg", 100), ("5", "kg", 450)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: Option<usize> = None;
    let mut db_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Coop Store Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to create (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: $COOP_DB_PATH or ./coop.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = DbConfig::from_env()?;
    if let Some(path) = db_path {
        config.database_path = path.into();
    }

    info!(path = %config.database_path.display(), "Seeding catalog");

    let db = Database::new(config).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let limit = count.unwrap_or(usize::MAX);
    let mut created = 0usize;
    let start = std::time::Instant::now();

    'catalog: for (category_name, products) in CATALOG {
        let category = match db
            .categories()
            .create(&NewCategory {
                category_name: category_name.to_string(),
                category_image: PLACEHOLDER_IMAGE.to_vec(),
            })
            .await?
        {
            CreateOutcome::Created(category) => category,
            CreateOutcome::Conflict => match db.categories().get_by_name(category_name).await? {
                Some(category) => category,
                None => continue,
            },
        };

        for (index, (name, base_price)) in products.iter().enumerate() {
            if created >= limit {
                break 'catalog;
            }

            let new_product = NewProduct {
                category_id: category.category_id,
                product_name: name.to_string(),
                display_name: name.to_string(),
                display_price: *base_price,
                product_stocks: 0,
                product_description: format!("{name} from the cooperative's partner farms."),
                status: ProductStatus::Active,
                is_featured: index == 0,
                display_image: PLACEHOLDER_IMAGE.to_vec(),
            };

            let product = match db.products().create(&new_product).await {
                Ok(CreateOutcome::Created(product)) => product,
                Ok(CreateOutcome::Conflict) => {
                    warn!(product = %name, "Product already exists");
                    continue;
                }
                Err(e) => {
                    eprintln!("Failed to insert {}: {}", name, e);
                    continue;
                }
            };

            let variants: Vec<NewVariant> = SIZES
                .iter()
                .enumerate()
                .map(|(size_idx, (amount, symbol, pct))| NewVariant {
                    variant_name: format!("{amount}{symbol}"),
                    variant_symbol: symbol.to_string(),
                    variant_price: base_price * pct / 100,
                    variant_stocks: 10 + ((created + size_idx) % 5) as i64 * 5,
                })
                .collect();

            db.variants()
                .replace_all(product.product_id, &variants)
                .await?;

            let total_stock: i64 = variants.iter().map(|v| v.variant_stocks).sum();
            db.products()
                .adjust_stock(product.product_id, StockOperation::Set, total_stock)
                .await?;

            db.albums()
                .add_photo(product.product_id, PLACEHOLDER_IMAGE)
                .await?;

            created += 1;
        }
    }

    let elapsed = start.elapsed();
    info!(products = created, ?elapsed, "Seed complete");

    let featured = db.products().list_featured().await?;
    println!("Featured products: {}", featured.len());

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,coop=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
