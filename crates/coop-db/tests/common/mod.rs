//! Shared fixtures for the repository integration tests.
#![allow(dead_code)]

use coop_core::{
    Category, CreateOutcome, CreatedProduct, NewCategory, NewProduct, NewVariant, ProductStatus,
};
use coop_db::{Database, DbConfig};
use tempfile::TempDir;

pub const IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-bytes";

/// Fresh, migrated in-memory database.
pub async fn setup() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Migrated file-backed database with a multi-connection pool, for tests
/// where writers really overlap. Keep the `TempDir` alive for the test.
pub async fn setup_shared() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = DbConfig::new(dir.path().join("coop.db")).max_connections(8);
    let db = Database::new(config).await.expect("file database");
    (dir, db)
}

pub async fn category(db: &Database, name: &str) -> Category {
    db.categories()
        .create(&NewCategory {
            category_name: name.to_string(),
            category_image: IMAGE.to_vec(),
        })
        .await
        .expect("create category")
        .created()
        .expect("category name free")
}

pub fn new_product(category_id: i64, name: &str) -> NewProduct {
    NewProduct {
        category_id,
        product_name: name.to_string(),
        display_name: name.to_string(),
        display_price: 6_500,
        product_stocks: 20,
        product_description: format!("{name} description"),
        status: ProductStatus::Active,
        is_featured: false,
        display_image: IMAGE.to_vec(),
    }
}

pub async fn product(db: &Database, category_id: i64, name: &str) -> CreatedProduct {
    match db
        .products()
        .create(&new_product(category_id, name))
        .await
        .expect("create product")
    {
        CreateOutcome::Created(product) => product,
        CreateOutcome::Conflict => panic!("product name {name} already taken"),
    }
}

pub fn variant(name: &str, stocks: i64) -> NewVariant {
    NewVariant {
        variant_name: name.to_string(),
        variant_symbol: "kg".to_string(),
        variant_price: 6_500,
        variant_stocks: stocks,
    }
}
