//! # Repository Module
//!
//! Database repository implementations for the coop catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list(Some("Grains"), true)                      │
//! │       ▼                                                                 │
//! │  ProductRepository ──────┬──► VariantRepository (detail merge)         │
//! │  ├── create / update     └──► AlbumRepository   (detail merge)         │
//! │  ├── list / get_by_id                                                  │
//! │  └── adjust_stock / adjust_sold                                        │
//! │       │                                                                 │
//! │       │  crate::queries::product::*                                    │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Binary columns stay `Vec<u8>` in private row structs; only the
//! conversion into a `coop_core` type base64-encodes them.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD, listings, counters
//! - [`VariantRepository`] - Variant batches and variant stock
//! - [`CategoryRepository`] - Category CRUD
//! - [`AlbumRepository`] - Product album photos

pub mod album;
pub mod category;
pub mod product;
pub mod variant;

pub use album::AlbumRepository;
pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use variant::VariantRepository;
