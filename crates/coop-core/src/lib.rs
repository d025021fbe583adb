//! # coop-core: Pure Catalog Logic for the Coop Store
//!
//! This crate holds the catalog vocabulary shared by the data-access layer
//! and whatever sits in front of it (HTTP handlers, the admin console, the
//! storefront). It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coop Store Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront + Admin Console (external)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP handlers (external)               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ coop-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ operation │  │   image   │  │ validation│  │   │
//! │  │   │  Product  │  │ Stock ops │  │  base64   │  │   rules   │  │   │
//! │  │   │  Variant  │  │ Sold ops  │  │ transport │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    coop-db (Data-Access Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Variant, Category, ...)
//! - [`operation`] - Stock and sold-count operation selectors
//! - [`image`] - Base64 transport encoding for image columns
//! - [`error`] - Validation error types
//! - [`validation`] - Input rules checked before any write
//!
//! ## Example Usage
//!
//! ```rust
//! use coop_core::operation::StockOperation;
//!
//! // Selectors arrive as strings from the admin console
//! let op: StockOperation = "subtract".parse().unwrap();
//! assert_eq!(op, StockOperation::Subtract);
//! assert!("multiply".parse::<StockOperation>().is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod image;
pub mod operation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use operation::{CountOperation, StockOperation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity a single stock or sold-count adjustment may carry.
pub const MAX_STOCK_ADJUSTMENT: i64 = 100_000;

/// Maximum number of variants a product may carry.
pub const MAX_VARIANTS_PER_PRODUCT: usize = 50;

/// Maximum length of product and category names.
pub const MAX_NAME_LEN: usize = 200;
