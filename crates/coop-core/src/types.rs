//! # Domain Types
//!
//! Catalog types shared by the data-access layer and its callers.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │ 1 │    Product      │ 1 │    Variant      │       │
//! │  │  ─────────────  │──►│  ─────────────  │──►│  ─────────────  │       │
//! │  │  category_id    │ * │  product_id     │ * │  id (db)        │       │
//! │  │  category_name  │   │  product_name   │   │  variant_id (#) │       │
//! │  │  category_image │   │  display_price  │   │  variant_stocks │       │
//! │  └─────────────────┘   │  product_stocks │   └─────────────────┘       │
//! │                        │  status         │                              │
//! │                        └────────┬────────┘   ┌─────────────────┐       │
//! │                                 │ 1        * │  ProductAlbum   │       │
//! │                                 └───────────►│  product_photo  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read vs Write Shapes
//! Write inputs (`NewProduct`, `NewCategory`, ...) carry raw image bytes.
//! Read outputs (`ProductListing`, `Category`, ...) carry base64 text.
//!
//! All prices are integer cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Create Outcome
// =============================================================================

/// Result of a create call guarded by a unique-name check.
///
/// ## Outcomes
/// ```text
/// create(name = "Rice 5kg")
///      │
///      ├── name free      → Created(record)
///      ├── name taken     → Conflict        (nothing inserted)
///      └── database error → Err(DbError)    (not an outcome)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum CreateOutcome<T> {
    /// The record was inserted.
    Created(T),
    /// A non-deleted record with the same name already exists.
    Conflict,
}

impl<T> CreateOutcome<T> {
    /// Returns true when the name was already taken.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CreateOutcome::Conflict)
    }

    /// Returns the created record, if any.
    pub fn created(self) -> Option<T> {
        match self {
            CreateOutcome::Created(value) => Some(value),
            CreateOutcome::Conflict => None,
        }
    }
}

// =============================================================================
// Product Status
// =============================================================================

/// Storefront visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Shown on the storefront.
    #[default]
    Active,
    /// Hidden from the storefront, still visible in the admin console.
    Inactive,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["active".into(), "inactive".into()],
            }),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    /// Base64 of the stored image bytes.
    pub category_image: String,
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub category_name: String,
    pub category_image: Vec<u8>,
}

/// Input for updating a category.
///
/// `category_image: None` keeps the current image.
#[derive(Debug, Clone)]
pub struct CategoryUpdate {
    pub category_name: String,
    pub category_image: Option<Vec<u8>>,
}

/// Soft-deleted category, as listed in the admin trash view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DeletedCategory {
    pub category_id: i64,
    pub category_name: String,
}

// =============================================================================
// Product
// =============================================================================

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: i64,
    /// Internal unique name, used for duplicate detection.
    pub product_name: String,
    /// Name shown on the storefront.
    pub display_name: String,
    pub display_price: i64,
    pub product_stocks: i64,
    pub product_description: String,
    pub status: ProductStatus,
    pub is_featured: bool,
    /// Raw image bytes.
    pub display_image: Vec<u8>,
}

/// Summary returned by a successful product create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatedProduct {
    pub product_id: i64,
    pub product_name: String,
    pub display_name: String,
    pub display_price: i64,
    pub status: ProductStatus,
    #[serde(rename = "isFeatured")]
    pub is_featured: bool,
    pub product_stocks: i64,
    pub product_description: String,
    /// Base64 of the submitted image bytes.
    pub display_image: String,
}

/// Input for updating a product's display fields.
///
/// `display_image: None` keeps the current image.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub category_id: i64,
    pub display_name: String,
    pub display_price: i64,
    pub product_description: String,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub display_image: Option<Vec<u8>>,
}

/// The subset of fields a product update wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdateSummary {
    pub product_id: i64,
    pub display_name: String,
    pub display_price: i64,
    pub product_description: String,
    pub status: ProductStatus,
    #[serde(rename = "isFeatured")]
    pub is_featured: bool,
}

/// Product row without images or joins (name lookups, trash view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductRecord {
    pub product_id: i64,
    pub category_id: i64,
    pub product_name: String,
    pub display_name: String,
    pub display_price: i64,
    pub product_stocks: i64,
    pub product_sold: i64,
    pub product_description: String,
    pub status: ProductStatus,
    #[serde(rename = "isFeatured")]
    pub is_featured: bool,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
    #[ts(as = "String")]
    pub date_created: DateTime<Utc>,
}

/// Product row joined with its category, images base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductListing {
    pub product_id: i64,
    pub product_name: String,
    pub display_name: String,
    pub display_price: i64,
    pub product_stocks: i64,
    pub product_sold: i64,
    pub product_description: String,
    pub status: ProductStatus,
    #[serde(rename = "isFeatured")]
    pub is_featured: bool,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
    #[ts(as = "String")]
    pub date_created: DateTime<Utc>,
    pub display_image: String,
    pub category_id: i64,
    pub category_name: String,
    pub category_image: String,
}

/// A product with its variants and album merged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductListing,
    pub albums: Vec<ProductAlbum>,
    pub variants: Vec<Variant>,
}

/// Reduced projection used by the storefront's featured carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeaturedProduct {
    pub product_name: String,
    pub product_id: i64,
    pub display_price: i64,
    pub display_image: String,
}

// =============================================================================
// Product Album
// =============================================================================

/// A photo in a product's album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductAlbum {
    pub photo_id: i64,
    pub product_id: i64,
    /// Base64 of the stored photo bytes.
    pub product_photo: String,
}

// =============================================================================
// Variant
// =============================================================================

/// A stored variant (sub-SKU) of a product.
///
/// ## Dual Identity
/// - `id`: database-assigned, unique across all products
/// - `variant_id`: 1-based position within its product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Variant {
    pub id: i64,
    pub variant_id: i64,
    pub product_id: i64,
    pub variant_name: String,
    pub variant_symbol: String,
    pub variant_price: i64,
    pub variant_stocks: i64,
}

/// Variant fields supplied on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVariant {
    pub variant_name: String,
    pub variant_symbol: String,
    pub variant_price: i64,
    pub variant_stocks: i64,
}

/// Variant entry of an update batch.
///
/// Identity fields decide what happens to the entry, see
/// [`VariantPatch::identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub variant_id: Option<i64>,
    pub variant_name: String,
    pub variant_symbol: String,
    pub variant_price: i64,
    pub variant_stocks: i64,
}

/// How a [`VariantPatch`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantIdentity {
    /// No identity fields: append as a new variant.
    New,
    /// Both identity fields: update in place.
    Existing { id: i64, variant_id: i64 },
    /// Exactly one identity field: ambiguous, rejected.
    Partial,
}

impl VariantPatch {
    pub fn identity(&self) -> VariantIdentity {
        match (self.id, self.variant_id) {
            (None, None) => VariantIdentity::New,
            (Some(id), Some(variant_id)) => VariantIdentity::Existing { id, variant_id },
            _ => VariantIdentity::Partial,
        }
    }

    /// Strips identity, leaving the writable fields.
    pub fn to_new_variant(&self) -> NewVariant {
        NewVariant {
            variant_name: self.variant_name.clone(),
            variant_symbol: self.variant_symbol.clone(),
            variant_price: self.variant_price,
            variant_stocks: self.variant_stocks,
        }
    }
}

/// What a variant update batch did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantUpdateReport {
    /// Variants appended from entries without identity.
    pub created: Vec<Variant>,
    /// Number of existing variants rewritten.
    pub updated: usize,
    /// `variant_id`s that matched no row of the product.
    pub unmatched: Vec<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(id: Option<i64>, variant_id: Option<i64>) -> VariantPatch {
        VariantPatch {
            id,
            variant_id,
            variant_name: "1kg".to_string(),
            variant_symbol: "kg".to_string(),
            variant_price: 12000,
            variant_stocks: 4,
        }
    }

    #[test]
    fn test_variant_identity() {
        assert_eq!(patch(None, None).identity(), VariantIdentity::New);
        assert_eq!(
            patch(Some(9), Some(2)).identity(),
            VariantIdentity::Existing { id: 9, variant_id: 2 }
        );
        assert_eq!(patch(Some(9), None).identity(), VariantIdentity::Partial);
        assert_eq!(patch(None, Some(2)).identity(), VariantIdentity::Partial);
    }

    #[test]
    fn test_variant_patch_deserializes_without_identity() {
        let json = r#"{"variant_name":"500g","variant_symbol":"g","variant_price":6500,"variant_stocks":10}"#;
        let parsed: VariantPatch = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.identity(), VariantIdentity::New);
        assert_eq!(parsed.to_new_variant().variant_name, "500g");
    }

    #[test]
    fn test_product_status_parsing() {
        assert_eq!("Active".parse::<ProductStatus>().unwrap(), ProductStatus::Active);
        assert_eq!("inactive".parse::<ProductStatus>().unwrap(), ProductStatus::Inactive);
        assert!("archived".parse::<ProductStatus>().is_err());
        assert_eq!(ProductStatus::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_create_outcome_serialization() {
        let created: CreateOutcome<DeletedCategory> = CreateOutcome::Created(DeletedCategory {
            category_id: 3,
            category_name: "Snacks".to_string(),
        });
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["outcome"], "created");
        assert_eq!(json["data"]["category_id"], 3);

        let conflict: CreateOutcome<DeletedCategory> = CreateOutcome::Conflict;
        assert!(conflict.is_conflict());
        assert_eq!(serde_json::to_value(&conflict).unwrap()["outcome"], "conflict");
        assert_eq!(conflict.created(), None);
    }

    #[test]
    fn test_flags_keep_frontend_names() {
        let summary = ProductUpdateSummary {
            product_id: 1,
            display_name: "Rice".to_string(),
            display_price: 5000,
            product_description: String::new(),
            status: ProductStatus::Active,
            is_featured: true,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["isFeatured"], true);
        assert_eq!(json["status"], "active");
    }
}
