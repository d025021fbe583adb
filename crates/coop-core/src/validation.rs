//! # Validation Module
//!
//! Input rules checked by the repositories before any statement runs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin console forms (TypeScript)                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository call (Rust)                                       │
//! │  └── THIS MODULE: names, prices, counts, variant batches               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── Partial UNIQUE indexes on live names                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use coop_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("product_name", "Brown Rice 5kg").unwrap();
//! validate_quantity(3).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{
    CategoryUpdate, NewCategory, NewProduct, NewVariant, ProductUpdate, VariantIdentity,
    VariantPatch,
};
use crate::{MAX_NAME_LEN, MAX_STOCK_ADJUSTMENT, MAX_VARIANTS_PER_PRODUCT};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product, display, category or variant name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates that an uploaded image is present.
pub fn validate_image(field: &str, bytes: &[u8]) -> ValidationResult<()> {
    if bytes.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stored stock count (initial stock, variant stock).
pub fn validate_stock_count(field: &str, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the quantity of a stock or sold-count adjustment.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_STOCK_ADJUSTMENT`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_STOCK_ADJUSTMENT {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_STOCK_ADJUSTMENT,
        });
    }

    Ok(())
}

/// Validates an absolute stock value for the `set` operation.
///
/// Same rule as a stored stock count, so any count a product was created
/// with can be set again.
pub fn validate_absolute_stock(qty: i64) -> ValidationResult<()> {
    validate_stock_count("quantity", qty)
}

// =============================================================================
// Entity Validators
// =============================================================================

pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_name("category_name", &category.category_name)?;
    validate_image("category_image", &category.category_image)
}

pub fn validate_category_update(update: &CategoryUpdate) -> ValidationResult<()> {
    validate_name("category_name", &update.category_name)?;
    if let Some(image) = &update.category_image {
        validate_image("category_image", image)?;
    }
    Ok(())
}

pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name("product_name", &product.product_name)?;
    validate_name("display_name", &product.display_name)?;
    validate_price_cents("display_price", product.display_price)?;
    validate_stock_count("product_stocks", product.product_stocks)?;
    validate_image("display_image", &product.display_image)
}

pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    validate_name("display_name", &update.display_name)?;
    validate_price_cents("display_price", update.display_price)?;
    if let Some(image) = &update.display_image {
        validate_image("display_image", image)?;
    }
    Ok(())
}

pub fn validate_new_variant(variant: &NewVariant) -> ValidationResult<()> {
    validate_name("variant_name", &variant.variant_name)?;
    validate_price_cents("variant_price", variant.variant_price)?;
    validate_stock_count("variant_stocks", variant.variant_stocks)
}

/// Validates a batch of new variants for replace-all or append.
pub fn validate_variant_batch(variants: &[NewVariant]) -> ValidationResult<()> {
    if variants.len() > MAX_VARIANTS_PER_PRODUCT {
        return Err(ValidationError::TooMany {
            field: "variants".to_string(),
            max: MAX_VARIANTS_PER_PRODUCT,
        });
    }
    variants.iter().try_for_each(validate_new_variant)
}

/// Validates an update batch.
///
/// Every entry must carry both identity fields or neither. A single
/// half-identified entry rejects the whole batch.
pub fn validate_patch_batch(patches: &[VariantPatch]) -> ValidationResult<()> {
    if patches.len() > MAX_VARIANTS_PER_PRODUCT {
        return Err(ValidationError::TooMany {
            field: "variants".to_string(),
            max: MAX_VARIANTS_PER_PRODUCT,
        });
    }

    for (position, patch) in patches.iter().enumerate() {
        if patch.identity() == VariantIdentity::Partial {
            return Err(ValidationError::PartialVariantIdentity { position });
        }
        validate_new_variant(&patch.to_new_variant())?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;

    fn new_variant(name: &str, price: i64) -> NewVariant {
        NewVariant {
            variant_name: name.to_string(),
            variant_symbol: "pc".to_string(),
            variant_price: price,
            variant_stocks: 1,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("product_name", "Brown Rice").is_ok());
        assert!(validate_name("product_name", "").is_err());
        assert!(validate_name("product_name", "   ").is_err());
        assert!(validate_name("product_name", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_STOCK_ADJUSTMENT).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_STOCK_ADJUSTMENT + 1).is_err());
    }

    #[test]
    fn test_validate_absolute_stock_allows_zero() {
        assert!(validate_absolute_stock(0).is_ok());
        assert!(validate_absolute_stock(-1).is_err());
    }

    #[test]
    fn test_absolute_stock_accepts_any_creatable_count() {
        let large = MAX_STOCK_ADJUSTMENT * 3 / 2;
        assert!(validate_stock_count("product_stocks", large).is_ok());
        assert!(validate_absolute_stock(large).is_ok());
        assert!(validate_quantity(large).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut product = NewProduct {
            category_id: 1,
            product_name: "rice-5kg".to_string(),
            display_name: "Rice 5kg".to_string(),
            display_price: 25000,
            product_stocks: 10,
            product_description: String::new(),
            status: ProductStatus::Active,
            is_featured: false,
            display_image: vec![1, 2, 3],
        };
        assert!(validate_new_product(&product).is_ok());

        product.display_image.clear();
        assert_eq!(
            validate_new_product(&product),
            Err(ValidationError::Required {
                field: "display_image".to_string()
            })
        );
    }

    #[test]
    fn test_validate_variant_batch() {
        assert!(validate_variant_batch(&[]).is_ok());
        assert!(validate_variant_batch(&[new_variant("Small", 100)]).is_ok());
        assert!(validate_variant_batch(&[new_variant("Small", -1)]).is_err());

        let too_many = vec![new_variant("x", 1); MAX_VARIANTS_PER_PRODUCT + 1];
        assert!(matches!(
            validate_variant_batch(&too_many),
            Err(ValidationError::TooMany { .. })
        ));
    }

    #[test]
    fn test_validate_patch_batch_rejects_partial_identity() {
        let full = VariantPatch {
            id: Some(4),
            variant_id: Some(1),
            variant_name: "Small".to_string(),
            variant_symbol: "S".to_string(),
            variant_price: 100,
            variant_stocks: 2,
        };
        let half = VariantPatch {
            variant_id: None,
            ..full.clone()
        };

        assert!(validate_patch_batch(std::slice::from_ref(&full)).is_ok());
        assert_eq!(
            validate_patch_batch(&[full, half]),
            Err(ValidationError::PartialVariantIdentity { position: 1 })
        );
    }
}
