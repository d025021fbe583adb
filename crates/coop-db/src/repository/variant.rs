//! # Variant Repository
//!
//! Database operations for product variants (sizes, weights, flavours).
//!
//! ## Batch Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Variant Batch Operations                          │
//! │                                                                         │
//! │  replace_all(p, [A, B, C])                                             │
//! │    BEGIN IMMEDIATE → DELETE all of p → INSERT A#1, B#2, C#3 → COMMIT   │
//! │                                                                         │
//! │  append(p, [D])            (p already has 3)                           │
//! │    BEGIN IMMEDIATE → COUNT = 3 → INSERT D#4 → COMMIT                   │
//! │                                                                         │
//! │  update(p, [{id, #2, ..}, {.., no identity}])                          │
//! │    BEGIN IMMEDIATE → COUNT → UPDATE #2 → INSERT #4 → COMMIT            │
//! │                                                                         │
//! │  Any failure inside BEGIN..COMMIT drops the transaction, which rolls   │
//! │  back every statement of the batch.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `#n` is the 1-based `variant_id`, the position within the product, unique
//! per product in storage.
//!
//! Every batch takes the write lock up front (`BEGIN IMMEDIATE`). A deferred
//! transaction that reads the count first cannot be upgraded once another
//! writer commits, and SQLite fails it with `SQLITE_BUSY` instead of waiting.
//! With the lock taken at `BEGIN`, concurrent batches queue on the busy
//! timeout and each sees the previous batch's count.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::queries::{counter, variant};
use crate::repository::product::apply_stock_adjustment;
use coop_core::validation::{validate_patch_batch, validate_quantity, validate_variant_batch};
use coop_core::{
    CountOperation, NewVariant, ValidationError, Variant, VariantIdentity, VariantPatch,
    VariantUpdateReport,
};

/// Repository for variant database operations.
#[derive(Debug, Clone)]
pub struct VariantRepository {
    pool: SqlitePool,
}

impl VariantRepository {
    /// Creates a new VariantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VariantRepository { pool }
    }

    /// Opens a transaction holding the database write lock.
    async fn begin_write(&self) -> DbResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Replaces every variant of a product with the given list.
    ///
    /// The new variants get `variant_id` 1..=N in input order. An empty
    /// list leaves the product with no variants.
    pub async fn replace_all(
        &self,
        product_id: i64,
        variants: &[NewVariant],
    ) -> DbResult<Vec<Variant>> {
        validate_variant_batch(variants)?;

        debug!(product_id, count = variants.len(), "Replacing variants");

        let mut tx = self.begin_write().await?;

        let removed = sqlx::query(variant::DELETE_FOR_PRODUCT)
            .bind(product_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let inserted = insert_batch(&mut *tx, product_id, 0, variants).await?;

        tx.commit().await?;

        debug!(product_id, removed, inserted = inserted.len(), "Variants replaced");
        Ok(inserted)
    }

    /// Adds variants after the product's existing ones.
    ///
    /// Indices continue from the current variant count.
    pub async fn append(&self, product_id: i64, variants: &[NewVariant]) -> DbResult<Vec<Variant>> {
        validate_variant_batch(variants)?;

        debug!(product_id, count = variants.len(), "Appending variants");

        let mut tx = self.begin_write().await?;

        let existing: i64 = sqlx::query_scalar(variant::COUNT_FOR_PRODUCT)
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;

        let inserted = insert_batch(&mut *tx, product_id, existing, variants).await?;

        tx.commit().await?;

        Ok(inserted)
    }

    /// Applies a mixed batch of edits and additions.
    ///
    /// ## Per Entry
    /// - no `id` / `variant_id` → appended after the existing variants
    /// - both → the variant with that `variant_id` is rewritten
    /// - only one → the whole batch is rejected before anything is written
    ///
    /// Entries whose `variant_id` matches nothing are listed in
    /// [`VariantUpdateReport::unmatched`]; the rest of the batch still applies.
    pub async fn update(
        &self,
        product_id: i64,
        patches: &[VariantPatch],
    ) -> DbResult<VariantUpdateReport> {
        if let Err(err) = validate_patch_batch(patches) {
            warn!(product_id, error = %err, "Rejected variant batch");
            return Err(err.into());
        }

        debug!(product_id, count = patches.len(), "Updating variants");

        let mut tx = self.begin_write().await?;

        let mut next_index: i64 = sqlx::query_scalar(variant::COUNT_FOR_PRODUCT)
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;

        let mut report = VariantUpdateReport::default();

        for (position, patch) in patches.iter().enumerate() {
            match patch.identity() {
                VariantIdentity::New => {
                    next_index += 1;
                    let new = patch.to_new_variant();
                    report
                        .created
                        .push(insert_one(&mut *tx, product_id, next_index, &new).await?);
                }
                VariantIdentity::Existing { variant_id, .. } => {
                    let result = sqlx::query(variant::UPDATE)
                        .bind(&patch.variant_name)
                        .bind(&patch.variant_symbol)
                        .bind(patch.variant_price)
                        .bind(patch.variant_stocks)
                        .bind(product_id)
                        .bind(variant_id)
                        .execute(&mut *tx)
                        .await?;

                    if result.rows_affected() == 0 {
                        report.unmatched.push(variant_id);
                    } else {
                        report.updated += 1;
                    }
                }
                VariantIdentity::Partial => {
                    return Err(ValidationError::PartialVariantIdentity { position }.into());
                }
            }
        }

        tx.commit().await?;

        if !report.unmatched.is_empty() {
            warn!(product_id, unmatched = ?report.unmatched, "Variant ids not found");
        }

        debug!(
            product_id,
            created = report.created.len(),
            updated = report.updated,
            "Variants updated"
        );
        Ok(report)
    }

    /// Deletes every variant of a product.
    ///
    /// ## Returns
    /// * `Ok(Some(n))` - `n` rows removed
    /// * `Ok(None)` - The product had no variants
    pub async fn delete_for_product(&self, product_id: i64) -> DbResult<Option<u64>> {
        debug!(product_id, "Deleting variants");

        let removed = sqlx::query(variant::DELETE_FOR_PRODUCT)
            .bind(product_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok((removed > 0).then_some(removed))
    }

    /// Gets a variant by its database id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Variant>> {
        let found = sqlx::query_as::<_, Variant>(variant::GET_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found)
    }

    /// Gets a product's variants ordered by `variant_id`.
    pub async fn get_by_product_id(&self, product_id: i64) -> DbResult<Vec<Variant>> {
        let variants = sqlx::query_as::<_, Variant>(variant::GET_BY_PRODUCT_ID)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(variants)
    }

    /// Lists every variant of every product.
    pub async fn list_all(&self) -> DbResult<Vec<Variant>> {
        let variants = sqlx::query_as::<_, Variant>(variant::GET_ALL)
            .fetch_all(&self.pool)
            .await?;

        Ok(variants)
    }

    /// Moves stock of one variant and its product together.
    ///
    /// ```text
    /// adjust_stock("1kg", 7, Subtract, 2)
    ///   BEGIN
    ///     variants.variant_stocks -= 2  WHERE variant_name='1kg' AND product_id=7
    ///     products.product_stocks -= 2  WHERE product_id=7
    ///   COMMIT
    /// ```
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such variant on the product, or no such
    ///   product. Neither counter changes.
    pub async fn adjust_stock(
        &self,
        variant_name: &str,
        product_id: i64,
        operation: CountOperation,
        quantity: i64,
    ) -> DbResult<()> {
        validate_quantity(quantity)?;

        debug!(product_id, variant = %variant_name, %operation, quantity, "Adjusting variant stock");

        let statement = match operation {
            CountOperation::Add => counter::ADD_VARIANT_STOCK,
            CountOperation::Subtract => counter::SUBTRACT_VARIANT_STOCK,
        };

        let mut tx = self.begin_write().await?;

        let result = sqlx::query(statement)
            .bind(quantity)
            .bind(variant_name)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Variant",
                format!("{variant_name} (product {product_id})"),
            ));
        }

        let affected = apply_stock_adjustment(&mut *tx, product_id, operation.into(), quantity).await?;
        if affected == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Inserts `variants` with `variant_id` starting at `offset + 1`.
async fn insert_batch(
    conn: &mut SqliteConnection,
    product_id: i64,
    offset: i64,
    variants: &[NewVariant],
) -> DbResult<Vec<Variant>> {
    let mut inserted = Vec::with_capacity(variants.len());

    for (position, new) in (offset + 1..).zip(variants) {
        inserted.push(insert_one(conn, product_id, position, new).await?);
    }

    Ok(inserted)
}

async fn insert_one(
    conn: &mut SqliteConnection,
    product_id: i64,
    variant_id: i64,
    new: &NewVariant,
) -> DbResult<Variant> {
    let result = sqlx::query(variant::INSERT)
        .bind(variant_id)
        .bind(product_id)
        .bind(&new.variant_name)
        .bind(&new.variant_symbol)
        .bind(new.variant_price)
        .bind(new.variant_stocks)
        .execute(&mut *conn)
        .await?;

    Ok(Variant {
        id: result.last_insert_rowid(),
        variant_id,
        product_id,
        variant_name: new.variant_name.clone(),
        variant_symbol: new.variant_symbol.clone(),
        variant_price: new.variant_price,
        variant_stocks: new.variant_stocks,
    })
}
