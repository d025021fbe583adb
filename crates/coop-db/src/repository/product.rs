//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Create with duplicate-name guard
//! - Listing with category join and base64 images
//! - Detail view merging variants and album photos
//! - Stock and sold-count adjustments
//! - Soft delete / restore
//!
//! ## Row Shaping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    products ⋈ categories                               │
//! │                                                                         │
//! │  ListingRow (raw)                       ProductListing (transport)      │
//! │  ────────────────                       ──────────────────────────      │
//! │  display_image:  BLOB  ── base64 ──►    display_image:  "iVBOR..."     │
//! │  category_image: BLOB  ── base64 ──►    category_image: "R0lGO..."     │
//! │  category_name (joined)  ─────────►    category_name                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::queries::{counter, product};
use crate::repository::album::AlbumRepository;
use crate::repository::variant::VariantRepository;
use coop_core::image::encode_image;
use coop_core::validation::{
    validate_absolute_stock, validate_new_product, validate_product_update, validate_image,
    validate_quantity,
};
use coop_core::{
    CountOperation, CreateOutcome, CreatedProduct, FeaturedProduct, NewProduct,
    ProductDetail, ProductListing, ProductRecord, ProductStatus, ProductUpdate,
    ProductUpdateSummary, StockOperation,
};

/// Raw joined product row, images still binary.
#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    product_id: i64,
    product_name: String,
    display_name: String,
    display_price: i64,
    product_stocks: i64,
    product_sold: i64,
    product_description: String,
    status: ProductStatus,
    is_featured: bool,
    is_deleted: bool,
    date_created: DateTime<Utc>,
    display_image: Vec<u8>,
    category_id: i64,
    category_name: String,
    category_image: Vec<u8>,
}

impl From<ListingRow> for ProductListing {
    fn from(row: ListingRow) -> Self {
        ProductListing {
            product_id: row.product_id,
            product_name: row.product_name,
            display_name: row.display_name,
            display_price: row.display_price,
            product_stocks: row.product_stocks,
            product_sold: row.product_sold,
            product_description: row.product_description,
            status: row.status,
            is_featured: row.is_featured,
            is_deleted: row.is_deleted,
            date_created: row.date_created,
            display_image: encode_image(&row.display_image),
            category_id: row.category_id,
            category_name: row.category_name,
            category_image: encode_image(&row.category_image),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FeaturedRow {
    product_name: String,
    product_id: i64,
    display_price: i64,
    display_image: Vec<u8>,
}

impl From<FeaturedRow> for FeaturedProduct {
    fn from(row: FeaturedRow) -> Self {
        FeaturedProduct {
            product_name: row.product_name,
            product_id: row.product_id,
            display_price: row.display_price,
            display_image: encode_image(&row.display_image),
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Storefront listing for one category
/// let rice = repo.list(Some("Grains"), true).await?;
///
/// // Detail page
/// let detail = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product unless a live product already uses the name.
    ///
    /// ## Returns
    /// * `Ok(Created(CreatedProduct))` - One row inserted; the summary
    ///   carries the new id and the image as base64
    /// * `Ok(Conflict)` - Name taken by a non-deleted product, nothing inserted
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown category
    ///
    /// The name lookup is backed by a partial unique index, so a concurrent
    /// create that slips past the lookup still ends as `Conflict`.
    pub async fn create(&self, new: &NewProduct) -> DbResult<CreateOutcome<CreatedProduct>> {
        validate_new_product(new)?;

        debug!(name = %new.product_name, category_id = new.category_id, "Creating product");

        if self.get_by_name(&new.product_name).await?.is_some() {
            warn!(name = %new.product_name, "Product name already in use");
            return Ok(CreateOutcome::Conflict);
        }

        self.insert(new).await
    }

    /// Inserts without the name lookup; the live-name index still decides
    /// conflicts.
    async fn insert(&self, new: &NewProduct) -> DbResult<CreateOutcome<CreatedProduct>> {
        let inserted = sqlx::query(product::INSERT)
            .bind(new.category_id)
            .bind(&new.product_name)
            .bind(&new.display_name)
            .bind(new.display_price)
            .bind(new.product_stocks)
            .bind(&new.product_description)
            .bind(new.status)
            .bind(new.is_featured)
            .bind(new.display_image.as_slice())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(DbError::from);

        let result = match inserted {
            Ok(result) => result,
            Err(err) if err.is_unique_violation() => {
                warn!(name = %new.product_name, "Product name claimed concurrently");
                return Ok(CreateOutcome::Conflict);
            }
            Err(err) => return Err(err),
        };

        let product_id = result.last_insert_rowid();
        debug!(product_id, "Product created");

        Ok(CreateOutcome::Created(CreatedProduct {
            product_id,
            product_name: new.product_name.clone(),
            display_name: new.display_name.clone(),
            display_price: new.display_price,
            status: new.status,
            is_featured: new.is_featured,
            product_stocks: new.product_stocks,
            product_description: new.product_description.clone(),
            display_image: encode_image(&new.display_image),
        }))
    }

    /// Updates a product's display fields.
    ///
    /// ## Returns
    /// * `Ok(Some(summary))` - The fields that were written
    /// * `Ok(None)` - No product with this id; nothing written
    pub async fn update(
        &self,
        product_id: i64,
        update: &ProductUpdate,
    ) -> DbResult<Option<ProductUpdateSummary>> {
        validate_product_update(update)?;

        debug!(product_id, "Updating product");

        let result = sqlx::query(product::UPDATE)
            .bind(product_id)
            .bind(update.category_id)
            .bind(&update.display_name)
            .bind(update.display_price)
            .bind(&update.product_description)
            .bind(update.status)
            .bind(update.is_featured)
            .bind(update.display_image.as_deref())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(product_id, "Product to update not found");
            return Ok(None);
        }

        Ok(Some(ProductUpdateSummary {
            product_id,
            display_name: update.display_name.clone(),
            display_price: update.display_price,
            product_description: update.product_description.clone(),
            status: update.status,
            is_featured: update.is_featured,
        }))
    }

    /// Replaces only the display image. Returns false if no row matched.
    pub async fn update_image(&self, product_id: i64, image: &[u8]) -> DbResult<bool> {
        validate_image("display_image", image)?;

        debug!(product_id, bytes = image.len(), "Updating product image");

        let result = sqlx::query(product::UPDATE_IMAGE)
            .bind(product_id)
            .bind(image)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-deletes (`deleted = true`) or restores a product.
    ///
    /// Only the flag changes; the row and its variants stay in place.
    /// Returns false if no row matched.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - Restoring a product whose name a live
    ///   product took in the meantime
    pub async fn set_deleted(&self, product_id: i64, deleted: bool) -> DbResult<bool> {
        debug!(product_id, deleted, "Setting product deleted flag");

        let result = sqlx::query(product::SET_DELETED)
            .bind(deleted)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists non-deleted products joined with their category.
    ///
    /// ## Arguments
    /// * `category_name` - Exact category name filter, `None` for all
    /// * `active_only` - Storefront view: only `status = 'active'`
    ///
    /// An empty vector means nothing matched.
    pub async fn list(
        &self,
        category_name: Option<&str>,
        active_only: bool,
    ) -> DbResult<Vec<ProductListing>> {
        debug!(category = ?category_name, active_only, "Listing products");

        let statement = if active_only {
            product::LIST_ACTIVE
        } else {
            product::LIST
        };

        let rows: Vec<ListingRow> = sqlx::query_as(statement)
            .bind(category_name)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(ProductListing::from).collect())
    }

    /// Gets a product with its variants and album photos.
    ///
    /// ## Returns
    /// * `Ok(Some(detail))` - Product row plus at least one variant
    /// * `Ok(None)` - No such product, or the product has no variants
    ///
    /// Every sellable product has at least one variant; a product without
    /// any is treated as not yet published.
    pub async fn get_by_id(&self, product_id: i64) -> DbResult<Option<ProductDetail>> {
        debug!(product_id, "Fetching product detail");

        let variants = VariantRepository::new(self.pool.clone())
            .get_by_product_id(product_id)
            .await?;
        if variants.is_empty() {
            debug!(product_id, "Product has no variants");
            return Ok(None);
        }

        let albums = AlbumRepository::new(self.pool.clone())
            .get_by_product_id(product_id)
            .await?;

        let row: Option<ListingRow> = sqlx::query_as(product::GET_BY_ID)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| ProductDetail {
            product: ProductListing::from(row),
            albums,
            variants,
        }))
    }

    /// Gets a non-deleted product by its unique name.
    pub async fn get_by_name(&self, product_name: &str) -> DbResult<Option<ProductRecord>> {
        let record = sqlx::query_as::<_, ProductRecord>(product::GET_BY_NAME)
            .bind(product_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Adjusts product stock.
    ///
    /// ## Stock Update Strategy
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Add / Subtract run as deltas inside the UPDATE:                   │
    /// │     UPDATE products SET product_stocks = product_stocks - 3        │
    /// │                                                                     │
    /// │  Two checkouts subtracting 3 and 2 concurrently end at -5 total,   │
    /// │  never at -3 or -2.                                                 │
    /// │                                                                     │
    /// │  Set is an absolute overwrite (stock take).                        │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No product with this id
    pub async fn adjust_stock(
        &self,
        product_id: i64,
        operation: StockOperation,
        quantity: i64,
    ) -> DbResult<()> {
        debug!(product_id, %operation, quantity, "Adjusting product stock");

        let affected = apply_stock_adjustment(&self.pool, product_id, operation, quantity).await?;
        if affected == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        Ok(())
    }

    /// Adjusts the sold counter.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No product with this id
    pub async fn adjust_sold(
        &self,
        product_id: i64,
        operation: CountOperation,
        quantity: i64,
    ) -> DbResult<()> {
        validate_quantity(quantity)?;

        debug!(product_id, %operation, quantity, "Adjusting sold count");

        let statement = match operation {
            CountOperation::Add => counter::ADD_SOLD,
            CountOperation::Subtract => counter::SUBTRACT_SOLD,
        };

        let result = sqlx::query(statement)
            .bind(quantity)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        Ok(())
    }

    /// Lists active, non-deleted featured products for the storefront.
    pub async fn list_featured(&self) -> DbResult<Vec<FeaturedProduct>> {
        let rows: Vec<FeaturedRow> = sqlx::query_as(product::LIST_FEATURED)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FeaturedProduct::from).collect())
    }

    /// Lists soft-deleted products for the admin trash view.
    ///
    /// Rows come back as stored, minus the image column.
    pub async fn list_deleted(&self) -> DbResult<Vec<ProductRecord>> {
        let rows = sqlx::query_as::<_, ProductRecord>(product::LIST_DELETED)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Counts non-deleted products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(product::COUNT_LIVE)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Runs one product stock statement on any executor (pool or transaction).
///
/// Returns the number of rows affected.
pub(crate) async fn apply_stock_adjustment<'e, E>(
    executor: E,
    product_id: i64,
    operation: StockOperation,
    quantity: i64,
) -> DbResult<u64>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let statement = match operation {
        StockOperation::Add => {
            validate_quantity(quantity)?;
            counter::ADD_STOCK
        }
        StockOperation::Subtract => {
            validate_quantity(quantity)?;
            counter::SUBTRACT_STOCK
        }
        StockOperation::Set => {
            validate_absolute_stock(quantity)?;
            counter::SET_STOCK
        }
    };

    let result = sqlx::query(statement)
        .bind(quantity)
        .bind(product_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Unit Tests
// =============================================================================
