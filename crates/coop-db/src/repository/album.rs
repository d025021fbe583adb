//! # Album Repository
//!
//! Extra product photos shown on the detail page.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::queries::album;
use coop_core::image::encode_image;
use coop_core::validation::validate_image;
use coop_core::ProductAlbum;

#[derive(Debug, sqlx::FromRow)]
struct AlbumRow {
    photo_id: i64,
    product_id: i64,
    product_photo: Vec<u8>,
}

impl From<AlbumRow> for ProductAlbum {
    fn from(row: AlbumRow) -> Self {
        ProductAlbum {
            photo_id: row.photo_id,
            product_id: row.product_id,
            product_photo: encode_image(&row.product_photo),
        }
    }
}

/// Repository for product album photos.
#[derive(Debug, Clone)]
pub struct AlbumRepository {
    pool: SqlitePool,
}

impl AlbumRepository {
    /// Creates a new AlbumRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AlbumRepository { pool }
    }

    /// Gets a product's photos in upload order.
    pub async fn get_by_product_id(&self, product_id: i64) -> DbResult<Vec<ProductAlbum>> {
        let rows: Vec<AlbumRow> = sqlx::query_as(album::GET_BY_PRODUCT_ID)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductAlbum::from).collect())
    }

    /// Adds a photo to a product's album.
    pub async fn add_photo(&self, product_id: i64, photo: &[u8]) -> DbResult<ProductAlbum> {
        validate_image("product_photo", photo)?;

        debug!(product_id, bytes = photo.len(), "Adding album photo");

        let result = sqlx::query(album::INSERT)
            .bind(product_id)
            .bind(photo)
            .execute(&self.pool)
            .await?;

        Ok(ProductAlbum {
            photo_id: result.last_insert_rowid(),
            product_id,
            product_photo: encode_image(photo),
        })
    }
}
