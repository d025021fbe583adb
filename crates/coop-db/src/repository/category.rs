//! # Category Repository
//!
//! Database operations for product categories.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::queries::category;
use coop_core::image::encode_image;
use coop_core::validation::{validate_category_update, validate_new_category};
use coop_core::{Category, CategoryUpdate, CreateOutcome, DeletedCategory, NewCategory};

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    category_id: i64,
    category_name: String,
    category_image: Vec<u8>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            category_id: row.category_id,
            category_name: row.category_name,
            category_image: encode_image(&row.category_image),
        }
    }
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists non-deleted categories with base64 images.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(category::GET_ALL)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed categories");
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Lists soft-deleted categories (id and name only).
    pub async fn list_deleted(&self) -> DbResult<Vec<DeletedCategory>> {
        let rows = sqlx::query_as::<_, DeletedCategory>(category::GET_DELETED)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Gets a category by id, deleted or not.
    pub async fn get_by_id(&self, category_id: i64) -> DbResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(category::GET_BY_ID)
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Category::from))
    }

    /// Gets a non-deleted category by name.
    pub async fn get_by_name(&self, category_name: &str) -> DbResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(category::GET_BY_NAME)
            .bind(category_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Category::from))
    }

    /// Creates a category unless a live category already uses the name.
    ///
    /// ## Returns
    /// * `Ok(Created(category))` - Inserted, image echoed as base64
    /// * `Ok(Conflict)` - Name taken, nothing inserted
    pub async fn create(&self, new: &NewCategory) -> DbResult<CreateOutcome<Category>> {
        validate_new_category(new)?;

        debug!(name = %new.category_name, "Creating category");

        if self.get_by_name(&new.category_name).await?.is_some() {
            warn!(name = %new.category_name, "Category name already in use");
            return Ok(CreateOutcome::Conflict);
        }

        self.insert(new).await
    }

    async fn insert(&self, new: &NewCategory) -> DbResult<CreateOutcome<Category>> {
        let inserted = sqlx::query(category::INSERT)
            .bind(&new.category_name)
            .bind(new.category_image.as_slice())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(DbError::from);

        let result = match inserted {
            Ok(result) => result,
            Err(err) if err.is_unique_violation() => {
                warn!(name = %new.category_name, "Category name claimed concurrently");
                return Ok(CreateOutcome::Conflict);
            }
            Err(err) => return Err(err),
        };

        Ok(CreateOutcome::Created(Category {
            category_id: result.last_insert_rowid(),
            category_name: new.category_name.clone(),
            category_image: encode_image(&new.category_image),
        }))
    }

    /// Renames a category and optionally replaces its image.
    ///
    /// ## Returns
    /// * `Ok(Some(category))` - The category as stored after the update
    /// * `Ok(None)` - No category with this id
    /// * `Err(DbError::UniqueViolation)` - Another live category has the name
    pub async fn update(
        &self,
        category_id: i64,
        update: &CategoryUpdate,
    ) -> DbResult<Option<Category>> {
        validate_category_update(update)?;

        debug!(category_id, name = %update.category_name, "Updating category");

        let result = sqlx::query(category::UPDATE)
            .bind(category_id)
            .bind(&update.category_name)
            .bind(update.category_image.as_deref())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(category_id).await
    }

    /// Soft-deletes or restores a category. Returns false if no row matched.
    pub async fn set_deleted(&self, category_id: i64, deleted: bool) -> DbResult<bool> {
        debug!(category_id, deleted, "Setting category deleted flag");

        let result = sqlx::query(category::SET_DELETED)
            .bind(deleted)
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use crate::pool::Database;

    #[tokio::test]
    async fn test_insert_maps_live_name_index_to_conflict() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();
        let grains = NewCategory {
            category_name: "Grains".to_string(),
            category_image: vec![1],
        };

        assert!(matches!(
            repo.insert(&grains).await.unwrap(),
            CreateOutcome::Created(_)
        ));
        assert!(repo.insert(&grains).await.unwrap().is_conflict());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
