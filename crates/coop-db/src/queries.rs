//! # Query Definitions
//!
//! Every SQL statement the repositories execute, as positional-parameter
//! templates (`?1`, `?2`, ...). Nothing is string-built at runtime.
//!
//! Grouped by table; the repositories import the group they need:
//! ```rust,ignore
//! use crate::queries::product;
//! sqlx::query(product::SET_DELETED).bind(true).bind(id)
//! ```

/// Statements over `products` (joined with `categories` for listings).
pub mod product {
    /// Columns shared by every joined product read.
    macro_rules! listing_select {
        () => {
            r#"
            SELECT
                p.product_id,
                p.product_name,
                p.display_name,
                p.display_price,
                p.product_stocks,
                p.product_sold,
                p.product_description,
                p.status,
                p.is_featured,
                p.is_deleted,
                p.date_created,
                p.display_image,
                p.category_id,
                c.category_name,
                c.category_image
            FROM products p
            INNER JOIN categories c ON c.category_id = p.category_id
            "#
        };
    }

    /// `?1` category name filter (NULL = all categories).
    pub const LIST: &str = concat!(
        listing_select!(),
        r#"
            WHERE p.is_deleted = 0
            AND (?1 IS NULL OR c.category_name = ?1)
            ORDER BY p.product_id
        "#
    );

    /// `?1` category name filter (NULL = all categories).
    pub const LIST_ACTIVE: &str = concat!(
        listing_select!(),
        r#"
            WHERE p.is_deleted = 0
            AND p.status = 'active'
            AND (?1 IS NULL OR c.category_name = ?1)
            ORDER BY p.product_id
        "#
    );

    /// `?1` product_id. Deleted rows included.
    pub const GET_BY_ID: &str = concat!(
        listing_select!(),
        r#"
            WHERE p.product_id = ?1
        "#
    );

    /// `?1` product_name.
    pub const GET_BY_NAME: &str = r#"
        SELECT
            product_id,
            category_id,
            product_name,
            display_name,
            display_price,
            product_stocks,
            product_sold,
            product_description,
            status,
            is_featured,
            is_deleted,
            date_created
        FROM products
        WHERE product_name = ?1 AND is_deleted = 0
    "#;

    pub const INSERT: &str = r#"
        INSERT INTO products (
            category_id, product_name, display_name, display_price,
            product_stocks, product_description, status, is_featured,
            display_image, date_created
        ) VALUES (
            ?1, ?2, ?3, ?4,
            ?5, ?6, ?7, ?8,
            ?9, ?10
        )
    "#;

    /// `?8` NULL keeps the current image.
    pub const UPDATE: &str = r#"
        UPDATE products SET
            category_id = ?2,
            display_name = ?3,
            display_price = ?4,
            product_description = ?5,
            status = ?6,
            is_featured = ?7,
            display_image = COALESCE(?8, display_image)
        WHERE product_id = ?1
    "#;

    pub const UPDATE_IMAGE: &str = r#"
        UPDATE products SET display_image = ?2 WHERE product_id = ?1
    "#;

    /// `?1` flag, `?2` product_id.
    pub const SET_DELETED: &str = r#"
        UPDATE products SET is_deleted = ?1 WHERE product_id = ?2
    "#;

    pub const LIST_FEATURED: &str = r#"
        SELECT product_name, product_id, display_price, display_image
        FROM products
        WHERE is_featured = 1 AND is_deleted = 0 AND status = 'active'
        ORDER BY product_id
    "#;

    /// Same columns as `GET_BY_NAME`.
    pub const LIST_DELETED: &str = r#"
        SELECT
            product_id,
            category_id,
            product_name,
            display_name,
            display_price,
            product_stocks,
            product_sold,
            product_description,
            status,
            is_featured,
            is_deleted,
            date_created
        FROM products
        WHERE is_deleted = 1
        ORDER BY product_id
    "#;

    pub const COUNT_LIVE: &str = "SELECT COUNT(*) FROM products WHERE is_deleted = 0";
}

/// Stock and sold counters on `products`. `?1` quantity, `?2` product_id.
pub mod counter {
    pub const ADD_STOCK: &str = r#"
        UPDATE products SET product_stocks = product_stocks + ?1 WHERE product_id = ?2
    "#;

    pub const SUBTRACT_STOCK: &str = r#"
        UPDATE products SET product_stocks = product_stocks - ?1 WHERE product_id = ?2
    "#;

    pub const SET_STOCK: &str = r#"
        UPDATE products SET product_stocks = ?1 WHERE product_id = ?2
    "#;

    pub const ADD_SOLD: &str = r#"
        UPDATE products SET product_sold = product_sold + ?1 WHERE product_id = ?2
    "#;

    pub const SUBTRACT_SOLD: &str = r#"
        UPDATE products SET product_sold = product_sold - ?1 WHERE product_id = ?2
    "#;

    /// `?1` quantity, `?2` variant_name, `?3` product_id.
    pub const ADD_VARIANT_STOCK: &str = r#"
        UPDATE variants SET variant_stocks = variant_stocks + ?1
        WHERE variant_name = ?2 AND product_id = ?3
    "#;

    /// `?1` quantity, `?2` variant_name, `?3` product_id.
    pub const SUBTRACT_VARIANT_STOCK: &str = r#"
        UPDATE variants SET variant_stocks = variant_stocks - ?1
        WHERE variant_name = ?2 AND product_id = ?3
    "#;
}

/// Statements over `variants`.
pub mod variant {
    pub const INSERT: &str = r#"
        INSERT INTO variants (
            variant_id, product_id, variant_name, variant_symbol,
            variant_price, variant_stocks
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#;

    /// `?1` name, `?2` symbol, `?3` price, `?4` stocks, `?5` product_id,
    /// `?6` variant_id.
    pub const UPDATE: &str = r#"
        UPDATE variants SET
            variant_name = ?1,
            variant_symbol = ?2,
            variant_price = ?3,
            variant_stocks = ?4
        WHERE product_id = ?5 AND variant_id = ?6
    "#;

    pub const DELETE_FOR_PRODUCT: &str = "DELETE FROM variants WHERE product_id = ?1";

    pub const COUNT_FOR_PRODUCT: &str = "SELECT COUNT(*) FROM variants WHERE product_id = ?1";

    pub const GET_ALL: &str = r#"
        SELECT id, variant_id, product_id, variant_name, variant_symbol,
               variant_price, variant_stocks
        FROM variants
        ORDER BY product_id, variant_id
    "#;

    pub const GET_BY_ID: &str = r#"
        SELECT id, variant_id, product_id, variant_name, variant_symbol,
               variant_price, variant_stocks
        FROM variants
        WHERE id = ?1
    "#;

    pub const GET_BY_PRODUCT_ID: &str = r#"
        SELECT id, variant_id, product_id, variant_name, variant_symbol,
               variant_price, variant_stocks
        FROM variants
        WHERE product_id = ?1
        ORDER BY variant_id
    "#;
}

/// Statements over `categories`.
pub mod category {
    pub const GET_ALL: &str = r#"
        SELECT category_id, category_name, category_image
        FROM categories
        WHERE is_deleted = 0
        ORDER BY category_id
    "#;

    pub const GET_DELETED: &str = r#"
        SELECT category_id, category_name
        FROM categories
        WHERE is_deleted = 1
        ORDER BY category_id
    "#;

    pub const GET_BY_ID: &str = r#"
        SELECT category_id, category_name, category_image
        FROM categories
        WHERE category_id = ?1
    "#;

    pub const GET_BY_NAME: &str = r#"
        SELECT category_id, category_name, category_image
        FROM categories
        WHERE category_name = ?1 AND is_deleted = 0
    "#;

    pub const INSERT: &str = r#"
        INSERT INTO categories (category_name, category_image, date_created)
        VALUES (?1, ?2, ?3)
    "#;

    /// `?3` NULL keeps the current image.
    pub const UPDATE: &str = r#"
        UPDATE categories SET
            category_name = ?2,
            category_image = COALESCE(?3, category_image)
        WHERE category_id = ?1
    "#;

    /// `?1` flag, `?2` category_id.
    pub const SET_DELETED: &str = r#"
        UPDATE categories SET is_deleted = ?1 WHERE category_id = ?2
    "#;
}

/// Statements over `product_albums`.
pub mod album {
    pub const GET_BY_PRODUCT_ID: &str = r#"
        SELECT photo_id, product_id, product_photo
        FROM product_albums
        WHERE product_id = ?1
        ORDER BY photo_id
    "#;

    pub const INSERT: &str = r#"
        INSERT INTO product_albums (product_id, product_photo) VALUES (?1, ?2)
    "#;
}
