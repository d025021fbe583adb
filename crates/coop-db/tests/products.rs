mod common;

use common::{category, new_product, product, setup, setup_shared, variant, IMAGE};
use coop_core::image::decode_image;
use coop_core::{
    CountOperation, CreateOutcome, ProductStatus, ProductUpdate, StockOperation, ValidationError,
};
use coop_core::MAX_STOCK_ADJUSTMENT;
use coop_db::DbError;

#[tokio::test]
async fn test_create_returns_summary_with_base64_image() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;

    let created = product(&db, grains.category_id, "Brown Rice").await;

    assert!(created.product_id > 0);
    assert_eq!(created.product_name, "Brown Rice");
    assert_eq!(decode_image(&created.display_image).unwrap(), IMAGE);
    assert_eq!(db.products().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_name_conflicts_without_insert() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    product(&db, grains.category_id, "Brown Rice").await;

    let outcome = db
        .products()
        .create(&new_product(grains.category_id, "Brown Rice"))
        .await
        .unwrap();

    assert!(outcome.is_conflict());
    assert_eq!(db.products().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleted_name_can_be_reused() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let old = product(&db, grains.category_id, "Brown Rice").await;
    assert!(db.products().set_deleted(old.product_id, true).await.unwrap());

    let outcome = db
        .products()
        .create(&new_product(grains.category_id, "Brown Rice"))
        .await
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::Created(_)));
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;

    let mut input = new_product(grains.category_id, "Brown Rice");
    input.display_image.clear();

    let err = db.products().create(&input).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::Required { .. })
    ));
}

#[tokio::test]
async fn test_create_in_unknown_category_fails() {
    let db = setup().await;

    let err = db
        .products()
        .create(&new_product(999, "Orphan"))
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
}

#[tokio::test]
async fn test_active_listing_filters_status_and_category() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let snacks = category(&db, "Snacks").await;

    product(&db, grains.category_id, "Brown Rice").await;
    product(&db, snacks.category_id, "Banana Chips").await;

    let mut hidden = new_product(grains.category_id, "Corn Grits");
    hidden.status = ProductStatus::Inactive;
    db.products().create(&hidden).await.unwrap();

    let active = db.products().list(Some("Grains"), true).await.unwrap();
    assert_eq!(active.len(), 1);
    let rice = &active[0];
    assert_eq!(rice.product_name, "Brown Rice");
    assert_eq!(rice.status, ProductStatus::Active);
    assert_eq!(rice.category_name, "Grains");
    assert_eq!(decode_image(&rice.display_image).unwrap(), IMAGE);
    assert_eq!(decode_image(&rice.category_image).unwrap(), IMAGE);

    let admin = db.products().list(Some("Grains"), false).await.unwrap();
    assert_eq!(admin.len(), 2);

    let everything = db.products().list(None, true).await.unwrap();
    assert_eq!(everything.len(), 2);

    assert!(db.products().list(Some("Beverages"), true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_soft_delete_hides_but_keeps_row_and_variants() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let rice = product(&db, grains.category_id, "Brown Rice").await;
    db.variants()
        .replace_all(rice.product_id, &[variant("1kg", 5)])
        .await
        .unwrap();

    assert!(db.products().set_deleted(rice.product_id, true).await.unwrap());

    assert!(db.products().list(None, false).await.unwrap().is_empty());
    assert!(db.products().get_by_name("Brown Rice").await.unwrap().is_none());

    let deleted = db.products().list_deleted().await.unwrap();
    assert_eq!(deleted.len(), 1);
    let row = &deleted[0];
    assert_eq!(row.product_id, rice.product_id);
    assert_eq!(row.category_id, grains.category_id);
    assert_eq!(row.product_name, "Brown Rice");
    assert_eq!(row.display_price, 6_500);
    assert_eq!(row.product_stocks, 20);
    assert_eq!(row.product_description, "Brown Rice description");
    assert_eq!(row.status, ProductStatus::Active);
    assert!(row.is_deleted);

    assert_eq!(
        db.variants().get_by_product_id(rice.product_id).await.unwrap().len(),
        1
    );

    // Detail lookup doesn't filter deleted rows
    let detail = db.products().get_by_id(rice.product_id).await.unwrap().unwrap();
    assert!(detail.product.is_deleted);

    assert!(db.products().set_deleted(rice.product_id, false).await.unwrap());
    assert_eq!(db.products().list(None, false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_deleted_on_missing_product() {
    let db = setup().await;
    assert!(!db.products().set_deleted(42, true).await.unwrap());
}

#[tokio::test]
async fn test_get_by_id_requires_variants() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let rice = product(&db, grains.category_id, "Brown Rice").await;

    assert!(db.products().get_by_id(rice.product_id).await.unwrap().is_none());

    db.variants()
        .replace_all(rice.product_id, &[variant("500g", 4), variant("1kg", 2)])
        .await
        .unwrap();
    db.albums().add_photo(rice.product_id, b"side-view").await.unwrap();

    let detail = db.products().get_by_id(rice.product_id).await.unwrap().unwrap();
    assert_eq!(detail.product.product_id, rice.product_id);
    assert_eq!(detail.product.category_name, "Grains");
    assert_eq!(detail.variants.len(), 2);
    assert_eq!(detail.variants[0].variant_id, 1);
    assert_eq!(detail.albums.len(), 1);
    assert_eq!(decode_image(&detail.albums[0].product_photo).unwrap(), b"side-view");

    assert!(db.products().get_by_id(9_999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_keeps_image_when_none() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let snacks = category(&db, "Snacks").await;
    let rice = product(&db, grains.category_id, "Brown Rice").await;

    let update = ProductUpdate {
        category_id: snacks.category_id,
        display_name: "Rice Crisps".to_string(),
        display_price: 4_200,
        product_description: "Puffed".to_string(),
        status: ProductStatus::Inactive,
        is_featured: true,
        display_image: None,
    };

    let summary = db
        .products()
        .update(rice.product_id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.display_name, "Rice Crisps");
    assert_eq!(summary.display_price, 4_200);

    let listed = db.products().list(Some("Snacks"), false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ProductStatus::Inactive);
    assert_eq!(decode_image(&listed[0].display_image).unwrap(), IMAGE);

    assert!(db.products().update(9_999, &update).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_image_only() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let rice = product(&db, grains.category_id, "Brown Rice").await;

    assert!(db.products().update_image(rice.product_id, b"new").await.unwrap());

    let listed = db.products().list(None, false).await.unwrap();
    assert_eq!(decode_image(&listed[0].display_image).unwrap(), b"new");
    assert!(!db.products().update_image(9_999, b"new").await.unwrap());
}

#[tokio::test]
async fn test_stock_and_sold_adjustments() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let rice = product(&db, grains.category_id, "Brown Rice").await;
    let repo = db.products();

    repo.adjust_stock(rice.product_id, StockOperation::Add, 5).await.unwrap();
    repo.adjust_stock(rice.product_id, StockOperation::Subtract, 3).await.unwrap();
    let stored = repo.get_by_name("Brown Rice").await.unwrap().unwrap();
    assert_eq!(stored.product_stocks, 22);

    repo.adjust_stock(rice.product_id, StockOperation::Set, 7).await.unwrap();
    repo.adjust_sold(rice.product_id, CountOperation::Add, 4).await.unwrap();
    repo.adjust_sold(rice.product_id, CountOperation::Subtract, 1).await.unwrap();
    let stored = repo.get_by_name("Brown Rice").await.unwrap().unwrap();
    assert_eq!(stored.product_stocks, 7);
    assert_eq!(stored.product_sold, 3);

    let err = repo.adjust_stock(9_999, StockOperation::Add, 1).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));

    let err = repo.adjust_stock(rice.product_id, StockOperation::Add, 0).await.unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_subtracts_all_apply() {
    let (_dir, db) = setup_shared().await;
    let grains = category(&db, "Grains").await;
    let product_id = product(&db, grains.category_id, "Brown Rice").await.product_id;

    let subtracts: Vec<_> = [3, 2, 4, 1, 5]
        .into_iter()
        .map(|qty| {
            let repo = db.products();
            tokio::spawn(async move {
                repo.adjust_stock(product_id, StockOperation::Subtract, qty)
                    .await
            })
        })
        .collect();
    for handle in subtracts {
        handle.await.unwrap().unwrap();
    }

    let stored = db.products().get_by_name("Brown Rice").await.unwrap().unwrap();
    assert_eq!(stored.product_stocks, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_one_name_yield_single_row() {
    let (_dir, db) = setup_shared().await;
    let grains = category(&db, "Grains").await;

    let creates: Vec<_> = (0..8)
        .map(|_| {
            let repo = db.products();
            let input = new_product(grains.category_id, "Brown Rice");
            tokio::spawn(async move { repo.create(&input).await })
        })
        .collect();

    let mut created = 0;
    for handle in creates {
        match handle.await.unwrap().unwrap() {
            CreateOutcome::Created(_) => created += 1,
            CreateOutcome::Conflict => {}
        }
    }

    assert_eq!(created, 1);
    assert_eq!(db.products().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_restore_after_name_reuse_is_unique_violation() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let old = product(&db, grains.category_id, "Brown Rice").await;
    assert!(db.products().set_deleted(old.product_id, true).await.unwrap());
    let replacement = product(&db, grains.category_id, "Brown Rice").await;

    let err = db
        .products()
        .set_deleted(old.product_id, false)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
    assert!(err.is_unique_violation());

    let live = db.products().get_by_name("Brown Rice").await.unwrap().unwrap();
    assert_eq!(live.product_id, replacement.product_id);
    assert_eq!(db.products().list_deleted().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_accepts_counts_above_adjustment_cap() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;
    let large = MAX_STOCK_ADJUSTMENT * 3 / 2;

    let mut bulk = new_product(grains.category_id, "Bulk Rice");
    bulk.product_stocks = large;
    let bulk = db.products().create(&bulk).await.unwrap().created().unwrap();

    db.products()
        .adjust_stock(bulk.product_id, StockOperation::Set, large)
        .await
        .unwrap();
    let stored = db.products().get_by_name("Bulk Rice").await.unwrap().unwrap();
    assert_eq!(stored.product_stocks, large);

    let err = db
        .products()
        .adjust_stock(bulk.product_id, StockOperation::Add, large)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
}

#[tokio::test]
async fn test_featured_listing() {
    let db = setup().await;
    let grains = category(&db, "Grains").await;

    let mut featured = new_product(grains.category_id, "Brown Rice");
    featured.is_featured = true;
    db.products().create(&featured).await.unwrap();

    let mut hidden = new_product(grains.category_id, "Jasmine Rice");
    hidden.is_featured = true;
    hidden.status = ProductStatus::Inactive;
    db.products().create(&hidden).await.unwrap();

    product(&db, grains.category_id, "Rolled Oats").await;

    let listed = db.products().list_featured().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].product_name, "Brown Rice");
    assert_eq!(decode_image(&listed[0].display_image).unwrap(), IMAGE);
}
