//! Payment reference lifecycle tests
//!
//! A reference is minted together with its order, resolves to exactly one
//! order, is consumed idempotently by verification, and can be reminted
//! without touching stock, items, or the total.

mod common;

use market_server::ErrorCode;
use market_server::checkout::payment::{PAYMENT_REF_PREFIX, generate_payment_ref};
use market_server::checkout::{CheckoutOptions, checkout};
use market_server::db::repository::order;
use shared::models::OrderStatus;

fn gateway_opts(expected_amount: Option<f64>) -> CheckoutOptions {
    CheckoutOptions {
        payment_ref: Some(generate_payment_ref(PAYMENT_REF_PREFIX)),
        expected_amount,
        ..Default::default()
    }
}

#[tokio::test]
async fn initialize_attaches_a_reference_to_the_order() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 3).await;

    let order = checkout(&app.pool, buyer, gateway_opts(None))
        .await
        .expect("gateway checkout");

    let reference = order.order.payment_ref.expect("reference attached");
    assert!(reference.starts_with("PSK-"));
    assert_eq!(order.order.status, OrderStatus::Pending);

    // The reference resolves to exactly this order
    let found = order::find_by_payment_ref(&app.pool, &reference, buyer)
        .await
        .unwrap()
        .expect("reference resolves");
    assert_eq!(found.id, order.order.id);
}

#[tokio::test]
async fn amount_within_tolerance_passes() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 3).await;

    // Cart totals 300; 301 is inside the 1-unit tolerance
    let order = checkout(&app.pool, buyer, gateway_opts(Some(301.0)))
        .await
        .expect("301 vs 300 passes");
    assert_eq!(order.order.total, 300.0);
}

#[tokio::test]
async fn amount_mismatch_creates_nothing() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 3).await;

    let err = checkout(&app.pool, buyer, gateway_opts(Some(310.0)))
        .await
        .expect_err("310 vs 300 fails");
    assert_eq!(err.code, ErrorCode::AmountMismatch);

    assert_eq!(common::order_count(&app.pool, buyer).await, 0);
    assert_eq!(common::product_quantity(&app.pool, p1).await, 5);
    assert_eq!(common::cart_count(&app.pool, buyer).await, 1);
}

#[tokio::test]
async fn verify_advances_pending_to_processing_idempotently() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 3).await;

    let created = checkout(&app.pool, buyer, gateway_opts(None)).await.unwrap();
    let reference = created.order.payment_ref.clone().unwrap();

    // First confirmation advances the order
    let found = order::find_by_payment_ref(&app.pool, &reference, buyer)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, OrderStatus::Pending);
    order::mark_processing(&app.pool, found.id).await.unwrap();

    let after = order::find_by_id(&app.pool, found.id).await.unwrap().unwrap();
    assert_eq!(after.status, OrderStatus::Processing);

    // Fulfillment rows moved together with the header
    let statuses = order::fulfillment_statuses(&app.pool, found.id).await.unwrap();
    assert!(statuses.iter().all(|s| *s == OrderStatus::Processing));

    // Second confirmation is a no-op, not an error
    order::mark_processing(&app.pool, found.id).await.unwrap();
    let again = order::find_by_id(&app.pool, found.id).await.unwrap().unwrap();
    assert_eq!(again.status, OrderStatus::Processing);
}

#[tokio::test]
async fn verify_does_not_regress_advanced_orders() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 3).await;

    let created = checkout(&app.pool, buyer, gateway_opts(None)).await.unwrap();
    order::set_order_status(&app.pool, created.order.id, OrderStatus::Shipped)
        .await
        .unwrap();

    // Late gateway callback must not pull a shipped order back
    order::mark_processing(&app.pool, created.order.id).await.unwrap();
    let after = order::find_by_id(&app.pool, created.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn unknown_reference_does_not_resolve() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;

    let found = order::find_by_payment_ref(&app.pool, "PSK-0-nope", buyer)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn reference_is_scoped_to_its_buyer() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let other = common::seed_user(&app.pool, "Otieno", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 1).await;

    let created = checkout(&app.pool, buyer, gateway_opts(None)).await.unwrap();
    let reference = created.order.payment_ref.unwrap();

    let found = order::find_by_payment_ref(&app.pool, &reference, other)
        .await
        .unwrap();
    assert!(found.is_none(), "another buyer cannot verify this reference");
}

#[tokio::test]
async fn reinitialize_only_changes_the_reference() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 3).await;

    let created = checkout(&app.pool, buyer, gateway_opts(None)).await.unwrap();
    let old_reference = created.order.payment_ref.clone().unwrap();

    let new_reference = generate_payment_ref(PAYMENT_REF_PREFIX);
    let updated = order::set_payment_ref(&app.pool, created.order.id, buyer, &new_reference)
        .await
        .unwrap();

    assert_eq!(updated.payment_ref.as_deref(), Some(new_reference.as_str()));
    assert_ne!(old_reference, new_reference);
    assert_eq!(updated.total, created.order.total);
    assert_eq!(common::product_quantity(&app.pool, p1).await, 2);

    let items = order::items_for_order(&app.pool, created.order.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].qty, 3);

    // The old reference no longer resolves; the new one does
    assert!(
        order::find_by_payment_ref(&app.pool, &old_reference, buyer)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        order::find_by_payment_ref(&app.pool, &new_reference, buyer)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn reinitialize_rejects_foreign_orders() {
    let app = common::setup().await;
    let buyer = common::seed_user(&app.pool, "Wanjiku", "farmer").await;
    let other = common::seed_user(&app.pool, "Otieno", "farmer").await;
    let (_, provider) = common::seed_seller(&app.pool, "AgroOne", "Agro One Supplies").await;
    let p1 = common::seed_product(&app.pool, provider, "Dewormer 100ml", 100.0, 5).await;
    common::add_cart_line(&app.pool, buyer, p1, 1).await;

    let created = checkout(&app.pool, buyer, gateway_opts(None)).await.unwrap();

    let reference = generate_payment_ref(PAYMENT_REF_PREFIX);
    let err = order::set_payment_ref(&app.pool, created.order.id, other, &reference)
        .await
        .expect_err("other buyer cannot remint");
    let app_err: market_server::AppError = err.into();
    assert_eq!(app_err.code, ErrorCode::NotFound);
}
