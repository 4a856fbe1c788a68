//! Cart synchronization: refresh-after-mutation, the count invariant, and
//! last-writer-wins ordering of interleaved refreshes.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use shoppro_client::{AppError, PageId};
use shoppro_core::{ProductId, Role};
use shoppro_integration_tests::{
    cart_json, empty_cart_json, fail, harness, ok, product_json, sign_in_as,
};

// =============================================================================
// Guest gating
// =============================================================================

#[tokio::test]
async fn test_guest_add_redirects_without_backend_call() {
    let h = harness();

    let err = h
        .app
        .cart()
        .add(&ProductId::new("p-1"), 1)
        .await
        .expect_err("guest add must fail");

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(h.notifier.contains("Please sign in to add items to your cart"));
    // Redirected to the login form, cart untouched, no mutation sent.
    assert_eq!(h.app.state().current_page(), PageId::Auth);
    assert_eq!(h.app.state().cart().count, 0);
    assert_eq!(h.bridge.calls_to("add_to_cart"), 0);
}

// =============================================================================
// Refresh after mutation
// =============================================================================

#[tokio::test]
async fn test_add_refreshes_snapshot_and_total() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;

    let lamp = product_json("p-1", "Lamp", "10.00", 5);
    h.bridge.enqueue("add_to_cart", &ok(&json!({})));
    h.bridge.enqueue("get_cart", &ok(&cart_json(&[(lamp, 2)])));

    let snapshot = h
        .app
        .cart()
        .add(&ProductId::new("p-1"), 2)
        .await
        .expect("add");

    assert_eq!(snapshot.count, 2);
    assert_eq!(h.app.state().cart().count, 2);
    assert_eq!(
        h.app.cart().compute_total(),
        "20.00".parse::<Decimal>().expect("decimal")
    );
    assert!(h.notifier.contains("Added to cart"));
    // The mutation was followed by exactly one authoritative refetch.
    assert_eq!(h.bridge.calls_to("add_to_cart"), 1);
}

#[tokio::test]
async fn test_rejected_mutation_keeps_snapshot_and_surfaces_message() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;

    h.bridge
        .enqueue("add_to_cart", &fail("Stock insuffisant"));

    let err = h
        .app
        .cart()
        .add(&ProductId::new("p-1"), 99)
        .await
        .expect_err("backend rejected");

    assert!(matches!(err, AppError::Call(_)));
    assert!(h.notifier.contains("Stock insuffisant"));
    assert_eq!(h.app.state().cart().count, 0);
}

#[tokio::test]
async fn test_zero_quantity_update_becomes_removal() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;

    h.bridge.enqueue("remove_from_cart", &ok(&json!({})));
    h.bridge.enqueue("get_cart", &ok(&empty_cart_json()));

    h.app
        .cart()
        .update_quantity(&ProductId::new("p-1"), 0)
        .await
        .expect("update");

    assert_eq!(h.bridge.calls_to("remove_from_cart"), 1);
    assert_eq!(h.bridge.calls_to("update_cart_quantity"), 0);
}

// =============================================================================
// Count invariant
// =============================================================================

#[tokio::test]
async fn test_drifted_count_is_recomputed_from_items() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;

    // Backend reports a count that disagrees with its own items.
    let lamp = product_json("p-1", "Lamp", "10.00", 5);
    h.bridge.enqueue(
        "get_cart",
        &ok(&json!({
            "cart": [{"product_id": "p-1", "quantity": 3, "product": lamp}],
            "count": 7
        })),
    );

    let snapshot = h.app.cart().refresh().await.expect("refresh");

    assert_eq!(snapshot.count, 3);
    assert!(snapshot.is_consistent());
}

#[tokio::test]
async fn test_repeated_refresh_is_idempotent() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;

    let lamp = product_json("p-1", "Lamp", "10.00", 5);
    h.bridge.respond("get_cart", &ok(&cart_json(&[(lamp, 2)])));

    let first = h.app.cart().refresh().await.expect("refresh");
    let second = h.app.cart().refresh().await.expect("refresh");

    assert_eq!(first, second);
    assert_eq!(h.app.state().cart(), second);
}

// =============================================================================
// Interleaved completions
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_refresh_cannot_overwrite_later_one() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;

    let lamp = product_json("p-1", "Lamp", "10.00", 5);

    // Two quantity updates; the earlier call's refetch completes last.
    h.bridge.enqueue("update_cart_quantity", &ok(&json!({})));
    h.bridge.enqueue("update_cart_quantity", &ok(&json!({})));
    h.bridge.enqueue_delayed(
        "get_cart",
        &ok(&cart_json(&[(lamp.clone(), 1)])),
        Duration::from_millis(100),
    );
    h.bridge.enqueue_delayed(
        "get_cart",
        &ok(&cart_json(&[(lamp, 2)])),
        Duration::from_millis(10),
    );

    let product = ProductId::new("p-1");
    let (slow, fast) = tokio::join!(
        h.app.cart().update_quantity(&product, 1),
        h.app.cart().update_quantity(&product, 2),
    );

    // The later-issued update wins; the stale snapshot is discarded and the
    // slow caller observes the winning state instead.
    assert_eq!(fast.expect("fast update").count, 2);
    assert_eq!(slow.expect("slow update").count, 2);
    assert_eq!(h.app.state().cart().count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_logout_invalidates_in_flight_refresh() {
    let h = harness();
    sign_in_as(&h, Role::Client).await;

    let lamp = product_json("p-1", "Lamp", "10.00", 5);
    h.bridge.enqueue("update_cart_quantity", &ok(&json!({})));
    h.bridge.enqueue_delayed(
        "get_cart",
        &ok(&cart_json(&[(lamp, 4)])),
        Duration::from_millis(100),
    );
    h.bridge.respond("logout", &ok(&json!({})));

    let product = ProductId::new("p-1");
    let (update, logout) = tokio::join!(
        h.app.cart().update_quantity(&product, 4),
        h.app.session().logout(),
    );
    update.expect("update resolves");
    logout.expect("logout");

    // The refresh issued before the logout cannot resurrect the cart.
    assert_eq!(h.app.state().cart().count, 0);
    assert!(h.app.state().current_user().is_none());
}
