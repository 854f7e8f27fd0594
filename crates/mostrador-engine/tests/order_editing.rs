//! Integration: the Order editing screen against the in-memory order
//! service. The cart is a live projection of the server-held order;
//! every edit is durable immediately.

mod common;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use mostrador_core::{FulfillmentStatus, Money, PaymentSession};
use mostrador_engine::memory::{
    InMemoryCatalog, InMemoryOrderService, InMemoryTransactionService, OrderCall,
};
use mostrador_engine::{
    CartBackend, CatalogBrowser, CatalogService, EngineError, LoadState, OrderService,
    RemoteOrderCart, Settings, TransactionService, TransactionSettler,
};

use common::{init_tracing, order, order_item, product};

fn order_screen() -> (Arc<InMemoryOrderService>, RemoteOrderCart) {
    init_tracing();
    let service = Arc::new(InMemoryOrderService::with_order(order(
        "ORD-1",
        vec![
            order_item("L1", "P1", "Inca Kola 500ml", dec!(3.50), 2),
            order_item("L2", "P2", "Agua San Luis 625ml", dec!(2.00), 1),
        ],
    )));
    let cart = RemoteOrderCart::new("ORD-1", Arc::clone(&service) as Arc<dyn OrderService>);
    (service, cart)
}

#[tokio::test]
async fn editing_session_round_trip() {
    let (service, cart) = order_screen();
    cart.hydrate().await.unwrap();

    let lines = cart.lines().await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].line_id.as_deref(), Some("L1"));
    assert_eq!(lines[0].fulfillment_status, Some(FulfillmentStatus::Pending));
    assert_eq!(lines[0].subtotal, Money::new(dec!(7.00)));

    // Add a product not yet on the order.
    cart.add_line(&product("P3", "Galletas Soda Field", dec!(1.80), 12))
        .await
        .unwrap();
    // Bump an existing line.
    cart.change_quantity("P2", 2).await.unwrap();
    // Drop a line entirely.
    cart.remove_line("P1").await.unwrap();

    let lines = cart.lines().await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, "P2");
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[1].product_id, "P3");
    // Server-assigned identity on the new line.
    assert!(lines[1].line_id.is_some());

    // The server agrees: the projection is not a local copy.
    let server_order = service.get_order("ORD-1").await.unwrap();
    assert_eq!(server_order.items.len(), 2);

    let summary = cart.summary().await;
    // 3 x 2.00 + 1.80 = 7.80; tax 1.40 (1.404 rounded); total 9.20
    assert_eq!(summary.subtotal, Money::new(dec!(7.80)));
    assert_eq!(summary.tax, Money::new(dec!(1.40)));
    assert_eq!(summary.total, Money::new(dec!(9.20)));
}

#[tokio::test]
async fn decrement_to_zero_deletes_on_the_wire() {
    let (service, cart) = order_screen();
    cart.hydrate().await.unwrap();

    cart.change_quantity("P2", -1).await.unwrap();

    assert_eq!(cart.lines().await.len(), 1);
    let calls = service.calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, OrderCall::Delete { item_id, .. } if item_id == "L2")));
    assert!(!calls
        .iter()
        .any(|c| matches!(c, OrderCall::UpdateQuantity { quantity: 0, .. })));
}

#[tokio::test]
async fn every_mutation_refetches_before_reflecting() {
    let (service, cart) = order_screen();
    cart.hydrate().await.unwrap();

    cart.add_line(&product("P3", "Galletas Soda Field", dec!(1.80), 12))
        .await
        .unwrap();
    cart.change_quantity("P1", 1).await.unwrap();
    cart.remove_line("P2").await.unwrap();

    // Call log: hydrate Get, then strict (mutation, Get) pairs.
    let calls = service.calls();
    assert!(matches!(calls[0], OrderCall::Get { .. }));
    for pair in calls[1..].chunks(2) {
        assert!(!matches!(pair[0], OrderCall::Get { .. }), "mutation expected");
        assert!(
            matches!(pair[1], OrderCall::Get { .. }),
            "refetch must follow every mutation"
        );
    }
}

#[tokio::test]
async fn concurrent_mutations_are_serialized_per_order() {
    let (service, cart) = order_screen();
    let cart = Arc::new(cart);
    cart.hydrate().await.unwrap();

    // Slow down the two mutation calls so an unserialized engine would
    // interleave them with the refetches.
    service.push_delay(Duration::from_millis(40)); // first mutation
    service.push_delay(Duration::from_millis(0)); // its refetch
    service.push_delay(Duration::from_millis(40)); // second mutation
    service.push_delay(Duration::from_millis(0)); // its refetch

    let a = {
        let cart = Arc::clone(&cart);
        tokio::spawn(async move { cart.change_quantity("P1", 1).await })
    };
    let b = {
        let cart = Arc::clone(&cart);
        tokio::spawn(async move { cart.change_quantity("P2", 1).await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Strict mutate/refetch pairs: the second mutation waited for the
    // first one's refetch to land.
    let calls = service.calls();
    assert_eq!(calls.len(), 5);
    for pair in calls[1..].chunks(2) {
        assert!(!matches!(pair[0], OrderCall::Get { .. }));
        assert!(matches!(pair[1], OrderCall::Get { .. }));
    }

    // Both intents applied; neither refetch clobbered the other.
    let lines = cart.lines().await;
    assert_eq!(lines.iter().find(|l| l.product_id == "P1").unwrap().quantity, 3);
    assert_eq!(lines.iter().find(|l| l.product_id == "P2").unwrap().quantity, 2);
}

#[tokio::test]
async fn mutation_failure_surfaces_error_and_supports_retry() {
    let (service, cart) = order_screen();
    cart.hydrate().await.unwrap();

    service.fail_next(EngineError::Network("connection reset".to_string()));
    let err = cart.change_quantity("P1", 1).await.unwrap_err();

    assert!(matches!(err, EngineError::Network(_)));
    assert_eq!(cart.load_state(), LoadState::Error);
    // Last-good server state still on display.
    assert_eq!(cart.lines().await.len(), 2);
    assert_eq!(
        cart.lines()
            .await
            .iter()
            .find(|l| l.product_id == "P1")
            .unwrap()
            .quantity,
        2
    );

    // The UI retries the same edit.
    cart.change_quantity("P1", 1).await.unwrap();
    assert_eq!(cart.load_state(), LoadState::Ok);
    assert_eq!(
        cart.lines()
            .await
            .iter()
            .find(|l| l.product_id == "P1")
            .unwrap()
            .quantity,
        3
    );
}

#[tokio::test]
async fn settling_an_order_leaves_the_server_projection_alone() {
    // The settler works identically over both cart strategies; for a
    // remote order the clear is a no-op because the server owns the
    // lines.
    let (order_service, cart) = order_screen();
    cart.hydrate().await.unwrap();

    let transaction_service = Arc::new(InMemoryTransactionService::new());
    let catalog_service = Arc::new(InMemoryCatalog::with_products(Vec::new()));
    let settings = Settings::default();
    let settler = TransactionSettler::new(
        Arc::clone(&transaction_service) as Arc<dyn TransactionService>,
        settings.notice_ttl(),
    );
    let catalog = CatalogBrowser::new(
        Arc::clone(&catalog_service) as Arc<dyn CatalogService>,
        settings.catalog_page_size,
    );

    let receipt = settler
        .settle(&cart, &PaymentSession::new(), &catalog)
        .await
        .unwrap();

    assert_eq!(receipt.code, "V-0001");
    // Projection intact: the order outlives the settlement client-side.
    assert_eq!(cart.lines().await.len(), 2);
    assert_eq!(
        order_service.get_order("ORD-1").await.unwrap().items.len(),
        2
    );
    // The payload came from the projection lines.
    let requests = transaction_service.requests();
    assert_eq!(requests[0].items.len(), 2);
}
