//! # Remote-Order Cart
//!
//! Cart for the Order editing screen: a live projection of a
//! server-held order. Every mutation is a request to the order service
//! **followed by a full refetch** before the projection updates; there
//! is no optimistic update and no local stock ceiling, because the
//! server is authoritative.
//!
//! ```text
//! mutation      refetch        projection
//! add_item ──► get_order ──► lines replaced (server order)
//!    │
//!    └─ on failure: load = Error, lines keep last-good state
//! ```
//!
//! Mutations on one order are serialized: a mutation's refetch must
//! complete before the next mutation is issued, so a stale refetch can
//! never overwrite a newer intent. Concurrent callers queue on the
//! operation lock.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use mostrador_core::{CartLine, Product};

use crate::cart::CartBackend;
use crate::error::{EngineError, EngineResult, LoadState};
use crate::services::{NewOrderItem, OrderService, ProductSnapshot};

struct Projection {
    /// Lines in server-return order.
    lines: Vec<CartLine>,
    load: LoadState,
}

/// Live projection of one server-held order.
pub struct RemoteOrderCart {
    order_id: String,
    service: Arc<dyn OrderService>,
    projection: Mutex<Projection>,

    /// Serializes mutate+refetch pairs per order.
    op_lock: tokio::sync::Mutex<()>,
}

impl RemoteOrderCart {
    /// Creates the projection for `order_id`. Call [`hydrate`] before
    /// first display.
    ///
    /// [`hydrate`]: RemoteOrderCart::hydrate
    pub fn new(order_id: impl Into<String>, service: Arc<dyn OrderService>) -> Self {
        RemoteOrderCart {
            order_id: order_id.into(),
            service,
            projection: Mutex::new(Projection {
                lines: Vec::new(),
                load: LoadState::Idle,
            }),
            op_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// The order this cart projects.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Current load state. `Error` means the last operation failed and
    /// the lines show the last-good server state; the caller may retry.
    pub fn load_state(&self) -> LoadState {
        self.projection.lock().expect("projection mutex poisoned").load
    }

    /// Initial load of the projection (screen mount).
    pub async fn hydrate(&self) -> EngineResult<()> {
        let _op = self.op_lock.lock().await;
        self.begin();
        self.refetch().await.map_err(|e| self.fail(e))
    }

    fn begin(&self) {
        self.projection
            .lock()
            .expect("projection mutex poisoned")
            .load = LoadState::Loading;
    }

    fn fail(&self, err: EngineError) -> EngineError {
        self.projection
            .lock()
            .expect("projection mutex poisoned")
            .load = LoadState::Error;
        err
    }

    fn find_line(&self, product_id: &str) -> Option<CartLine> {
        self.projection
            .lock()
            .expect("projection mutex poisoned")
            .lines
            .iter()
            .find(|l| l.product_id == product_id)
            .cloned()
    }

    /// Refetches the order and replaces the projection wholesale.
    async fn refetch(&self) -> EngineResult<()> {
        let order = self.service.get_order(&self.order_id).await?;
        let lines: Vec<CartLine> = order.items.iter().map(|i| i.to_cart_line()).collect();

        let mut projection = self.projection.lock().expect("projection mutex poisoned");
        projection.lines = lines;
        projection.load = LoadState::Ok;
        Ok(())
    }

    /// Completes a mutation: refetch on success, mark error otherwise.
    async fn finish(&self, request_result: EngineResult<()>) -> EngineResult<()> {
        match request_result {
            Ok(()) => self.refetch().await.map_err(|e| self.fail(e)),
            Err(e) => Err(self.fail(e)),
        }
    }
}

#[async_trait]
impl CartBackend for RemoteOrderCart {
    async fn add_line(&self, product: &Product) -> EngineResult<()> {
        let _op = self.op_lock.lock().await;
        self.begin();

        let existing = self.find_line(&product.id);
        let request_result = match existing {
            Some(CartLine {
                line_id: Some(ref line_id),
                quantity,
                ..
            }) => {
                self.service
                    .update_item_quantity(&self.order_id, line_id, quantity + 1)
                    .await
            }
            _ => {
                let item = NewOrderItem {
                    product: ProductSnapshot::from(product),
                    quantity: 1,
                    unit_price: product.price.amount,
                };
                self.service.add_item(&self.order_id, &item).await
            }
        };

        self.finish(request_result).await
    }

    async fn change_quantity(&self, product_id: &str, delta: i64) -> EngineResult<()> {
        let _op = self.op_lock.lock().await;

        let Some(line) = self.find_line(product_id) else {
            // Line not on the order; nothing to do.
            return Ok(());
        };
        let Some(line_id) = line.line_id.clone() else {
            return Ok(());
        };

        self.begin();
        let target = (line.quantity + delta).max(0);
        let request_result = if target == 0 {
            // A zeroed line is deleted, never updated to quantity 0.
            self.service.delete_item(&self.order_id, &line_id).await
        } else {
            self.service
                .update_item_quantity(&self.order_id, &line_id, target)
                .await
        };

        self.finish(request_result).await
    }

    async fn remove_line(&self, product_id: &str) -> EngineResult<()> {
        let _op = self.op_lock.lock().await;

        let Some(line_id) = self.find_line(product_id).and_then(|l| l.line_id) else {
            // Already gone; removal is idempotent.
            return Ok(());
        };

        self.begin();
        let request_result = self.service.delete_item(&self.order_id, &line_id).await;
        self.finish(request_result).await
    }

    async fn lines(&self) -> Vec<CartLine> {
        self.projection
            .lock()
            .expect("projection mutex poisoned")
            .lines
            .clone()
    }

    async fn clear(&self) -> EngineResult<()> {
        // The server owns the order; a settlement never clears it from
        // the client side.
        debug!(order_id = %self.order_id, "clear() ignored for remote-order cart");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryOrderService, OrderCall};
    use mostrador_core::{
        FulfillmentStatus, Money, Order, OrderItem, PriceInfo, StockLevel,
    };
    use rust_decimal_macros::dec;

    fn product(id: &str, price: rust_decimal::Decimal) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            brand: "B1".to_string(),
            brand_name: None,
            stock: StockLevel {
                current: 99,
                minimum: 0,
            },
            price: PriceInfo {
                amount: Money::new(price),
                currency: "PEN".to_string(),
                label: format!("S/ {:.2}", price),
            },
        }
    }

    fn seeded_order() -> Order {
        Order {
            id: "ORD-1".to_string(),
            code: Some("P-0042".to_string()),
            items: vec![OrderItem {
                id: "L1".to_string(),
                product_id: "P1".to_string(),
                name: "Product P1".to_string(),
                unit_price: Money::new(dec!(10.00)),
                quantity: 2,
                brand: None,
                brand_name: None,
                status: FulfillmentStatus::Pending,
            }],
        }
    }

    fn cart_with(service: Arc<InMemoryOrderService>) -> RemoteOrderCart {
        RemoteOrderCart::new("ORD-1", service)
    }

    #[tokio::test]
    async fn test_hydrate_projects_server_lines() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(service);

        cart.hydrate().await.unwrap();

        let lines = cart.lines().await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_id.as_deref(), Some("L1"));
        assert_eq!(lines[0].subtotal, Money::new(dec!(20.00)));
        assert_eq!(cart.load_state(), LoadState::Ok);
    }

    #[tokio::test]
    async fn test_add_new_product_issues_add_then_refetch() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(Arc::clone(&service));
        cart.hydrate().await.unwrap();

        cart.add_line(&product("P2", dec!(4.50))).await.unwrap();

        let lines = cart.lines().await;
        assert_eq!(lines.len(), 2);
        // New line identity comes from the server, via the refetch.
        assert!(lines[1].line_id.is_some());

        let calls = service.calls();
        assert!(matches!(
            calls[calls.len() - 2],
            OrderCall::Add { ref product_id, quantity: 1, .. } if product_id == "P2"
        ));
        assert!(matches!(calls[calls.len() - 1], OrderCall::Get { .. }));
    }

    #[tokio::test]
    async fn test_add_existing_product_issues_update() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(Arc::clone(&service));
        cart.hydrate().await.unwrap();

        cart.add_line(&product("P1", dec!(10.00))).await.unwrap();

        assert_eq!(cart.lines().await[0].quantity, 3);
        assert!(service.calls().iter().any(|c| matches!(
            c,
            OrderCall::UpdateQuantity { item_id, quantity: 3, .. } if item_id == "L1"
        )));
    }

    #[tokio::test]
    async fn test_change_to_zero_issues_delete_not_update() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(Arc::clone(&service));
        cart.hydrate().await.unwrap();

        cart.change_quantity("P1", -2).await.unwrap();

        assert!(cart.is_empty().await);
        let calls = service.calls();
        assert!(calls
            .iter()
            .any(|c| matches!(c, OrderCall::Delete { item_id, .. } if item_id == "L1")));
        assert!(!calls
            .iter()
            .any(|c| matches!(c, OrderCall::UpdateQuantity { quantity: 0, .. })));
    }

    #[tokio::test]
    async fn test_change_quantity_missing_line_is_noop() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(Arc::clone(&service));
        cart.hydrate().await.unwrap();
        let calls_before = service.calls().len();

        cart.change_quantity("GHOST", 1).await.unwrap();

        assert_eq!(service.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(Arc::clone(&service));
        cart.hydrate().await.unwrap();

        cart.remove_line("P1").await.unwrap();
        cart.remove_line("P1").await.unwrap();
        assert!(cart.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_is_noop() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(Arc::clone(&service));
        cart.hydrate().await.unwrap();

        cart.clear().await.unwrap();

        // The projection still shows the server's lines.
        assert_eq!(cart.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mutation_failure_keeps_last_good_lines() {
        let service = Arc::new(InMemoryOrderService::with_order(seeded_order()));
        let cart = cart_with(Arc::clone(&service));
        cart.hydrate().await.unwrap();

        service.fail_next(EngineError::Network("boom".to_string()));
        let err = cart.add_line(&product("P2", dec!(4.50))).await.unwrap_err();

        assert!(matches!(err, EngineError::Network(_)));
        assert_eq!(cart.load_state(), LoadState::Error);
        assert_eq!(cart.lines().await.len(), 1);

        // Retry succeeds and clears the error state.
        cart.add_line(&product("P2", dec!(4.50))).await.unwrap();
        assert_eq!(cart.load_state(), LoadState::Ok);
        assert_eq!(cart.lines().await.len(), 2);
    }
}
