//! # In-Memory Reference Services
//!
//! In-process implementations of the three collaborator interfaces.
//! They stand in for the remote services in tests and local wiring:
//! deterministic, call-recording, with optional failure and latency
//! injection for driving the error and concurrency paths.
//!
//! The real HTTP-backed implementations live in the embedding
//! application; the engine is written against the traits only.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use mostrador_core::{
    FulfillmentStatus, Order, OrderItem, Pagination, Product, ProductPage, ProductQuery,
};

use crate::error::{EngineError, EngineResult};
use crate::services::{
    CatalogService, CreateTransaction, NewOrderItem, OrderService, TransactionReceipt,
    TransactionService,
};

/// Shared failure/latency injection for the fakes.
#[derive(Default)]
struct Faults {
    fail_next: Mutex<Option<EngineError>>,
    delays: Mutex<VecDeque<Duration>>,
}

impl Faults {
    /// Applies the next queued delay, then the next queued failure, in
    /// that order. Called at the top of every service method.
    async fn apply(&self) -> EngineResult<()> {
        let delay = self.delays.lock().expect("faults mutex poisoned").pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_next.lock().expect("faults mutex poisoned").take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// In-memory catalog over a fixed product vector.
///
/// Filtering: free-text `search` matches name or SKU
/// (case-insensitive, substring); `brand` matches exactly.
#[derive(Default)]
pub struct InMemoryCatalog {
    products: Mutex<Vec<Product>>,
    queries: Mutex<Vec<ProductQuery>>,
    faults: Faults,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        InMemoryCatalog {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<ProductQuery> {
        self.queries.lock().expect("catalog mutex poisoned").clone()
    }

    /// Fails the next call with `err`.
    pub fn fail_next(&self, err: EngineError) {
        *self.faults.fail_next.lock().expect("faults mutex poisoned") = Some(err);
    }

    /// Delays the next call by `delay` (one queued entry per call).
    pub fn push_delay(&self, delay: Duration) {
        self.faults
            .delays
            .lock()
            .expect("faults mutex poisoned")
            .push_back(delay);
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn list_products(&self, query: &ProductQuery) -> EngineResult<ProductPage> {
        self.queries
            .lock()
            .expect("catalog mutex poisoned")
            .push(query.clone());
        self.faults.apply().await?;

        let products = self.products.lock().expect("catalog mutex poisoned");
        let needle = query
            .filters
            .search
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        let matching: Vec<Product> = products
            .iter()
            .filter(|p| {
                let text_ok = needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.sku.to_lowercase().contains(&needle);
                let brand_ok = query
                    .filters
                    .brand
                    .as_deref()
                    .map(|b| p.brand == b)
                    .unwrap_or(true);
                text_ok && brand_ok
            })
            .cloned()
            .collect();

        let per_page = query.per_page.max(1);
        let page = query.page.max(1);
        let total_items = matching.len() as u64;
        let total_pages = ((total_items + u64::from(per_page) - 1) / u64::from(per_page)) as u32;

        let start = (page as usize - 1) * per_page as usize;
        let data: Vec<Product> = matching
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        debug!(page, per_page, count = data.len(), "in-memory catalog listing");

        Ok(ProductPage {
            data,
            pagination: Pagination {
                page,
                per_page,
                total_items,
                total_pages,
            },
        })
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One recorded order-service call, for asserting wire behavior
/// (e.g. "change to 0 issues a delete, not an update").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCall {
    Get {
        order_id: String,
    },
    Add {
        order_id: String,
        product_id: String,
        quantity: i64,
    },
    UpdateQuantity {
        order_id: String,
        item_id: String,
        quantity: i64,
    },
    Delete {
        order_id: String,
        item_id: String,
    },
}

/// In-memory order store. Line ids are server-assigned (UUID v4),
/// exactly as the remote projection expects.
#[derive(Default)]
pub struct InMemoryOrderService {
    orders: Mutex<HashMap<String, Order>>,
    calls: Mutex<Vec<OrderCall>>,
    faults: Faults,
}

impl InMemoryOrderService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: Order) -> Self {
        let service = Self::default();
        service.insert_order(order);
        service
    }

    pub fn insert_order(&self, order: Order) {
        self.orders
            .lock()
            .expect("orders mutex poisoned")
            .insert(order.id.clone(), order);
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<OrderCall> {
        self.calls.lock().expect("orders mutex poisoned").clone()
    }

    pub fn fail_next(&self, err: EngineError) {
        *self.faults.fail_next.lock().expect("faults mutex poisoned") = Some(err);
    }

    pub fn push_delay(&self, delay: Duration) {
        self.faults
            .delays
            .lock()
            .expect("faults mutex poisoned")
            .push_back(delay);
    }

    fn record(&self, call: OrderCall) {
        self.calls.lock().expect("orders mutex poisoned").push(call);
    }

    fn with_order_mut<R>(
        &self,
        order_id: &str,
        f: impl FnOnce(&mut Order) -> EngineResult<R>,
    ) -> EngineResult<R> {
        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| EngineError::Rejected(format!("Order not found: {}", order_id)))?;
        f(order)
    }
}

#[async_trait]
impl OrderService for InMemoryOrderService {
    async fn get_order(&self, order_id: &str) -> EngineResult<Order> {
        self.record(OrderCall::Get {
            order_id: order_id.to_string(),
        });
        self.faults.apply().await?;

        self.orders
            .lock()
            .expect("orders mutex poisoned")
            .get(order_id)
            .cloned()
            .ok_or_else(|| EngineError::Rejected(format!("Order not found: {}", order_id)))
    }

    async fn add_item(&self, order_id: &str, item: &NewOrderItem) -> EngineResult<()> {
        self.record(OrderCall::Add {
            order_id: order_id.to_string(),
            product_id: item.product.id.clone(),
            quantity: item.quantity,
        });
        self.faults.apply().await?;

        self.with_order_mut(order_id, |order| {
            order.items.push(OrderItem {
                id: Uuid::new_v4().to_string(),
                product_id: item.product.id.clone(),
                name: item.product.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                brand: item.product.brand.clone(),
                brand_name: item.product.brand_name.clone(),
                status: FulfillmentStatus::Pending,
            });
            Ok(())
        })
    }

    async fn update_item_quantity(
        &self,
        order_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> EngineResult<()> {
        self.record(OrderCall::UpdateQuantity {
            order_id: order_id.to_string(),
            item_id: item_id.to_string(),
            quantity,
        });
        self.faults.apply().await?;

        self.with_order_mut(order_id, |order| {
            let item = order
                .items
                .iter_mut()
                .find(|i| i.id == item_id)
                .ok_or_else(|| {
                    EngineError::Rejected(format!("Order item not found: {}", item_id))
                })?;
            item.quantity = quantity;
            Ok(())
        })
    }

    async fn delete_item(&self, order_id: &str, item_id: &str) -> EngineResult<()> {
        self.record(OrderCall::Delete {
            order_id: order_id.to_string(),
            item_id: item_id.to_string(),
        });
        self.faults.apply().await?;

        self.with_order_mut(order_id, |order| {
            order.items.retain(|i| i.id != item_id);
            Ok(())
        })
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// In-memory settlement endpoint issuing sequential `V-%04d` codes.
#[derive(Default)]
pub struct InMemoryTransactionService {
    requests: Mutex<Vec<CreateTransaction>>,
    counter: Mutex<u32>,
    faults: Faults,
}

impl InMemoryTransactionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every settlement request received, in order. Empty-cart
    /// settlements must never appear here.
    pub fn requests(&self) -> Vec<CreateTransaction> {
        self.requests.lock().expect("transactions mutex poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("transactions mutex poisoned").len()
    }

    pub fn fail_next(&self, err: EngineError) {
        *self.faults.fail_next.lock().expect("faults mutex poisoned") = Some(err);
    }

    pub fn push_delay(&self, delay: Duration) {
        self.faults
            .delays
            .lock()
            .expect("faults mutex poisoned")
            .push_back(delay);
    }
}

#[async_trait]
impl TransactionService for InMemoryTransactionService {
    async fn create_transaction(
        &self,
        request: &CreateTransaction,
    ) -> EngineResult<TransactionReceipt> {
        self.requests
            .lock()
            .expect("transactions mutex poisoned")
            .push(request.clone());
        self.faults.apply().await?;

        let mut counter = self.counter.lock().expect("transactions mutex poisoned");
        *counter += 1;
        Ok(TransactionReceipt {
            code: format!("V-{:04}", *counter),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
