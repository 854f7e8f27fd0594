//! # Collaborator Service Interfaces
//!
//! The remote catalog, order and transaction services the engine
//! drives, expressed as object-safe async traits. The HTTP transport,
//! auth and base-URL configuration are the embedding application's
//! concern; the engine only sees these interfaces.
//!
//! For tests and local wiring, the [`crate::memory`] module provides
//! in-memory implementations of all three.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mostrador_core::{
    CartLine, Money, Order, PaymentMethod, Product, ProductPage, ProductQuery,
};

use crate::error::EngineResult;

// =============================================================================
// Request / Response Shapes
// =============================================================================

/// Frozen product identity carried inside settlement and order-item
/// payloads. The services re-resolve nothing from it; it records what
/// the cashier saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub brand: Option<String>,
    pub brand_name: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        ProductSnapshot {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.amount,
            brand: Some(product.brand.clone()),
            brand_name: product.brand_name.clone(),
        }
    }
}

impl From<&CartLine> for ProductSnapshot {
    fn from(line: &CartLine) -> Self {
        ProductSnapshot {
            id: line.product_id.clone(),
            name: line.name.clone(),
            price: line.unit_price,
            brand: line.brand.clone(),
            brand_name: line.brand_name.clone(),
        }
    }
}

/// One item of a settlement request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub product: ProductSnapshot,
    pub quantity: i64,
}

/// A settlement request: the cart lines plus the chosen method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    pub items: Vec<TransactionItem>,
    pub payment_method: PaymentMethod,
}

impl CreateTransaction {
    /// Builds the settlement payload from a cart's lines.
    pub fn from_lines(lines: &[CartLine], payment_method: PaymentMethod) -> Self {
        CreateTransaction {
            items: lines
                .iter()
                .map(|line| TransactionItem {
                    product: ProductSnapshot::from(line),
                    quantity: line.quantity,
                })
                .collect(),
            payment_method,
        }
    }
}

/// The recorded transaction, as acknowledged by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Business code of the transaction (e.g. "V-0001"); anchor for the
    /// success notice and receipt printing.
    pub code: String,
}

/// A new line for a server-held order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product: ProductSnapshot,
    pub quantity: i64,
    pub unit_price: Money,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Paginated, filterable product listing.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists one page of products matching `query`.
    async fn list_products(&self, query: &ProductQuery) -> EngineResult<ProductPage>;
}

/// Settlement of a cart into a recorded transaction.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Records the transaction and returns its business code.
    ///
    /// Business rejections (e.g. stock re-validation at settlement
    /// time) come back as [`crate::EngineError::Rejected`] with the
    /// server's message.
    async fn create_transaction(
        &self,
        request: &CreateTransaction,
    ) -> EngineResult<TransactionReceipt>;
}

/// Line-item mutations on a server-held order.
///
/// Mutations acknowledge only; callers refetch via [`get_order`]
/// before reflecting a change (the server is authoritative, including
/// over line identity and ordering).
///
/// [`get_order`]: OrderService::get_order
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Fetches the full order, items in server-return order.
    async fn get_order(&self, order_id: &str) -> EngineResult<Order>;

    /// Appends a line to the order.
    async fn add_item(&self, order_id: &str, item: &NewOrderItem) -> EngineResult<()>;

    /// Sets the quantity of an existing line. Never called with 0;
    /// zeroed lines are deleted instead.
    async fn update_item_quantity(
        &self,
        order_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> EngineResult<()>;

    /// Removes a line from the order.
    async fn delete_item(&self, order_id: &str, item_id: &str) -> EngineResult<()>;
}

// =============================================================================
// Unit Tests
// =============================================================================
