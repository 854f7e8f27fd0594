//! # Domain Types
//!
//! Core domain types for the POS cart and settlement engine.
//!
//! Types that cross to the TypeScript frontend carry `TS` derives and
//! `camelCase` serde renames. The snapshot pattern applies throughout:
//! a [`CartLine`] freezes the product name and unit price at the moment
//! the line is created, so a catalog update never changes an open cart.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// Stock levels for a product. Advisory only: the client never reserves
/// stock, and the transaction service re-validates at settlement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockLevel {
    /// Units currently on hand (non-negative).
    pub current: i64,

    /// Reorder threshold (non-negative).
    pub minimum: i64,
}

/// Price of a product as served by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceInfo {
    /// Amount in the store currency.
    pub amount: Money,

    /// ISO 4217 currency code (e.g. "PEN").
    pub currency: String,

    /// Pre-formatted display string from the catalog (e.g. "S/ 10.00").
    pub label: String,
}

/// A product available for sale. Read-only, sourced from the catalog
/// service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown in the listing and on the cart line.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Brand identifier.
    pub brand: String,

    /// Brand display name, when the catalog resolves it.
    pub brand_name: Option<String>,

    /// Advisory stock levels.
    pub stock: StockLevel,

    /// Current price.
    pub price: PriceInfo,
}

// =============================================================================
// Cart Line
// =============================================================================

/// Fulfillment status of a server-held order line.
///
/// Only present on lines backed by a remote order; local (walk-up) cart
/// lines have no fulfillment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FulfillmentStatus {
    Pending,
    Dispatched,
    Cancelled,
}

/// One product entry in a cart.
///
/// ## Invariants
/// - `product_id` is unique across a cart's lines.
/// - `quantity > 0` while the line exists; a line reaching 0 is removed,
///   never stored at 0.
/// - `subtotal == round2(quantity * unit_price)` after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Product this line refers to; the line's key within the cart.
    pub product_id: String,

    /// Product name at the time the line was created (frozen).
    pub name: String,

    /// Unit price at the time the line was created (frozen, >= 0).
    pub unit_price: Money,

    /// Aggregated quantity (> 0).
    pub quantity: i64,

    /// `round2(quantity * unit_price)`.
    pub subtotal: Money,

    /// Brand identifier carried from the product.
    pub brand: Option<String>,

    /// Brand display name carried from the product.
    pub brand_name: Option<String>,

    /// Server-assigned line identity. Remote-order mode only.
    pub line_id: Option<String>,

    /// Fulfillment status. Remote-order mode only.
    pub fulfillment_status: Option<FulfillmentStatus>,
}

impl CartLine {
    /// Creates a new local line for `product` with quantity 1.
    ///
    /// Freezes name and unit price; a later catalog price change does
    /// not touch open carts.
    pub fn from_product(product: &Product) -> Self {
        let mut line = CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price.amount,
            quantity: 1,
            subtotal: Money::zero(),
            brand: Some(product.brand.clone()),
            brand_name: product.brand_name.clone(),
            line_id: None,
            fulfillment_status: None,
        };
        line.recompute_subtotal();
        line
    }

    /// Re-establishes `subtotal == round2(quantity * unit_price)`.
    ///
    /// Call after every quantity mutation.
    pub fn recompute_subtotal(&mut self) {
        self.subtotal = self.unit_price.times(self.quantity).round2();
    }
}

// =============================================================================
// Remote Order Projection
// =============================================================================

/// A line item of a server-held order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    /// Server-assigned line identity.
    pub id: String,

    /// Product this line refers to.
    pub product_id: String,

    /// Product name snapshot held by the order.
    pub name: String,

    /// Unit price snapshot held by the order.
    pub unit_price: Money,

    /// Quantity on the order (> 0; the server deletes zeroed lines).
    pub quantity: i64,

    /// Brand identifier, when the order carries it.
    pub brand: Option<String>,

    /// Brand display name, when the order carries it.
    pub brand_name: Option<String>,

    /// Fulfillment status of this line.
    pub status: FulfillmentStatus,
}

impl OrderItem {
    /// Projects this server line into a cart line.
    pub fn to_cart_line(&self) -> CartLine {
        let mut line = CartLine {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            subtotal: Money::zero(),
            brand: self.brand.clone(),
            brand_name: self.brand_name.clone(),
            line_id: Some(self.id.clone()),
            fulfillment_status: Some(self.status),
        };
        line.recompute_subtotal();
        line
    }
}

/// A server-held order, as returned by the order service. The
/// remote-order cart is a live projection of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// Unique identifier.
    pub id: String,

    /// Business code, once the order has one (e.g. "P-0042").
    pub code: Option<String>,

    /// Line items in server-return order.
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Catalog Listing
// =============================================================================

/// Page metadata returned alongside a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,

    /// Page size the listing was produced with.
    pub per_page: u32,

    /// Total matching items across all pages.
    pub total_items: u64,

    /// Total page count.
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            per_page: 0,
            total_items: 0,
            total_pages: 0,
        }
    }
}

/// Filters applied to a product listing. Applied only at explicit
/// search invocation, never per keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductFilters {
    /// Free-text match against name and SKU.
    pub search: Option<String>,

    /// Restrict to one brand.
    pub brand: Option<String>,
}

/// A product listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductQuery {
    pub filters: ProductFilters,
    pub page: u32,
    pub per_page: u32,
}

/// One page of products plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub pagination: Pagination,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Settlement methods accepted at the counter.
///
/// Wire values are the upstream service's SCREAMING_SNAKE constants
/// (`"CASH"`, `"YAPE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash; the only method with a tendered amount and change.
    Cash,
    /// Yape wallet transfer.
    Yape,
    /// Plin wallet transfer.
    Plin,
    /// Card payment on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
    /// Store credit.
    Credit,
    /// Anything else; reference code describes it.
    Other,
}

impl PaymentMethod {
    /// All methods, in the order the payment dialog offers them.
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Cash,
        PaymentMethod::Yape,
        PaymentMethod::Plin,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
        PaymentMethod::Credit,
        PaymentMethod::Other,
    ];

    /// The wire constant for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Yape => "YAPE",
            PaymentMethod::Plin => "PLIN",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Other => "OTHER",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPaymentMethod(s.to_string()))
    }
}

// =============================================================================
// Transaction Summary
// =============================================================================

/// Derived totals for a cart. Never stored; recomputed from the lines
/// by the pricing engine on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionSummary {
    /// `round2(sum of line subtotals)`.
    pub subtotal: Money,

    /// `round2(subtotal * TAX_RATE)`.
    pub tax: Money,

    /// `round2(subtotal + tax)`.
    pub total: Money,
}

impl TransactionSummary {
    /// The all-zero summary of an empty cart.
    pub fn empty() -> Self {
        TransactionSummary {
            subtotal: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
