//! Shared fixtures for the engine integration tests.
#![allow(dead_code)]

use rust_decimal::Decimal;

use mostrador_core::{
    FulfillmentStatus, Money, Order, OrderItem, PriceInfo, Product, StockLevel,
};

/// Installs a test tracing subscriber once per process. `RUST_LOG`
/// controls verbosity as usual.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn product(id: &str, name: &str, price: Decimal, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        sku: format!("SKU-{}", id),
        brand: "B1".to_string(),
        brand_name: Some("Marca Uno".to_string()),
        stock: StockLevel {
            current: stock,
            minimum: 1,
        },
        price: PriceInfo {
            amount: Money::new(price),
            currency: "PEN".to_string(),
            label: format!("S/ {:.2}", price),
        },
    }
}

pub fn order_item(
    id: &str,
    product_id: &str,
    name: &str,
    price: Decimal,
    quantity: i64,
) -> OrderItem {
    OrderItem {
        id: id.to_string(),
        product_id: product_id.to_string(),
        name: name.to_string(),
        unit_price: Money::new(price),
        quantity,
        brand: Some("B1".to_string()),
        brand_name: Some("Marca Uno".to_string()),
        status: FulfillmentStatus::Pending,
    }
}

pub fn order(id: &str, items: Vec<OrderItem>) -> Order {
    Order {
        id: id.to_string(),
        code: Some(format!("P-{}", id)),
        items,
    }
}
