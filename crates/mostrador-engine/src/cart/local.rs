//! # Local Cart
//!
//! Client-owned cart for the walk-up Direct Sale screen. All mutations
//! are synchronous and optimistic; nothing is persisted until the
//! settler finalizes the sale atomically.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use mostrador_core::{CartLine, Product};

use crate::cart::CartBackend;
use crate::error::EngineResult;

struct LocalState {
    /// Lines in insertion order.
    lines: Vec<CartLine>,

    /// When the cart was created or last cleared.
    created_at: DateTime<Utc>,
}

/// Client-side cart state.
///
/// ## Stock ceiling
/// `add_line` refuses to grow a line past `product.stock.current`.
/// The ceiling is advisory: stock is not re-checked against the live
/// catalog before settlement (a tolerated race; the transaction
/// service re-validates and rejects with its own message).
///
/// ## Thread safety
/// Wrapped in a `Mutex` so the engine can hand out `Arc<LocalCart>`;
/// all mutation entry points are UI actions, so contention is nil.
pub struct LocalCart {
    state: Mutex<LocalState>,
}

impl LocalCart {
    /// Creates an empty cart (screen mount).
    pub fn new() -> Self {
        LocalCart {
            state: Mutex::new(LocalState {
                lines: Vec::new(),
                created_at: Utc::now(),
            }),
        }
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.state.lock().expect("cart mutex poisoned").created_at
    }
}

impl Default for LocalCart {
    fn default() -> Self {
        LocalCart::new()
    }
}

#[async_trait]
impl CartBackend for LocalCart {
    async fn add_line(&self, product: &Product) -> EngineResult<()> {
        let mut state = self.state.lock().expect("cart mutex poisoned");

        if let Some(line) = state
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            if line.quantity >= product.stock.current {
                debug!(
                    product_id = %product.id,
                    stock = product.stock.current,
                    "add_line clamped at stock ceiling"
                );
                return Ok(());
            }
            line.quantity += 1;
            line.recompute_subtotal();
            return Ok(());
        }

        if product.stock.current < 1 {
            debug!(product_id = %product.id, "add_line refused: no stock");
            return Ok(());
        }

        state.lines.push(CartLine::from_product(product));
        Ok(())
    }

    async fn change_quantity(&self, product_id: &str, delta: i64) -> EngineResult<()> {
        let mut state = self.state.lock().expect("cart mutex poisoned");

        let Some(index) = state.lines.iter().position(|l| l.product_id == product_id) else {
            // Line already gone; nothing to do.
            return Ok(());
        };

        let new_quantity = (state.lines[index].quantity + delta).max(0);
        if new_quantity == 0 {
            state.lines.remove(index);
        } else {
            let line = &mut state.lines[index];
            line.quantity = new_quantity;
            line.recompute_subtotal();
        }
        Ok(())
    }

    async fn remove_line(&self, product_id: &str) -> EngineResult<()> {
        let mut state = self.state.lock().expect("cart mutex poisoned");
        state.lines.retain(|l| l.product_id != product_id);
        Ok(())
    }

    async fn lines(&self) -> Vec<CartLine> {
        self.state.lock().expect("cart mutex poisoned").lines.clone()
    }

    async fn clear(&self) -> EngineResult<()> {
        let mut state = self.state.lock().expect("cart mutex poisoned");
        state.lines.clear();
        state.created_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
