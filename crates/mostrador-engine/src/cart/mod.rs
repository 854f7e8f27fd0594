//! # Cart
//!
//! Polymorphic container of line items. Two backing strategies live
//! behind one capability interface:
//!
//! - [`LocalCart`] - client-owned state for the walk-up Direct Sale
//!   screen; atomic at checkout.
//! - [`RemoteOrderCart`] - live projection of a server-held order for
//!   the Order editing screen; durable per edit.
//!
//! The checkout UI, the pricing summary and the settler are written
//! once against [`CartBackend`] and never branch on the strategy.

mod local;
mod remote;

pub use local::LocalCart;
pub use remote::RemoteOrderCart;

use async_trait::async_trait;

use mostrador_core::{summarize, CartLine, Product, TransactionSummary};

use crate::error::EngineResult;

/// The capability interface both cart strategies implement.
///
/// ## Contract
/// - `add_line`: merge into the existing line for the product
///   (quantity +1) or insert a new line with quantity 1.
/// - `change_quantity`: apply a delta to an existing line, clamped at a
///   floor of 0; a result of 0 deletes the line; no-op when the line
///   does not exist.
/// - `remove_line`: unconditional, idempotent delete.
/// - `lines`: insertion order (local) / server-return order (remote).
/// - `clear`: empties a local cart; no-op for a remote projection,
///   which has no local authority.
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Adds one unit of `product`, merging with an existing line.
    async fn add_line(&self, product: &Product) -> EngineResult<()>;

    /// Applies `delta` to the line for `product_id`, floor 0 deletes.
    async fn change_quantity(&self, product_id: &str, delta: i64) -> EngineResult<()>;

    /// Deletes the line for `product_id` if present.
    async fn remove_line(&self, product_id: &str) -> EngineResult<()>;

    /// Current lines, in presentation order.
    async fn lines(&self) -> Vec<CartLine>;

    /// Empties the cart where the client owns the state.
    async fn clear(&self) -> EngineResult<()>;

    /// Derived totals for the current lines.
    async fn summary(&self) -> TransactionSummary {
        summarize(&self.lines().await)
    }

    /// True when the cart holds no lines.
    async fn is_empty(&self) -> bool {
        self.lines().await.is_empty()
    }
}
