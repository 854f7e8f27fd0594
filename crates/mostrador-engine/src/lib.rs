//! # mostrador-engine: Screen-Backing State Machines
//!
//! Drives the two POS screens of the Mostrador back office behind one
//! set of components:
//!
//! ```text
//! CatalogBrowser ──select──► CartBackend ──lines──► pricing summary
//!                            (Local | RemoteOrder)        │
//!                                                         ▼
//! PaymentSession (dialog input) ───────────► TransactionSettler
//!                                                         │
//!                                              external service
//!                                                         │
//!                              success: clear + refresh + notice
//! ```
//!
//! The walk-up Direct Sale screen wires a [`LocalCart`]; the Order
//! editing screen wires a [`RemoteOrderCart`] over the same interface.
//! All remote collaborators stay behind the traits in [`services`];
//! the [`memory`] module provides in-process reference implementations
//! for tests and local wiring.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod memory;
pub mod services;
pub mod settings;
pub mod settle;

// Re-exports for convenience.
pub use cart::{CartBackend, LocalCart, RemoteOrderCart};
pub use catalog::{CatalogBrowser, CatalogState};
pub use error::{EngineError, EngineResult, LoadState, GENERIC_SALE_ERROR};
pub use services::{
    CatalogService, CreateTransaction, NewOrderItem, OrderService, ProductSnapshot,
    TransactionItem, TransactionReceipt, TransactionService,
};
pub use settings::Settings;
pub use settle::{SettleState, SuccessNotice, TransactionSettler};
