//! # mostrador-core: Pure Business Logic
//!
//! The heart of the Mostrador POS engine: monetary arithmetic, the
//! fixed pricing policy, the domain types shared with the TypeScript
//! frontend, and the payment-dialog session.
//!
//! ## Architecture position
//! ```text
//! UI (TypeScript)  ->  mostrador-engine  ->  mostrador-core (THIS CRATE)
//!                      carts, catalog,       Money, pricing,
//!                      settler, services     types, PaymentSession
//! ```
//!
//! ## Design principles
//! 1. **Pure functions**: deterministic, same input = same output.
//! 2. **No I/O**: network and persistence live behind the engine's
//!    service traits, never here.
//! 3. **Decimal money**: every amount is a 2-decimal [`Money`];
//!    floating point never enters the arithmetic.
//! 4. **Explicit errors**: typed variants, never strings or panics.

pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod types;

// Re-exports for convenience: `use mostrador_core::Money` instead of
// `use mostrador_core::money::Money`.
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use payment::PaymentSession;
pub use pricing::{summarize, TAX_RATE};
pub use types::*;
