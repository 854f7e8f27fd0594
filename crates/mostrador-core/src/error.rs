//! # Error Types
//!
//! Domain errors for mostrador-core. Engine-level failures (network,
//! server rejections, settlement guards) live in the engine crate and
//! wrap these via `#[from]`.

use thiserror::Error;

/// Core domain errors.
///
/// These represent malformed input at the edges of the pure layer.
/// Each variant carries enough context for a user-facing message.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// A monetary amount could not be parsed (e.g. the tendered-amount
    /// field of the payment dialog).
    #[error("invalid amount: {input:?}")]
    InvalidAmount { input: String },

    /// A payment method string did not match any known method.
    #[error("unknown payment method: {0:?}")]
    UnknownPaymentMethod(String),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
