//! # Engine Error Types
//!
//! Error taxonomy of the engine, mirroring what the UI needs to do
//! with each failure:
//!
//! - [`EngineError::EmptyCart`] - validation, caught locally, never
//!   reaches the network.
//! - [`EngineError::Network`] - a collaborator call failed before
//!   producing a structured response; shown behind a generic message.
//! - [`EngineError::Rejected`] - the collaborator answered with a
//!   structured business error; its message is shown verbatim.
//!
//! Nothing here is fatal: every failure returns the owning state
//! machine to a retryable state with user-entered data preserved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mostrador_core::CoreError;

/// Generic user-facing message for failures that carry no
/// server-supplied text.
pub const GENERIC_SALE_ERROR: &str = "The sale could not be completed. Please try again.";

/// Load state of an async-backed view (catalog listing, remote-order
/// projection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight; the triggering control stays disabled.
    Loading,
    /// Last request landed successfully.
    Ok,
    /// Last request failed; previously-loaded data stays visible.
    Error,
}

/// Errors surfaced by the engine's components.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Settlement attempted with no lines in the cart. Rejected locally
    /// before any network call.
    #[error("cart is empty")]
    EmptyCart,

    /// A settlement is already in flight. The trigger control should be
    /// disabled while submitting; this guard catches the race anyway.
    #[error("a settlement is already in progress")]
    AlreadySubmitting,

    /// A collaborator call failed (transport, timeout, malformed
    /// response).
    #[error("network error: {0}")]
    Network(String),

    /// The collaborator responded with a structured business rejection.
    /// The message is server-supplied and shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Malformed input at the pure-layer boundary.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// Message suitable for direct display: server rejections verbatim,
    /// everything else behind the generic notice.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Rejected(message) => message.clone(),
            EngineError::EmptyCart => self.to_string(),
            _ => GENERIC_SALE_ERROR.to_string(),
        }
    }
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
