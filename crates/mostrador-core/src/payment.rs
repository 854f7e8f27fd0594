//! # Payment Session
//!
//! Ephemeral state for the payment dialog: chosen settlement method,
//! free-text reference code, and cash tendered. Created fresh each time
//! the dialog opens; discarded on close or on settlement success.
//!
//! The session never gates settlement on its own fields. Readiness is
//! "cart non-empty and not currently submitting" (see the settler);
//! in particular a CASH settlement below the tendered amount is NOT
//! blocked here, matching the observed product behavior. The dialog
//! merely displays change when it is defined.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::PaymentMethod;

/// State of the payment dialog for one settlement attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentSession {
    method: PaymentMethod,

    /// Operation code for non-cash methods (wallet/card/transfer
    /// confirmation number). Free text.
    reference: Option<String>,

    /// Cash tendered by the customer. Only meaningful for
    /// [`PaymentMethod::Cash`].
    amount_received: Option<Money>,

    /// When the dialog opened.
    #[ts(as = "String")]
    opened_at: DateTime<Utc>,
}

impl PaymentSession {
    /// Opens a fresh session. Cash is the dialog's initial selection.
    pub fn new() -> Self {
        PaymentSession {
            method: PaymentMethod::Cash,
            reference: None,
            amount_received: None,
            opened_at: Utc::now(),
        }
    }

    /// Currently selected method.
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Reference code, when entered.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Cash tendered, when entered.
    pub fn amount_received(&self) -> Option<Money> {
        self.amount_received
    }

    /// When the dialog opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Selects a settlement method.
    ///
    /// Reference and tendered amount are method-specific: switching to a
    /// different method resets both. Re-selecting the current method is
    /// a no-op.
    pub fn set_method(&mut self, method: PaymentMethod) {
        if self.method == method {
            return;
        }
        self.method = method;
        self.reference = None;
        self.amount_received = None;
    }

    /// Sets the reference code. An empty (or all-whitespace) value
    /// clears it.
    pub fn set_reference(&mut self, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        self.reference = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Sets or clears the cash tendered.
    pub fn set_amount_received(&mut self, amount: Option<Money>) {
        self.amount_received = amount;
    }

    /// Change due for a CASH settlement of `total`.
    ///
    /// Defined only when the method is Cash and the tendered amount
    /// covers the total; otherwise the dialog shows nothing.
    pub fn change(&self, total: Money) -> Option<Money> {
        if self.method != PaymentMethod::Cash {
            return None;
        }
        let received = self.amount_received?;
        if received >= total {
            Some((received - total).round2())
        } else {
            None
        }
    }

    /// True when a non-cash method has no reference code yet. Display
    /// hint only; settlement is never blocked on it.
    pub fn missing_reference(&self) -> bool {
        self.method != PaymentMethod::Cash && self.reference.is_none()
    }
}

impl Default for PaymentSession {
    fn default() -> Self {
        PaymentSession::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
