//! # Transaction Settler
//!
//! Orchestrates final submission of a cart: builds the settlement
//! payload from the cart and payment session, calls the transaction
//! service, and drives the success/failure/reset sequence.
//!
//! ## State machine
//! ```text
//!           settle()                 service Ok
//! Idle ───────────────► Submitting ─────────────► Settled
//!  ▲                        │                        │
//!  │      service Err       │                        │ reset()
//!  └────────────────────────┘◄───────────────────────┘
//!         (retryable: cart and session preserved)
//! ```
//!
//! On success the settler drives: cart clear, catalog refresh, and a
//! transient success notice that auto-dismisses after the configured
//! TTL. `Settled` is the dialog-close signal; the screen calls
//! [`reset`] when it starts the next sale.
//!
//! [`reset`]: TransactionSettler::reset

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use mostrador_core::PaymentSession;

use crate::cart::CartBackend;
use crate::catalog::CatalogBrowser;
use crate::error::{EngineError, EngineResult};
use crate::services::{CreateTransaction, TransactionReceipt, TransactionService};

/// Where the settler is in the submission lifecycle.
///
/// The UI disables the settle control unless the state is `Idle` or
/// `Settled`; the settler enforces the same guard against re-entrant
/// clicks anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleState {
    /// Ready to submit (including after a failure).
    Idle,
    /// A submission is in flight; further submissions are rejected.
    Submitting,
    /// Last submission succeeded; payment dialog should close.
    Settled,
}

/// Transient confirmation shown after a successful settlement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessNotice {
    /// Transaction code, also the anchor for receipt printing.
    pub code: String,
    pub shown_at: DateTime<Utc>,
}

struct NoticeSlot {
    current: Option<SuccessNotice>,
    /// Bumped on every show; a dismiss timer only clears the slot if
    /// its generation still matches, so a stale timer never kills a
    /// newer notice.
    generation: u64,
}

/// Settlement orchestrator for one POS screen.
pub struct TransactionSettler {
    service: Arc<dyn TransactionService>,
    notice_ttl: Duration,
    state: Mutex<SettleState>,
    notice: Arc<Mutex<NoticeSlot>>,
}

impl TransactionSettler {
    pub fn new(service: Arc<dyn TransactionService>, notice_ttl: Duration) -> Self {
        TransactionSettler {
            service,
            notice_ttl,
            state: Mutex::new(SettleState::Idle),
            notice: Arc::new(Mutex::new(NoticeSlot {
                current: None,
                generation: 0,
            })),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SettleState {
        *self.state.lock().expect("settler mutex poisoned")
    }

    /// The success notice, while it is visible.
    pub fn success_notice(&self) -> Option<SuccessNotice> {
        self.notice
            .lock()
            .expect("notice mutex poisoned")
            .current
            .clone()
    }

    /// Acknowledges a settled sale (dialog closed, next sale started).
    /// Ignored while a submission is in flight.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("settler mutex poisoned");
        if *state != SettleState::Submitting {
            *state = SettleState::Idle;
        }
    }

    /// Submits the cart for settlement.
    ///
    /// ## Preconditions
    /// - Cart non-empty: an empty cart is rejected locally with
    ///   [`EngineError::EmptyCart`] and never reaches the network.
    /// - Not already submitting: a second click while in flight gets
    ///   [`EngineError::AlreadySubmitting`].
    ///
    /// On success: cart cleared (local strategy), catalog re-searched
    /// for its current page, success notice shown, `Settled` returned
    /// to the screen. On failure: back to `Idle` with cart and session
    /// untouched, so the user retries without re-entering anything.
    pub async fn settle(
        &self,
        cart: &dyn CartBackend,
        session: &PaymentSession,
        catalog: &CatalogBrowser,
    ) -> EngineResult<TransactionReceipt> {
        let lines = cart.lines().await;
        if lines.is_empty() {
            debug!("settle rejected: empty cart");
            return Err(EngineError::EmptyCart);
        }

        {
            let mut state = self.state.lock().expect("settler mutex poisoned");
            if *state == SettleState::Submitting {
                debug!("settle rejected: already submitting");
                return Err(EngineError::AlreadySubmitting);
            }
            *state = SettleState::Submitting;
        }

        let request = CreateTransaction::from_lines(&lines, session.method());
        info!(
            items = request.items.len(),
            method = session.method().as_str(),
            "submitting settlement"
        );

        match self.service.create_transaction(&request).await {
            Ok(receipt) => {
                *self.state.lock().expect("settler mutex poisoned") = SettleState::Settled;

                if let Err(err) = cart.clear().await {
                    warn!(error = %err, "cart clear after settlement failed");
                }
                if let Err(err) = catalog.refresh().await {
                    // Non-fatal: the listing keeps its previous page.
                    warn!(error = %err, "catalog refresh after settlement failed");
                }
                self.show_notice(receipt.code.clone());

                info!(code = %receipt.code, "settlement recorded");
                Ok(receipt)
            }
            Err(err) => {
                *self.state.lock().expect("settler mutex poisoned") = SettleState::Idle;
                warn!(error = %err, "settlement failed; state back to idle");
                Err(err)
            }
        }
    }

    /// Shows the success notice and schedules its auto-dismiss.
    fn show_notice(&self, code: String) {
        let generation = {
            let mut slot = self.notice.lock().expect("notice mutex poisoned");
            slot.generation += 1;
            slot.current = Some(SuccessNotice {
                code,
                shown_at: Utc::now(),
            });
            slot.generation
        };

        // Fire-and-forget; if the screen unmounts, the cleared Arc slot
        // is simply dropped after the timer fires.
        let slot = Arc::clone(&self.notice);
        let ttl = self.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slot = slot.lock().expect("notice mutex poisoned");
            if slot.generation == generation {
                slot.current = None;
            }
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
