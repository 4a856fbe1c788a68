//! Order checkout state machine.
//!
//! `Idle → SummaryShown → Submitting → {Completed | Failed}`. A failed
//! submission rests at `Failed` until the user dismisses the failure, which
//! returns control at `SummaryShown` so they can retry without losing the
//! summary; the shipping address value itself is owned by the UI layer.

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::cart::CartStore;
use crate::error::{AppError, Result};
use crate::models::{CartItem, Order};
use crate::notify::{Notifier, ToastKind};
use crate::router::{PageId, PageParams, Router};
use crate::rpc::RpcClient;
use crate::state::AppState;

#[derive(Deserialize)]
struct OrderPayload {
    order: Order,
}

/// Phase of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    SummaryShown,
    Submitting,
    Completed,
    Failed,
}

/// The checkout summary handed to the UI: a fresh snapshot's lines and a
/// freshly computed total.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub total: Decimal,
}

/// Checkout flow over the cart store.
#[derive(Clone)]
pub struct CheckoutFlow {
    state: AppState,
    phase: Arc<Mutex<CheckoutState>>,
    rpc: RpcClient,
    notifier: Arc<dyn Notifier>,
    cart: CartStore,
    router: Router,
}

impl CheckoutFlow {
    /// Create a checkout flow.
    #[must_use]
    pub fn new(
        state: AppState,
        rpc: RpcClient,
        notifier: Arc<dyn Notifier>,
        cart: CartStore,
        router: Router,
    ) -> Self {
        Self {
            state,
            phase: Arc::new(Mutex::new(CheckoutState::Idle)),
            rpc,
            notifier,
            cart,
            router,
        }
    }

    /// Current phase of the flow.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        *self
            .phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the checkout summary.
    ///
    /// Refreshes the cart first - the local snapshot must never back the
    /// checkout total without a refresh immediately preceding it. An empty
    /// cart gets a warning toast and the flow stays `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty cart and the usual call errors
    /// when the refresh fails.
    #[instrument(skip(self))]
    pub async fn open_summary(&self) -> Result<CheckoutSummary> {
        if self.state() == CheckoutState::Submitting {
            return Err(AppError::Validation(
                "an order is already being submitted".to_string(),
            ));
        }

        let snapshot = self.cart.refresh().await?;

        if snapshot.count == 0 {
            self.notifier.notify("Your cart is empty", ToastKind::Warning);
            self.set_phase(CheckoutState::Idle);
            return Err(AppError::Validation("cart is empty".to_string()));
        }

        self.set_phase(CheckoutState::SummaryShown);
        Ok(CheckoutSummary {
            total: snapshot.total(),
            items: snapshot.items,
        })
    }

    /// Submit the order with a shipping address.
    ///
    /// The address only needs to be non-blank after trimming; everything
    /// else is the backend's call. Success clears the local cart
    /// optimistically (the backend has already consumed it), closes the
    /// flow, and navigates to the orders section of the client dashboard.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when no summary is open or the address is
    /// blank (the summary stays open), and the underlying call error when
    /// the backend rejects the order - the flow then rests at `Failed`
    /// until [`Self::dismiss_failure`] re-opens the summary.
    #[instrument(skip(self, address))]
    pub async fn submit(&self, address: &str) -> Result<Order> {
        if self.state() != CheckoutState::SummaryShown {
            return Err(AppError::Validation(
                "no checkout summary is open".to_string(),
            ));
        }

        let address = address.trim();
        if address.is_empty() {
            self.notifier
                .notify("Please enter a shipping address", ToastKind::Warning);
            return Err(AppError::Validation(
                "shipping address is required".to_string(),
            ));
        }

        self.set_phase(CheckoutState::Submitting);

        let payload: OrderPayload = match self.rpc.call("create_order", &[json!(address)]).await {
            Ok(payload) => payload,
            Err(e) => {
                if let Some(message) = e.backend_message() {
                    self.notifier.notify(message, ToastKind::Error);
                }
                // Cart and summary data stay intact for the retry.
                self.set_phase(CheckoutState::Failed);
                return Err(AppError::from(e));
            }
        };

        self.set_phase(CheckoutState::Completed);
        self.state.reset_cart();
        self.notifier
            .notify("Order placed successfully!", ToastKind::Success);

        self.router
            .navigate(PageId::ClientDashboard, PageParams::section("orders"))
            .await?;

        Ok(payload.order)
    }

    /// Acknowledge a failed submission, re-opening the summary for retry.
    ///
    /// No-op unless the flow is at `Failed`.
    pub fn dismiss_failure(&self) {
        let mut phase = self
            .phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *phase == CheckoutState::Failed {
            *phase = CheckoutState::SummaryShown;
        }
    }

    /// Close the summary without submitting.
    pub fn cancel(&self) {
        self.set_phase(CheckoutState::Idle);
    }

    fn set_phase(&self, phase: CheckoutState) {
        *self
            .phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = phase;
    }
}
