//! Cart store.
//!
//! The authoritative cart lives server-side; the local [`CartSnapshot`] is
//! a cache refreshed after every successful mutation. Refreshes carry a
//! sequence number assigned at call-issue time and commit last-writer-wins,
//! so a slow earlier call can never overwrite a fast later one (see
//! [`AppState::commit_cart`]).

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use shoppro_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::{CartItem, CartSnapshot};
use crate::notify::{Notifier, ToastKind};
use crate::router::{PageId, PageParams, Router};
use crate::rpc::{Ack, RpcClient};
use crate::state::AppState;

#[derive(Deserialize)]
struct CartPayload {
    cart: Vec<CartItem>,
    count: u32,
}

/// Store owning the cart slice of [`AppState`].
#[derive(Clone)]
pub struct CartStore {
    state: AppState,
    rpc: RpcClient,
    notifier: Arc<dyn Notifier>,
    router: Router,
}

impl CartStore {
    /// Create a cart store.
    #[must_use]
    pub fn new(
        state: AppState,
        rpc: RpcClient,
        notifier: Arc<dyn Notifier>,
        router: Router,
    ) -> Self {
        Self {
            state,
            rpc,
            notifier,
            router,
        }
    }

    /// Add a product to the cart.
    ///
    /// Requires a session: a guest gets a warning toast and a redirect to
    /// the login form, and the backend is not called. Stock limits are
    /// enforced by the backend, not duplicated here.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for guests and the usual call errors
    /// otherwise.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: &ProductId, quantity: u32) -> Result<CartSnapshot> {
        if self.state.current_user().is_none() {
            self.notifier
                .notify("Please sign in to add items to your cart", ToastKind::Warning);
            self.router.navigate(PageId::Auth, PageParams::login()).await?;
            return Err(AppError::Unauthorized(
                "a session is required to modify the cart".to_string(),
            ));
        }

        let seq = self.state.next_cart_seq();
        self.call_mutation("add_to_cart", &[json!(product_id), json!(quantity)])
            .await?;
        self.notifier.notify("Added to cart", ToastKind::Success);
        self.refresh_with_seq(seq).await
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Callers typically pass `current ± 1` from the panel's stepper.
    /// `quantity <= 0` is a removal request and is handled as such here,
    /// at the store boundary, rather than trusting the backend to interpret
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartSnapshot> {
        if quantity <= 0 {
            return self.remove(product_id).await;
        }

        let seq = self.state.next_cart_seq();
        self.call_mutation(
            "update_cart_quantity",
            &[json!(product_id), json!(quantity)],
        )
        .await?;
        self.refresh_with_seq(seq).await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<CartSnapshot> {
        let seq = self.state.next_cart_seq();
        self.call_mutation("remove_from_cart", &[json!(product_id)])
            .await?;
        self.notifier.notify("Removed from cart", ToastKind::Success);
        self.refresh_with_seq(seq).await
    }

    /// Fetch the authoritative snapshot and replace the local cache.
    ///
    /// No-op (keeps the prior snapshot) when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<CartSnapshot> {
        if self.state.current_user().is_none() {
            return Ok(self.state.cart());
        }

        let seq = self.state.next_cart_seq();
        self.refresh_with_seq(seq).await
    }

    /// Total of the current local snapshot.
    ///
    /// Recomputed on every call - it backs both the cart-panel total and
    /// the checkout summary, which must never show a cached figure.
    #[must_use]
    pub fn compute_total(&self) -> Decimal {
        self.state.cart().total()
    }

    async fn call_mutation(&self, method: &str, args: &[Value]) -> Result<()> {
        let _: Ack = self.rpc.call(method, args).await.map_err(|e| {
            if let Some(message) = e.backend_message() {
                self.notifier.notify(message, ToastKind::Error);
            }
            e
        })?;
        Ok(())
    }

    async fn refresh_with_seq(&self, seq: u64) -> Result<CartSnapshot> {
        let payload: CartPayload = self.rpc.call("get_cart", &[]).await?;

        let mut snapshot = CartSnapshot {
            items: payload.cart,
            count: payload.count,
        };
        if !snapshot.is_consistent() {
            tracing::warn!(count = snapshot.count, "cart count drifted from items, recounting");
            snapshot = CartSnapshot::from_items(snapshot.items);
        }

        if self.state.commit_cart(seq, snapshot.clone()) {
            Ok(snapshot)
        } else {
            tracing::debug!(seq, "stale cart refresh discarded");
            Ok(self.state.cart())
        }
    }
}
