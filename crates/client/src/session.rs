//! Session store: login, registration, logout, and boot-time restore.
//!
//! Owns the `session` slice of [`AppState`]. Navigation after a successful
//! login is the caller's job ([`PageId::home_for`] gives the destination);
//! logout navigates back to the landing page itself, mirroring the original
//! flow.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::cart::CartStore;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use crate::notify::{Notifier, ToastKind};
use crate::router::{PageId, PageParams, Router};
use crate::rpc::{Ack, RpcClient};
use crate::state::AppState;

#[derive(Deserialize)]
struct UserPayload {
    user: User,
}

#[derive(Deserialize)]
struct MaybeUserPayload {
    #[serde(default)]
    user: Option<User>,
}

/// Store owning the session slice of [`AppState`].
#[derive(Clone)]
pub struct SessionStore {
    state: AppState,
    rpc: RpcClient,
    notifier: Arc<dyn Notifier>,
    cart: CartStore,
    router: Router,
}

impl SessionStore {
    /// Create a session store.
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
            rpc,
            notifier,
            cart,
            router,
        }
    }

    /// Sign in with email and password.
    ///
    /// On success the session is hydrated and the cart refreshed; the
    /// returned user lets the caller navigate by role. On logical failure
    /// the backend's message is surfaced verbatim and the session is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User> {
        let args = [json!(email), json!(password.expose_secret())];
        let payload: UserPayload = self.rpc.call("login", &args).await.map_err(|e| {
            if let Some(message) = e.backend_message() {
                self.notifier.notify(message, ToastKind::Error);
            }
            AppError::from(e)
        })?;

        self.state.set_user(Some(payload.user.clone()));
        self.notifier.notify("Signed in", ToastKind::Success);

        if let Err(e) = self.cart.refresh().await {
            tracing::warn!(error = %e, "cart refresh after login failed");
        }

        Ok(payload.user)
    }

    /// Create an account.
    ///
    /// A successful registration immediately authenticates the new user;
    /// there is no separate confirmation step. The caller then navigates to
    /// the shop.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: &NewUser) -> Result<User> {
        let args = [
            json!(new_user.email),
            json!(new_user.password.expose_secret()),
            json!(new_user.firstname),
            json!(new_user.lastname),
            json!(new_user.role),
        ];
        let payload: UserPayload = self.rpc.call("register", &args).await.map_err(|e| {
            if let Some(message) = e.backend_message() {
                self.notifier.notify(message, ToastKind::Error);
            }
            AppError::from(e)
        })?;

        self.state.set_user(Some(payload.user.clone()));
        self.notifier.notify("Account created", ToastKind::Success);

        Ok(payload.user)
    }

    /// Sign out.
    ///
    /// The backend call is best-effort: local teardown (session cleared,
    /// cart reset, navigation to landing) proceeds whatever it returns.
    ///
    /// # Errors
    ///
    /// Returns an error only if rendering the landing page fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.rpc.call::<Ack>("logout", &[]).await {
            tracing::warn!(error = %e, "backend logout failed, tearing down locally");
        }

        self.state.set_user(None);
        self.state.reset_cart();
        self.notifier.notify("Signed out", ToastKind::Success);

        self.router.navigate(PageId::Landing, PageParams::new()).await
    }

    /// Restore the session at boot from the backend's "current user".
    ///
    /// An absent user is the normal guest case, never an error; a failing
    /// backend degrades to the same thing.
    ///
    /// # Errors
    ///
    /// Currently infallible; returns `Result` for signature stability.
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> Result<()> {
        match self.rpc.call::<MaybeUserPayload>("get_current_user", &[]).await {
            Ok(MaybeUserPayload { user: Some(user) }) => {
                tracing::info!(email = %user.email, "session restored");
                self.state.set_user(Some(user));
                if let Err(e) = self.cart.refresh().await {
                    tracing::warn!(error = %e, "cart refresh after restore failed");
                }
            }
            Ok(MaybeUserPayload { user: None }) => {
                tracing::debug!("no session to restore");
            }
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed, continuing as guest");
            }
        }
        Ok(())
    }
}
