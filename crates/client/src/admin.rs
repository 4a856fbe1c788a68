//! Admin dashboard operations: user directory and order administration.
//!
//! Role enforcement happens server-side; these wrappers surface the
//! backend's "unauthorized" message like any other logical failure.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use shoppro_core::{OrderId, OrderStatus, UserId};

use crate::error::{AppError, Result};
use crate::models::{Order, User, UserPatch};
use crate::notify::{Notifier, ToastKind};
use crate::orders::OrdersPayload;
use crate::rpc::{Ack, CallError, RpcClient};

#[derive(Deserialize)]
struct UsersPayload {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct UserPayload {
    user: User,
}

/// Administration surface for the admin dashboard.
#[derive(Clone)]
pub struct AdminService {
    rpc: RpcClient,
    notifier: Arc<dyn Notifier>,
}

impl AdminService {
    /// Create an admin service.
    #[must_use]
    pub fn new(rpc: RpcClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { rpc, notifier }
    }

    /// All registered users.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self))]
    pub async fn all_users(&self) -> Result<Vec<User>> {
        let payload: UsersPayload = self.rpc.call("get_all_users", &[]).await?;
        Ok(payload.users)
    }

    /// A single user by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the backend does not know the user.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn user(&self, user_id: &UserId) -> Result<User> {
        let payload: UserPayload = self
            .rpc
            .call("get_user", &[json!(user_id)])
            .await
            .map_err(|e| match e {
                CallError::Backend { message } => AppError::NotFound(message),
                other => AppError::from(other),
            })?;
        Ok(payload.user)
    }

    /// Update fields of a user record.
    ///
    /// A role change here does not touch any live session snapshot; it
    /// takes effect when that user's identity is next fetched.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self, patch), fields(user_id = %user_id))]
    pub async fn update_user(&self, user_id: &UserId, patch: &UserPatch) -> Result<()> {
        let patch_value = serde_json::to_value(patch).map_err(CallError::from)?;
        let _: Ack = self
            .rpc
            .call("update_user", &[json!(user_id), patch_value])
            .await
            .map_err(|e| self.surface(e))?;
        self.notifier.notify("User updated", ToastKind::Success);
        Ok(())
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_user(&self, user_id: &UserId) -> Result<()> {
        let _: Ack = self
            .rpc
            .call("delete_user", &[json!(user_id)])
            .await
            .map_err(|e| self.surface(e))?;
        self.notifier.notify("User deleted", ToastKind::Success);
        Ok(())
    }

    /// All orders across the store, enriched with buyer name and email.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        let payload: OrdersPayload = self.rpc.call("get_all_orders", &[]).await?;
        Ok(payload.orders)
    }

    /// Advance an order through its lifecycle.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<()> {
        let _: Ack = self
            .rpc
            .call("update_order_status", &[json!(order_id), json!(status)])
            .await
            .map_err(|e| self.surface(e))?;
        self.notifier.notify("Order status updated", ToastKind::Success);
        Ok(())
    }

    fn surface(&self, e: CallError) -> AppError {
        if let Some(message) = e.backend_message() {
            self.notifier.notify(message, ToastKind::Error);
        }
        AppError::from(e)
    }
}
