//! Order history for the client dashboard.

use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::Order;
use crate::rpc::RpcClient;

#[derive(Deserialize)]
pub(crate) struct OrdersPayload {
    pub(crate) orders: Vec<Order>,
}

/// Read access to the signed-in user's own orders.
#[derive(Clone)]
pub struct OrderService {
    rpc: RpcClient,
}

impl OrderService {
    /// Create an order service.
    #[must_use]
    pub const fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Orders placed by the current user, newest data from the backend.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>> {
        let payload: OrdersPayload = self.rpc.call("get_my_orders", &[]).await?;
        Ok(payload.orders)
    }
}
