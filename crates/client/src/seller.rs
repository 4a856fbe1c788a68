//! Seller dashboard operations: the seller's own product listings.
//!
//! Role enforcement happens server-side; these wrappers surface the
//! backend's "unauthorized" message like any other logical failure.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use shoppro_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product, ProductPatch};
use crate::notify::{Notifier, ToastKind};
use crate::rpc::{Ack, CallError, RpcClient};

#[derive(Deserialize)]
struct ProductsPayload {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct ProductPayload {
    product: Product,
}

/// Product management for the seller dashboard.
#[derive(Clone)]
pub struct SellerService {
    rpc: RpcClient,
    notifier: Arc<dyn Notifier>,
}

impl SellerService {
    /// Create a seller service.
    #[must_use]
    pub fn new(rpc: RpcClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { rpc, notifier }
    }

    /// The current seller's listings.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self))]
    pub async fn my_products(&self) -> Result<Vec<Product>> {
        let payload: ProductsPayload = self.rpc.call("get_seller_products", &[]).await?;
        Ok(payload.products)
    }

    /// Create a new listing.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let args = [
            json!(product.name),
            json!(product.description),
            json!(product.price),
            json!(product.stock),
            json!(product.category),
            json!(product.image_url),
        ];
        let payload: ProductPayload = self
            .rpc
            .call("create_product", &args)
            .await
            .map_err(|e| self.surface(e))?;
        self.notifier.notify("Product created", ToastKind::Success);
        Ok(payload.product)
    }

    /// Update fields of an existing listing.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self, patch), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<()> {
        let patch_value = serde_json::to_value(patch).map_err(CallError::from)?;
        let _: Ack = self
            .rpc
            .call("update_product", &[json!(product_id), patch_value])
            .await
            .map_err(|e| self.surface(e))?;
        self.notifier.notify("Product updated", ToastKind::Success);
        Ok(())
    }

    /// Delete a listing.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: &ProductId) -> Result<()> {
        let _: Ack = self
            .rpc
            .call("delete_product", &[json!(product_id)])
            .await
            .map_err(|e| self.surface(e))?;
        self.notifier.notify("Product deleted", ToastKind::Success);
        Ok(())
    }

    fn surface(&self, e: CallError) -> AppError {
        if let Some(message) = e.backend_message() {
            self.notifier.notify(message, ToastKind::Error);
        }
        AppError::from(e)
    }
}
