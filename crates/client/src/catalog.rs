//! Catalog operations: search, category filters, product detail.
//!
//! Owns the `catalog` slice of [`AppState`]. The backend decides what
//! matches a query or category - every filter change is a refetch, never a
//! local filter over the loaded list.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use shoppro_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::{Product, ProductSummary};
use crate::rpc::{CallError, RpcClient};
use crate::state::AppState;

#[derive(Deserialize)]
struct ProductsPayload {
    products: Vec<ProductSummary>,
}

#[derive(Deserialize)]
struct ProductPayload {
    product: Product,
}

#[derive(Deserialize)]
struct CategoriesPayload {
    categories: Vec<String>,
}

/// Store owning the catalog slice of [`AppState`].
#[derive(Clone)]
pub struct CatalogStore {
    state: AppState,
    rpc: RpcClient,
}

impl CatalogStore {
    /// Create a catalog store.
    #[must_use]
    pub const fn new(state: AppState, rpc: RpcClient) -> Self {
        Self { state, rpc }
    }

    /// Preload the category set. Called once at boot.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self))]
    pub async fn load_categories(&self) -> Result<Vec<String>> {
        let payload: CategoriesPayload = self.rpc.call("get_categories", &[]).await?;
        self.state
            .with_catalog(|catalog| catalog.categories = payload.categories.clone());
        Ok(payload.categories)
    }

    /// Search products by free-text query. Clears any category filter.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<ProductSummary>> {
        self.state.with_catalog(|catalog| {
            catalog.search_query = query.to_owned();
            catalog.selected_category = None;
        });
        self.fetch_products(&[Value::Null, json!(query)]).await
    }

    /// Filter products by category; `None` clears the filter. Clears any
    /// search query.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self), fields(category = ?category))]
    pub async fn filter_by_category(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<ProductSummary>> {
        self.state.with_catalog(|catalog| {
            catalog.selected_category = category.map(str::to_owned);
            catalog.search_query.clear();
        });
        let category_arg = category.map_or(Value::Null, |c| json!(c));
        self.fetch_products(&[category_arg, Value::Null]).await
    }

    /// Refetch products with the currently selected filters.
    ///
    /// # Errors
    ///
    /// Returns the underlying call error on failure.
    #[instrument(skip(self))]
    pub async fn load_products(&self) -> Result<Vec<ProductSummary>> {
        let catalog = self.state.catalog();
        let category_arg = catalog
            .selected_category
            .as_deref()
            .map_or(Value::Null, |c| json!(c));
        let query_arg = if catalog.search_query.is_empty() {
            Value::Null
        } else {
            json!(catalog.search_query)
        };
        self.fetch_products(&[category_arg, query_arg]).await
    }

    /// Fetch a single product's full record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the backend does not know the product, so
    /// the product page can branch to its explicit "not found" markup.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: &ProductId) -> Result<Product> {
        let payload: ProductPayload = self
            .rpc
            .call("get_product", &[json!(product_id)])
            .await
            .map_err(|e| match e {
                CallError::Backend { message } => AppError::NotFound(message),
                other => AppError::from(other),
            })?;
        Ok(payload.product)
    }

    async fn fetch_products(&self, args: &[Value]) -> Result<Vec<ProductSummary>> {
        let payload: ProductsPayload = self.rpc.call("get_products", args).await?;
        self.state
            .with_catalog(|catalog| catalog.products = payload.products.clone());
        Ok(payload.products)
    }
}
