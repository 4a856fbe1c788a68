//! Application assembly and boot sequence.
//!
//! [`App`] wires the shared [`AppState`] into every store exactly once, so
//! the rest of the crate never constructs its own state container. The UI
//! layer builds one `App` at startup, keeps it for the lifetime of the
//! window, and reaches each store through the accessors.

use std::sync::Arc;

use tracing::instrument;

use crate::admin::AdminService;
use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::checkout::CheckoutFlow;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::notify::Notifier;
use crate::orders::OrderService;
use crate::render::{MarkupSink, PageRenderer};
use crate::router::{PageId, PageParams, Router};
use crate::rpc::{CallError, HttpTransport, RpcClient, RpcTransport};
use crate::seller::SellerService;
use crate::session::SessionStore;
use crate::state::AppState;

/// The assembled client engine.
///
/// Cheaply cloneable; every clone shares the same state container, stores
/// and presentation sinks.
#[derive(Clone)]
pub struct App {
    state: AppState,
    router: Router,
    session: SessionStore,
    cart: CartStore,
    catalog: CatalogStore,
    checkout: CheckoutFlow,
    orders: OrderService,
    seller: SellerService,
    admin: AdminService,
}

impl App {
    /// Assemble the engine over an injected transport and presentation
    /// boundary.
    #[must_use]
    pub fn new(
        transport: Arc<dyn RpcTransport>,
        renderer: Arc<dyn PageRenderer>,
        sink: Arc<dyn MarkupSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = AppState::new();
        let rpc = RpcClient::new(transport, notifier.clone());
        let router = Router::new(state.clone(), renderer, sink, notifier.clone());

        let cart = CartStore::new(
            state.clone(),
            rpc.clone(),
            notifier.clone(),
            router.clone(),
        );
        let session = SessionStore::new(
            state.clone(),
            rpc.clone(),
            notifier.clone(),
            cart.clone(),
            router.clone(),
        );
        let catalog = CatalogStore::new(state.clone(), rpc.clone());
        let checkout = CheckoutFlow::new(
            state.clone(),
            rpc.clone(),
            notifier.clone(),
            cart.clone(),
            router.clone(),
        );
        let orders = OrderService::new(rpc.clone());
        let seller = SellerService::new(rpc.clone(), notifier.clone());
        let admin = AdminService::new(rpc, notifier);

        Self {
            state,
            router,
            session,
            cart,
            catalog,
            checkout,
            orders,
            seller,
            admin,
        }
    }

    /// Assemble the engine over the HTTP bridge described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be constructed.
    pub fn from_config(
        config: &ClientConfig,
        renderer: Arc<dyn PageRenderer>,
        sink: Arc<dyn MarkupSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(config).map_err(CallError::from)?;
        Ok(Self::new(Arc::new(transport), renderer, sink, notifier))
    }

    /// Boot sequence: restore any backend session, preload the category
    /// set, and render the landing page.
    ///
    /// Restore and preload are best-effort; a cold or unreachable backend
    /// still gets a landing page.
    ///
    /// # Errors
    ///
    /// Returns an error only if rendering the landing page fails.
    #[instrument(skip(self))]
    pub async fn boot(&self) -> Result<()> {
        self.session.restore_session().await?;

        if let Err(e) = self.catalog.load_categories().await {
            tracing::warn!(error = %e, "category preload failed");
        }

        self.router.navigate(PageId::Landing, PageParams::new()).await
    }

    /// The shared state container.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// The navigation engine.
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// Session operations.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Cart operations.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Catalog operations.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Checkout flow.
    #[must_use]
    pub const fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    /// Order history for the current user.
    #[must_use]
    pub const fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// Seller dashboard operations.
    #[must_use]
    pub const fn seller(&self) -> &SellerService {
        &self.seller
    }

    /// Admin dashboard operations.
    #[must_use]
    pub const fn admin(&self) -> &AdminService {
        &self.admin
    }
}
