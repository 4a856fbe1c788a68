//! Application state shared across all stores.
//!
//! A single constructor-injected container replaces the original ambient
//! global. Each slice is mutated only through its owning store: the session
//! store owns `session`, the cart store owns `cart`, catalog operations own
//! `catalog`, and the router owns `nav`. Everything else gets cloned
//! snapshots.
//!
//! Locks are never held across an await point; interleaved asynchronous
//! completions are ordered by the cart sequence counter and the navigation
//! epoch instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::{CartSnapshot, ProductSummary, User};
use crate::router::{NavigationState, PageId, PageParams};

/// Catalog filters and the currently loaded product list.
///
/// The backend is the source of truth for matching; every filter or search
/// change refetches, there is no purely local filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogView {
    pub products: Vec<ProductSummary>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub search_query: String,
}

/// Application state shared across all stores.
///
/// This struct is cheaply cloneable via `Arc`; all clones observe the same
/// state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    session: Mutex<Option<User>>,
    cart: Mutex<CartSnapshot>,
    catalog: Mutex<CatalogView>,
    nav: Mutex<NavigationState>,
    /// Sequence issued to cart operations at call time.
    cart_seq: AtomicU64,
    /// Highest sequence whose refresh has been committed.
    cart_applied_seq: AtomicU64,
    /// Bumped on every accepted navigation; stale renders are discarded.
    nav_epoch: AtomicU64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create a fresh state container: no session, empty cart, landing page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                session: Mutex::new(None),
                cart: Mutex::new(CartSnapshot::empty()),
                catalog: Mutex::new(CatalogView::default()),
                nav: Mutex::new(NavigationState::default()),
                cart_seq: AtomicU64::new(0),
                cart_applied_seq: AtomicU64::new(0),
                nav_epoch: AtomicU64::new(0),
            }),
        }
    }

    // =========================================================================
    // Session slice
    // =========================================================================

    /// The authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_user(&self, user: Option<User>) {
        *self
            .inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = user;
    }

    // =========================================================================
    // Cart slice
    // =========================================================================

    /// Snapshot of the local cart cache.
    #[must_use]
    pub fn cart(&self) -> CartSnapshot {
        self.inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Issue the next cart sequence number. Taken at call-issue time, before
    /// the mutation RPC, so a later-issued call always outranks an earlier
    /// one regardless of network completion order.
    pub(crate) fn next_cart_seq(&self) -> u64 {
        self.inner.cart_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a refreshed snapshot if `seq` is the highest seen so far.
    ///
    /// Returns `false` when the refresh is stale; the caller must then
    /// suppress any re-render it would have triggered.
    pub(crate) fn commit_cart(&self, seq: u64, snapshot: CartSnapshot) -> bool {
        // The cart lock also serializes the applied-sequence check+store.
        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if seq <= self.inner.cart_applied_seq.load(Ordering::SeqCst) {
            return false;
        }
        self.inner.cart_applied_seq.store(seq, Ordering::SeqCst);
        *cart = snapshot;
        true
    }

    /// Forcibly reset the cart to empty and invalidate every in-flight
    /// refresh. Used on logout and after a successful checkout.
    pub(crate) fn reset_cart(&self) {
        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let issued = self.inner.cart_seq.load(Ordering::SeqCst);
        self.inner.cart_applied_seq.store(issued, Ordering::SeqCst);
        *cart = CartSnapshot::empty();
    }

    // =========================================================================
    // Catalog slice
    // =========================================================================

    /// Snapshot of the catalog view.
    #[must_use]
    pub fn catalog(&self) -> CatalogView {
        self.inner
            .catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn with_catalog(&self, mutate: impl FnOnce(&mut CatalogView)) {
        let mut catalog = self
            .inner
            .catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        mutate(&mut catalog);
    }

    // =========================================================================
    // Navigation slice
    // =========================================================================

    /// Current navigation state.
    #[must_use]
    pub fn nav(&self) -> NavigationState {
        self.inner
            .nav
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The currently displayed page.
    #[must_use]
    pub fn current_page(&self) -> PageId {
        self.inner
            .nav
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current_page
    }

    /// Record an accepted navigation and return its epoch. A render is
    /// committed only while its epoch is still the latest.
    pub(crate) fn begin_navigation(&self, page: PageId, params: PageParams) -> u64 {
        let mut nav = self
            .inner
            .nav
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        nav.current_page = page;
        nav.params = params;
        self.inner.nav_epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `epoch` is still the latest navigation.
    #[must_use]
    pub(crate) fn is_current_navigation(&self, epoch: u64) -> bool {
        self.inner.nav_epoch.load(Ordering::SeqCst) == epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CartItem;
    use rust_decimal::Decimal;
    use shoppro_core::{Price, ProductId};

    fn snapshot(quantity: u32) -> CartSnapshot {
        CartSnapshot::from_items(vec![CartItem {
            product_id: ProductId::new("p-1"),
            quantity,
            product: ProductSummary {
                id: ProductId::new("p-1"),
                name: "Lamp".to_string(),
                price: Price::new(Decimal::from(10)),
                image_url: String::new(),
                stock: 10,
            },
        }])
    }

    #[test]
    fn test_commit_cart_orders_by_sequence() {
        let state = AppState::new();
        let first = state.next_cart_seq();
        let second = state.next_cart_seq();

        // The later-issued refresh lands first.
        assert!(state.commit_cart(second, snapshot(3)));
        // The earlier one completes afterwards and must be discarded.
        assert!(!state.commit_cart(first, snapshot(5)));

        assert_eq!(state.cart().count, 3);
    }

    #[test]
    fn test_reset_cart_invalidates_in_flight_refreshes() {
        let state = AppState::new();
        let in_flight = state.next_cart_seq();

        state.reset_cart();
        assert_eq!(state.cart(), CartSnapshot::empty());

        // A refresh issued before the reset cannot resurrect the cart.
        assert!(!state.commit_cart(in_flight, snapshot(2)));
        assert_eq!(state.cart().count, 0);
    }

    #[test]
    fn test_navigation_epoch_supersedes() {
        let state = AppState::new();
        let first = state.begin_navigation(PageId::Shop, PageParams::new());
        assert!(state.is_current_navigation(first));

        let second = state.begin_navigation(PageId::Landing, PageParams::new());
        assert!(!state.is_current_navigation(first));
        assert!(state.is_current_navigation(second));
    }

    #[test]
    fn test_clones_share_state() {
        let state = AppState::new();
        let clone = state.clone();

        let seq = state.next_cart_seq();
        assert!(clone.commit_cart(seq, snapshot(1)));
        assert_eq!(state.cart().count, 1);
    }
}
