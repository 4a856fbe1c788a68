//! Page navigation with authentication and role gating.
//!
//! The router owns the "current page" slice of [`AppState`] and is the only
//! place access rules are checked: public pages pass through, protected
//! pages require a session user, and dashboards additionally require a role
//! from the permission table. A denied navigation is a no-op - the
//! previously rendered page stays.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use shoppro_core::Role;

use crate::error::Result;
use crate::notify::{Notifier, ToastKind};
use crate::render::{MarkupSink, PageRenderer};
use crate::state::AppState;

/// Well-known parameter keys.
pub mod params {
    /// Auth page mode: `"login"` or `"register"`.
    pub const MODE: &str = "mode";
    /// Product ID for the product detail page.
    pub const ID: &str = "id";
    /// Dashboard section.
    pub const SECTION: &str = "section";
}

/// Closed enumeration of navigable screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageId {
    #[default]
    Landing,
    Auth,
    Shop,
    Product,
    ClientDashboard,
    SellerDashboard,
    AdminDashboard,
}

/// Pages reachable without a session.
const PUBLIC_PAGES: &[PageId] = &[PageId::Landing, PageId::Auth, PageId::Shop, PageId::Product];

impl PageId {
    /// Whether the page is reachable without a session user.
    #[must_use]
    pub fn is_public(self) -> bool {
        PUBLIC_PAGES.contains(&self)
    }

    /// Roles allowed on this page, or `None` when any authenticated state
    /// is fine. The table is checked once, in [`Router::navigate`].
    #[must_use]
    pub const fn allowed_roles(self) -> Option<&'static [Role]> {
        match self {
            Self::ClientDashboard => Some(&[Role::Client, Role::Seller, Role::Admin]),
            Self::SellerDashboard => Some(&[Role::Seller, Role::Admin]),
            Self::AdminDashboard => Some(&[Role::Admin]),
            Self::Landing | Self::Auth | Self::Shop | Self::Product => None,
        }
    }

    /// Parse a page name, falling back to `Landing` for anything unknown.
    ///
    /// Accepts the legacy aliases the original UI used in its inline
    /// handlers (`login`, `register`, `client`, `seller`, `admin`).
    #[must_use]
    pub fn parse_or_landing(name: &str) -> Self {
        match name {
            "auth" | "login" | "register" => Self::Auth,
            "shop" => Self::Shop,
            "product" => Self::Product,
            "client" | "client-dashboard" => Self::ClientDashboard,
            "seller" | "seller-dashboard" => Self::SellerDashboard,
            "admin" | "admin-dashboard" => Self::AdminDashboard,
            _ => Self::Landing,
        }
    }

    /// The page a freshly signed-in user lands on.
    #[must_use]
    pub const fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Seller => Self::SellerDashboard,
            Role::Client => Self::Shop,
        }
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Landing => write!(f, "landing"),
            Self::Auth => write!(f, "auth"),
            Self::Shop => write!(f, "shop"),
            Self::Product => write!(f, "product"),
            Self::ClientDashboard => write!(f, "client-dashboard"),
            Self::SellerDashboard => write!(f, "seller-dashboard"),
            Self::AdminDashboard => write!(f, "admin-dashboard"),
        }
    }
}

/// String parameters attached to a navigation (product ID, dashboard
/// section, auth mode).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams(BTreeMap<String, String>);

impl PageParams {
    /// Empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parameters for the login form.
    #[must_use]
    pub fn login() -> Self {
        Self::new().with(params::MODE, "login")
    }

    /// Parameters for a dashboard section.
    #[must_use]
    pub fn section(name: impl Into<String>) -> Self {
        Self::new().with(params::SECTION, name)
    }
}

/// Current page and its parameters. Owned by the router.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_page: PageId,
    pub params: PageParams,
}

/// The navigation engine.
///
/// Cheaply cloneable; all clones share the same state container and
/// presentation sinks.
#[derive(Clone)]
pub struct Router {
    state: AppState,
    renderer: Arc<dyn PageRenderer>,
    sink: Arc<dyn MarkupSink>,
    notifier: Arc<dyn Notifier>,
}

impl Router {
    /// Create a router over the shared state and presentation boundary.
    #[must_use]
    pub fn new(
        state: AppState,
        renderer: Arc<dyn PageRenderer>,
        sink: Arc<dyn MarkupSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            state,
            renderer,
            sink,
            notifier,
        }
    }

    /// Navigate to a page.
    ///
    /// Protected pages without a session redirect to the login form
    /// instead; a role mismatch emits an "unauthorized" notification and
    /// leaves the current page untouched. The rendered markup is committed
    /// only if no newer navigation started while this one was resolving.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error; gating failures are not errors.
    #[instrument(skip(self, params), fields(page = %page))]
    pub async fn navigate(&self, page: PageId, params: PageParams) -> Result<()> {
        // Auth gate: protected page, no session - this call becomes a
        // redirect to the login form.
        let (page, params) = if !page.is_public() && self.state.current_user().is_none() {
            tracing::debug!("unauthenticated, redirecting to login");
            (PageId::Auth, PageParams::login())
        } else {
            (page, params)
        };

        // Role gate: denial leaves navigation state and DOM untouched.
        if let Some(allowed) = page.allowed_roles() {
            let role = self.state.current_user().map(|user| user.role);
            if !role.is_some_and(|role| allowed.contains(&role)) {
                tracing::warn!(?role, "role not allowed on page");
                self.notifier.notify("Unauthorized access", ToastKind::Error);
                return Ok(());
            }
        }

        let epoch = self.state.begin_navigation(page, params.clone());

        let markup = self.renderer.render(page, &params, &self.state).await?;

        if self.state.is_current_navigation(epoch) {
            self.sink.commit(markup);
            self.sink.reset_scroll();
        } else {
            tracing::debug!("navigation superseded, markup discarded");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_pages() {
        assert!(PageId::Landing.is_public());
        assert!(PageId::Auth.is_public());
        assert!(PageId::Shop.is_public());
        assert!(PageId::Product.is_public());
        assert!(!PageId::ClientDashboard.is_public());
        assert!(!PageId::SellerDashboard.is_public());
        assert!(!PageId::AdminDashboard.is_public());
    }

    #[test]
    fn test_permission_table() {
        assert_eq!(
            PageId::ClientDashboard.allowed_roles(),
            Some(&[Role::Client, Role::Seller, Role::Admin][..])
        );
        assert_eq!(
            PageId::SellerDashboard.allowed_roles(),
            Some(&[Role::Seller, Role::Admin][..])
        );
        assert_eq!(PageId::AdminDashboard.allowed_roles(), Some(&[Role::Admin][..]));
        assert_eq!(PageId::Shop.allowed_roles(), None);
    }

    #[test]
    fn test_parse_or_landing() {
        assert_eq!(PageId::parse_or_landing("shop"), PageId::Shop);
        assert_eq!(PageId::parse_or_landing("login"), PageId::Auth);
        assert_eq!(PageId::parse_or_landing("client"), PageId::ClientDashboard);
        assert_eq!(PageId::parse_or_landing("admin-dashboard"), PageId::AdminDashboard);
        // Unknown names fall back to landing rather than erroring.
        assert_eq!(PageId::parse_or_landing("warehouse"), PageId::Landing);
    }

    #[test]
    fn test_home_for_role() {
        assert_eq!(PageId::home_for(Role::Admin), PageId::AdminDashboard);
        assert_eq!(PageId::home_for(Role::Seller), PageId::SellerDashboard);
        assert_eq!(PageId::home_for(Role::Client), PageId::Shop);
    }

    #[test]
    fn test_page_params() {
        let params = PageParams::new().with(params::ID, "p-1");
        assert_eq!(params.get(params::ID), Some("p-1"));
        assert_eq!(params.get(params::SECTION), None);

        assert_eq!(PageParams::login().get(params::MODE), Some("login"));
        assert_eq!(PageParams::section("orders").get(params::SECTION), Some("orders"));
    }
}
