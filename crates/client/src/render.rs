//! Rendering contracts between the engine and the presentation layer.
//!
//! A page render is a pure function from `(page, params, state)` to markup;
//! the engine never inspects the markup it commits. Renderers must degrade
//! to explicit "not found"/"empty" markup rather than failing when backing
//! data is absent.

use crate::error::AppError;
use crate::router::{PageId, PageParams};
use crate::rpc::BoxFuture;
use crate::state::AppState;

/// Opaque markup produced by a renderer and committed to the root element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    /// Wrap already-rendered markup.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// View the markup as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Markup {
    fn from(content: String) -> Self {
        Self(content)
    }
}

impl From<&str> for Markup {
    fn from(content: &str) -> Self {
        Self(content.to_owned())
    }
}

/// Produces markup for a page.
///
/// Must be callable repeatedly without side effects beyond the data fetches
/// it explicitly performs. Data-fetch failures are the renderer's own
/// responsibility; the router only guarantees that the call happens.
pub trait PageRenderer: Send + Sync {
    fn render<'a>(
        &'a self,
        page: PageId,
        params: &'a PageParams,
        state: &'a AppState,
    ) -> BoxFuture<'a, Result<Markup, AppError>>;
}

/// The DOM boundary: replaces the root content and resets scroll position.
pub trait MarkupSink: Send + Sync {
    /// Replace the root element's content with `markup`.
    fn commit(&self, markup: Markup);

    /// Scroll the viewport back to the top after a committed navigation.
    fn reset_scroll(&self);
}
