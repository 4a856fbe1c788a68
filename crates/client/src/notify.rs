//! User-visible notification contract.
//!
//! The engine never renders toasts itself; it hands messages to a
//! [`Notifier`] owned by the presentation layer. Notifications are
//! fire-and-forget and must never block core logic.

use std::fmt;

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Sink for user-visible notifications.
///
/// Implementations must return immediately; anything slow (animation,
/// timers) belongs on the presentation side.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: ToastKind);
}

/// Default notifier that logs through `tracing`.
///
/// Useful for headless operation and as a fallback before the UI layer
/// installs its own sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Error => tracing::error!(toast = %kind, "{message}"),
            ToastKind::Warning => tracing::warn!(toast = %kind, "{message}"),
            ToastKind::Success | ToastKind::Info => tracing::info!(toast = %kind, "{message}"),
        }
    }
}
