//! User roles gating dashboard access.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Role`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum RoleError {
    /// The input is not a known role name.
    #[error("unknown role: {0}")]
    Unknown(String),
}

/// Account role with different permission levels.
///
/// A role is immutable for the lifetime of a session snapshot; a role change
/// on the backend only takes effect after a fresh identity fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can browse, buy, and see their own orders.
    #[default]
    Client,
    /// Everything a client can, plus managing their own product listings.
    Seller,
    /// Full access, including user and order administration.
    Admin,
}

impl Role {
    /// Human-readable label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Seller => "Seller",
            Self::Admin => "Administrator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Seller => write!(f, "seller"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleError::Unknown(s.to_owned())),
        }
    }
}
