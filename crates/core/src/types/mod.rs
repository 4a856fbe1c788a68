//! Core types for ShopPro.
//!
//! This module provides type-safe wrappers for common domain concepts.

mod id;
mod price;
mod role;
mod status;

pub use price::Price;
pub use role::{Role, RoleError};
pub use status::{OrderStatus, OrderStatusError};

pub use id::{OrderId, ProductId, UserId};
