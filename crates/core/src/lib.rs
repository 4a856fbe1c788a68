//! ShopPro Core - Shared types library.
//!
//! This crate provides common types used across all ShopPro components:
//! - `client` - The browser/webview-resident storefront engine
//! - `integration-tests` - End-to-end scenarios against a scripted backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no transport clients. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, roles, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
