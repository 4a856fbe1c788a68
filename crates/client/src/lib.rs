//! ShopPro client engine.
//!
//! The state-synchronization and navigation core of the ShopPro storefront
//! UI. It talks to the backend through an asynchronous RPC bridge returning
//! `{success: bool, ...}` JSON envelopes and keeps a single injected
//! [`state::AppState`] container consistent with backend truth across
//! navigation events.
//!
//! Presentation stays out of this crate: markup production, DOM replacement
//! and toast styling are reached only through the [`render::PageRenderer`],
//! [`render::MarkupSink`] and [`notify::Notifier`] traits.
//!
//! # Modules
//!
//! - [`rpc`] - RPC bridge client and envelope decoding
//! - [`state`] - Shared application state container
//! - [`session`] - Login, registration, logout, boot-time restore
//! - [`cart`] - Cart mutations with sequence-numbered refreshes
//! - [`catalog`] - Product search, category filters, product detail
//! - [`router`] - Page navigation with auth and role gating
//! - [`checkout`] - Order submission state machine
//! - [`orders`], [`seller`], [`admin`] - Dashboard data operations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod app;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod orders;
pub mod render;
pub mod router;
pub mod rpc;
pub mod seller;
pub mod session;
pub mod state;

pub use app::App;
pub use cart::CartStore;
pub use catalog::CatalogStore;
pub use checkout::{CheckoutFlow, CheckoutState};
pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use notify::{Notifier, ToastKind};
pub use render::{Markup, MarkupSink, PageRenderer};
pub use router::{PageId, PageParams, Router};
pub use rpc::{RpcClient, RpcTransport};
pub use session::SessionStore;
pub use state::AppState;
