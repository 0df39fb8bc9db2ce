//! `stockroom-client`
//!
//! **Responsibility:** terminal client for the inventory REST API.
//!
//! This crate provides:
//! - The product repository over HTTP (products and stock movements)
//! - Identity providers and the background token refresh worker
//! - The product screen controller (role checks, mutations, refetch)
//! - Plain-text rendering of the product list
//!
//! The API remains the authority; the client only keeps a cached copy.

pub mod config;
pub mod controller;
pub mod error;
pub mod identity;
pub mod refresh_worker;
pub mod render;
pub mod repository;

pub use config::{AuthConfig, ClientConfig, ConfigError, RoleConventionKind};
pub use controller::{AccessPolicy, Confirm, InventoryController};
pub use error::{ClientError, ClientResult, Operation};
pub use identity::{provider_for, IdentityProvider, OidcRefresh, StaticToken};
pub use refresh_worker::{AuthStatus, TokenRefreshWorker};
pub use render::{HistoryTable, ProductScreen};
pub use repository::{HttpProductRepository, ProductRepository};
