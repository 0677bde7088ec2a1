/// STLVault Core: backend client, scan tracking, folder browsing and the
/// library-wide screens.
///
/// This crate contains all client logic with zero UI dependencies. Every
/// network call runs on a background thread and reports back over a
/// channel, so a frontend only drains results once per frame.
///
/// # Modules
///
/// - [`api`]: the [`api::VaultApi`] seam and its blocking HTTP client.
/// - [`model`]: wire types, normalised at the deserialisation boundary.
/// - [`scan`]: scan lifecycle tracking and the background poller.
/// - [`browse`]: breadcrumb trail, session store, folder screens.
/// - [`library`]: dashboard, file listing, categories and assignment.
/// - [`health`]: periodic backend connectivity check.
/// - [`fetch`]: one-shot background requests.
/// - [`config`]: API connection settings.
/// - [`format`]: display helpers for sizes, counts and durations.
pub mod api;
pub mod browse;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod health;
pub mod library;
pub mod model;
pub mod scan;

pub use error::{ApiError, StoreError};
