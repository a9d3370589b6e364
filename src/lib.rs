//! Bookworm API: recommendation and reading-statistics backend for a
//! book-tracking application.
//!
//! Catalog and library data are owned by external stores and reached
//! through the read-only traits in [`stores`]; the interesting logic lives
//! in [`services`] as pure functions over request-scoped snapshots.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;
