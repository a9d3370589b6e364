/// External-store abstraction
///
/// The catalog and per-user libraries are owned by an external document
/// store; this core only reads them. Both traits are intentionally narrow
/// so the recommendation and statistics algorithms stay pure functions over
/// in-memory snapshots, with the fetch step swappable for an in-memory
/// implementation in tests.
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, LibraryEntry, Shelf},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{create_pool, PgCatalogStore, PgLibraryStore};

/// Read access to per-user library membership records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    /// All of a user's entries, optionally restricted to one shelf
    async fn entries_for_user(
        &self,
        user_id: Uuid,
        shelf: Option<Shelf>,
    ) -> AppResult<Vec<LibraryEntry>>;

    /// Every "read" entry belonging to any user other than the given one
    ///
    /// Feeds the similar-user computation, which needs a snapshot of what
    /// the rest of the population has finished.
    async fn read_entries_of_other_users(&self, user_id: Uuid) -> AppResult<Vec<LibraryEntry>>;
}

/// Read access to catalog book metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Books for a set of identifiers; unknown ids are silently absent
    async fn books_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Book>>;

    /// Books in any of the given genres, excluding `exclude_ids`, with
    /// `average_rating >= min_rating`, ordered by rating then review count
    /// descending, truncated to `limit`
    async fn books_in_genres(
        &self,
        genres: &[String],
        exclude_ids: &[Uuid],
        min_rating: f64,
        limit: usize,
    ) -> AppResult<Vec<Book>>;

    /// Globally popular books: at least `min_reviews` reviews, ordered by
    /// rating then review count descending, truncated to `limit`
    async fn popular_books(&self, min_reviews: i32, limit: usize) -> AppResult<Vec<Book>>;
}
