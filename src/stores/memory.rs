use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, LibraryEntry, Shelf},
    stores::{CatalogStore, LibraryStore},
};

/// In-memory implementation of both stores
///
/// Backs integration tests and local experiments without a database. Query
/// semantics (filters, ordering, truncation) mirror the Postgres
/// implementation so the two are interchangeable behind the traits.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    books: HashMap<Uuid, Book>,
    entries: Vec<LibraryEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_book(&self, book: Book) {
        let mut inner = self.inner.write().await;
        inner.books.insert(book.id, book);
    }

    /// Upserts by (user, book), matching the store-side uniqueness invariant
    pub async fn insert_entry(&self, entry: LibraryEntry) {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .entries
            .iter_mut()
            .find(|e| e.user_id == entry.user_id && e.book_id == entry.book_id)
        {
            *existing = entry;
        } else {
            inner.entries.push(entry);
        }
    }
}

fn sort_by_rating_then_reviews(books: &mut [Book]) {
    books.sort_by(|a, b| {
        b.average_rating
            .total_cmp(&a.average_rating)
            .then_with(|| b.total_reviews.cmp(&a.total_reviews))
    });
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryStore {
    async fn books_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Book>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.books.get(id).cloned())
            .collect())
    }

    async fn books_in_genres(
        &self,
        genres: &[String],
        exclude_ids: &[Uuid],
        min_rating: f64,
        limit: usize,
    ) -> AppResult<Vec<Book>> {
        let inner = self.inner.read().await;
        let excluded: HashSet<&Uuid> = exclude_ids.iter().collect();

        let mut books: Vec<Book> = inner
            .books
            .values()
            .filter(|b| genres.contains(&b.genre))
            .filter(|b| !excluded.contains(&b.id))
            .filter(|b| b.average_rating >= min_rating)
            .cloned()
            .collect();

        sort_by_rating_then_reviews(&mut books);
        books.truncate(limit);
        Ok(books)
    }

    async fn popular_books(&self, min_reviews: i32, limit: usize) -> AppResult<Vec<Book>> {
        let inner = self.inner.read().await;

        let mut books: Vec<Book> = inner
            .books
            .values()
            .filter(|b| b.total_reviews >= min_reviews)
            .cloned()
            .collect();

        sort_by_rating_then_reviews(&mut books);
        books.truncate(limit);
        Ok(books)
    }
}

#[async_trait::async_trait]
impl LibraryStore for InMemoryStore {
    async fn entries_for_user(
        &self,
        user_id: Uuid,
        shelf: Option<Shelf>,
    ) -> AppResult<Vec<LibraryEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| shelf.map_or(true, |s| e.shelf == s))
            .cloned()
            .collect())
    }

    async fn read_entries_of_other_users(&self, user_id: Uuid) -> AppResult<Vec<LibraryEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.user_id != user_id && e.shelf == Shelf::Read)
            .cloned()
            .collect())
    }
}
