use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, LibraryEntry, Shelf},
    stores::{CatalogStore, LibraryStore},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const BOOK_COLUMNS: &str = "id, title, author, genre, cover_image, total_pages, \
     COALESCE(average_rating, 0) AS average_rating, total_reviews";

/// Catalog reads backed by the `books` table
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn books_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Book>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn books_in_genres(
        &self,
        genres: &[String],
        exclude_ids: &[Uuid],
        min_rating: f64,
        limit: usize,
    ) -> AppResult<Vec<Book>> {
        if genres.is_empty() {
            return Ok(Vec::new());
        }

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE genre = ANY($1) \
               AND NOT (id = ANY($2)) \
               AND COALESCE(average_rating, 0) >= $3 \
             ORDER BY average_rating DESC NULLS LAST, total_reviews DESC \
             LIMIT $4"
        ))
        .bind(genres)
        .bind(exclude_ids)
        .bind(min_rating)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn popular_books(&self, min_reviews: i32, limit: usize) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE total_reviews >= $1 \
             ORDER BY average_rating DESC NULLS LAST, total_reviews DESC \
             LIMIT $2"
        ))
        .bind(min_reviews)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}

/// Library reads backed by the `user_library` table
#[derive(Clone)]
pub struct PgLibraryStore {
    pool: PgPool,
}

impl PgLibraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; shelf arrives as text and is parsed on the way out
#[derive(sqlx::FromRow)]
struct LibraryEntryRow {
    user_id: Uuid,
    book_id: Uuid,
    shelf: String,
    progress: i32,
    updated_at: DateTime<Utc>,
}

impl LibraryEntryRow {
    fn into_entry(self) -> Option<LibraryEntry> {
        let shelf = match Shelf::parse(&self.shelf) {
            Some(shelf) => shelf,
            None => {
                tracing::warn!(
                    shelf = %self.shelf,
                    book_id = %self.book_id,
                    "skipping library entry with unknown shelf"
                );
                return None;
            }
        };

        Some(LibraryEntry {
            user_id: self.user_id,
            book_id: self.book_id,
            shelf,
            progress: self.progress,
            updated_at: self.updated_at,
        })
    }
}

fn collect_entries(rows: Vec<LibraryEntryRow>) -> Vec<LibraryEntry> {
    rows.into_iter()
        .filter_map(LibraryEntryRow::into_entry)
        .collect()
}

#[async_trait::async_trait]
impl LibraryStore for PgLibraryStore {
    async fn entries_for_user(
        &self,
        user_id: Uuid,
        shelf: Option<Shelf>,
    ) -> AppResult<Vec<LibraryEntry>> {
        let rows = match shelf {
            Some(shelf) => {
                sqlx::query_as::<_, LibraryEntryRow>(
                    "SELECT user_id, book_id, shelf, progress, updated_at \
                     FROM user_library WHERE user_id = $1 AND shelf = $2",
                )
                .bind(user_id)
                .bind(shelf.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, LibraryEntryRow>(
                    "SELECT user_id, book_id, shelf, progress, updated_at \
                     FROM user_library WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(collect_entries(rows))
    }

    async fn read_entries_of_other_users(&self, user_id: Uuid) -> AppResult<Vec<LibraryEntry>> {
        let rows = sqlx::query_as::<_, LibraryEntryRow>(
            "SELECT user_id, book_id, shelf, progress, updated_at \
             FROM user_library WHERE user_id <> $1 AND shelf = $2",
        )
        .bind(user_id)
        .bind(Shelf::Read.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_entries(rows))
    }
}
