use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, LibraryEntry, Shelf},
    services::{affinity, candidates},
    stores::{CatalogStore, LibraryStore},
};

/// Hard default when the client sends no usable limit
pub const DEFAULT_LIMIT: usize = 12;
/// Review floor for the global-popularity fallback
const POPULAR_MIN_REVIEWS: i32 = 5;

const REASON_NO_HISTORY: &str = "No reading history available";
const REASON_HISTORY: &str = "Based on your reading history and preferences";
const MESSAGE_NO_HISTORY: &str = "No reading history found, showing popular books";
const MESSAGE_HISTORY: &str = "Recommendations retrieved successfully";

/// Final, ranked recommendation set with its provenance tag
#[derive(Debug)]
pub struct Recommendations {
    pub books: Vec<Book>,
    pub reason: &'static str,
    pub message: &'static str,
}

/// Produces up to `limit` recommendations for a user.
///
/// Loading the user's own library is the only read allowed to fail the
/// request. Every enrichment read degrades to an empty contribution: the
/// generators return `AppResult<Vec<Book>>` and [`or_empty`] folds errors
/// away in exactly one place, so the degrade policy lives in the type flow
/// rather than in scattered catch blocks.
pub async fn get_recommendations(
    library: &dyn LibraryStore,
    catalog: &dyn CatalogStore,
    user_id: Uuid,
    limit: usize,
) -> AppResult<Recommendations> {
    // The indispensable read: the requesting user's whole library.
    let entries = library.entries_for_user(user_id, None).await?;

    let read_entries: Vec<LibraryEntry> = entries
        .iter()
        .filter(|e| e.shelf == Shelf::Read)
        .cloned()
        .collect();

    if read_entries.is_empty() {
        let books = or_empty(
            catalog.popular_books(POPULAR_MIN_REVIEWS, limit).await,
            "popularity-fallback",
        );
        return Ok(Recommendations {
            books,
            reason: REASON_NO_HISTORY,
            message: MESSAGE_NO_HISTORY,
        });
    }

    // Any shelf counts for exclusion: never recommend a book the user
    // already has, even on wantToRead.
    let library_book_ids: Vec<Uuid> = entries.iter().map(|e| e.book_id).collect();

    let affinities = or_empty(
        affinity::genre_affinity(catalog, &read_entries).await,
        "genre-affinity",
    );

    // Independent strategies, fanned out; merge order below is fixed.
    let (similar, preferred, collaborative) = tokio::join!(
        candidates::similar_by_genre(catalog, &read_entries, &library_book_ids, limit),
        candidates::by_genre_preference(catalog, &affinities, &library_book_ids, limit),
        candidates::by_similar_users(
            library,
            catalog,
            user_id,
            &affinities,
            &library_book_ids,
            limit
        ),
    );

    let mut combined = Vec::with_capacity(limit * 3);
    combined.extend(or_empty(similar, "similar-by-genre"));
    combined.extend(or_empty(preferred, "genre-preference"));
    combined.extend(or_empty(collaborative, "collaborative-filtering"));

    let books = merge_and_rank(combined, &library_book_ids, limit);

    Ok(Recommendations {
        books,
        reason: REASON_HISTORY,
        message: MESSAGE_HISTORY,
    })
}

/// Collapses a failed generator into an empty contribution, keeping the
/// diagnostic for operators only.
fn or_empty<T>(result: AppResult<Vec<T>>, source: &'static str) -> Vec<T> {
    match result {
        Ok(books) => books,
        Err(error) => {
            tracing::warn!(source, error = %error, "candidate source failed, continuing without it");
            Vec::new()
        }
    }
}

/// Deduplicates by book id keeping first occurrence, drops anything from
/// the user's own library, then stable-sorts by rating descending so equal
/// ratings keep the generator concatenation order. Truncates to `limit`.
fn merge_and_rank(combined: Vec<Book>, library_book_ids: &[Uuid], limit: usize) -> Vec<Book> {
    let excluded: HashSet<&Uuid> = library_book_ids.iter().collect();
    let mut seen: HashSet<Uuid> = HashSet::new();

    let mut unique: Vec<Book> = combined
        .into_iter()
        .filter(|b| !excluded.contains(&b.id))
        .filter(|b| seen.insert(b.id))
        .collect();

    unique.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
    unique.truncate(limit);
    unique
}
