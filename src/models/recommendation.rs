use serde::Serialize;
use uuid::Uuid;

/// A user's engagement with one genre, derived from their "read" shelf.
///
/// Computed fresh per request and never persisted. `average_rating` is the
/// mean of the catalog-wide ratings of the books read in the genre, not the
/// user's own per-book ratings.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenreAffinity {
    pub genre: String,
    pub books_read: u32,
    pub average_rating: f64,
}

/// Another reader whose taste overlaps the requesting user's.
///
/// Exists only for the duration of the collaborative-filtering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarUser {
    pub user_id: Uuid,
    pub shared_genre_count: usize,
    pub total_books_read: usize,
}
