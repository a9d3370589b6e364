//! Candidate generators for the recommendation pipeline.
//!
//! Each strategy produces a bounded, possibly-empty list of books from one
//! signal source. Generators never see each other's output; the aggregator
//! owns merging and the no-history fallback.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, GenreAffinity, LibraryEntry, SimilarUser},
    stores::{CatalogStore, LibraryStore},
};

/// Rating floor for books merely sharing a genre with the read set
const SIMILAR_MIN_RATING: f64 = 3.0;
/// Stricter floor for books from the user's top genres
const PREFERRED_MIN_RATING: f64 = 3.5;
/// How many affinity genres count as "favorite"
const TOP_GENRE_COUNT: usize = 3;
/// Minimum genre overlap for another user to count as similar
const MIN_SHARED_GENRES: usize = 2;
/// How many similar users contribute to collaborative filtering
const MAX_SIMILAR_USERS: usize = 10;

/// Books sharing a genre with anything the user has read.
///
/// Cheap first pass needing only the user's own history. Excludes every
/// book already in the user's library, on any shelf.
pub async fn similar_by_genre(
    catalog: &dyn CatalogStore,
    read_entries: &[LibraryEntry],
    library_book_ids: &[Uuid],
    limit: usize,
) -> AppResult<Vec<Book>> {
    let read_ids: Vec<Uuid> = read_entries.iter().map(|e| e.book_id).collect();
    let read_books = catalog.books_by_ids(&read_ids).await?;

    let mut genres: Vec<String> = read_books.into_iter().map(|b| b.genre).collect();
    genres.sort();
    genres.dedup();

    if genres.is_empty() {
        return Ok(Vec::new());
    }

    catalog
        .books_in_genres(&genres, library_book_ids, SIMILAR_MIN_RATING, limit)
        .await
}

/// Books from the user's top affinity genres.
///
/// A stronger signal than plain genre overlap, so the rating floor is
/// stricter. An empty affinity list short-circuits to empty; the
/// no-history fallback belongs to the aggregator, not here.
pub async fn by_genre_preference(
    catalog: &dyn CatalogStore,
    affinities: &[GenreAffinity],
    library_book_ids: &[Uuid],
    limit: usize,
) -> AppResult<Vec<Book>> {
    if affinities.is_empty() {
        return Ok(Vec::new());
    }

    let favorites: Vec<String> = affinities
        .iter()
        .take(TOP_GENRE_COUNT)
        .map(|a| a.genre.clone())
        .collect();

    catalog
        .books_in_genres(&favorites, library_book_ids, PREFERRED_MIN_RATING, limit)
        .await
}

/// Books read by users with overlapping taste.
///
/// Finds readers sharing at least two genres with the requesting user,
/// keeps the ten closest, and ranks the books those readers finished by
/// how many of them read each one.
pub async fn by_similar_users(
    library: &dyn LibraryStore,
    catalog: &dyn CatalogStore,
    user_id: Uuid,
    affinities: &[GenreAffinity],
    library_book_ids: &[Uuid],
    limit: usize,
) -> AppResult<Vec<Book>> {
    if affinities.is_empty() {
        return Ok(Vec::new());
    }

    let my_genres: HashSet<&str> = affinities.iter().map(|a| a.genre.as_str()).collect();

    let other_entries = library.read_entries_of_other_users(user_id).await?;
    if other_entries.is_empty() {
        return Ok(Vec::new());
    }

    // One catalog lookup resolves genres for everything the others read
    let mut other_book_ids: Vec<Uuid> = other_entries.iter().map(|e| e.book_id).collect();
    other_book_ids.sort();
    other_book_ids.dedup();
    let other_books = catalog.books_by_ids(&other_book_ids).await?;
    let genre_by_book: HashMap<Uuid, &str> = other_books
        .iter()
        .map(|b| (b.id, b.genre.as_str()))
        .collect();

    let similar_users = find_similar_users(&other_entries, &genre_by_book, &my_genres);
    if similar_users.is_empty() {
        return Ok(Vec::new());
    }

    let ranked_ids =
        rank_books_by_read_count(&other_entries, &similar_users, library_book_ids, limit);
    if ranked_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut books = catalog.books_by_ids(&ranked_ids).await?;

    // books_by_ids gives no ordering guarantee; restore read-count order
    let position: HashMap<Uuid, usize> = ranked_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();
    books.sort_by_key(|b| position.get(&b.id).copied().unwrap_or(usize::MAX));

    Ok(books)
}

/// Ranks other readers by genre overlap with the requesting user.
///
/// Overlap below `MIN_SHARED_GENRES` disqualifies a reader outright; one
/// shared genre is noise, not taste. Ties order by total books read, then
/// by user id so repeated requests rank identically.
pub fn find_similar_users(
    other_entries: &[LibraryEntry],
    genre_by_book: &HashMap<Uuid, &str>,
    my_genres: &HashSet<&str>,
) -> Vec<SimilarUser> {
    struct Taste<'a> {
        genres: HashSet<&'a str>,
        books_read: usize,
    }

    let mut per_user: HashMap<Uuid, Taste> = HashMap::new();
    for entry in other_entries {
        let taste = per_user.entry(entry.user_id).or_insert_with(|| Taste {
            genres: HashSet::new(),
            books_read: 0,
        });
        taste.books_read += 1;
        if let Some(genre) = genre_by_book.get(&entry.book_id) {
            taste.genres.insert(genre);
        }
    }

    let mut similar: Vec<SimilarUser> = per_user
        .into_iter()
        .filter_map(|(user_id, taste)| {
            let shared = taste.genres.intersection(my_genres).count();
            (shared >= MIN_SHARED_GENRES).then_some(SimilarUser {
                user_id,
                shared_genre_count: shared,
                total_books_read: taste.books_read,
            })
        })
        .collect();

    similar.sort_by(|a, b| {
        b.shared_genre_count
            .cmp(&a.shared_genre_count)
            .then_with(|| b.total_books_read.cmp(&a.total_books_read))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    similar.truncate(MAX_SIMILAR_USERS);

    similar
}

/// Counts how many similar users read each candidate book.
///
/// Books already in the requesting user's library are excluded before
/// counting. Equal counts order by book id for deterministic output.
fn rank_books_by_read_count(
    other_entries: &[LibraryEntry],
    similar_users: &[SimilarUser],
    library_book_ids: &[Uuid],
    limit: usize,
) -> Vec<Uuid> {
    let similar_ids: HashSet<Uuid> = similar_users.iter().map(|u| u.user_id).collect();
    let excluded: HashSet<&Uuid> = library_book_ids.iter().collect();

    let mut read_counts: HashMap<Uuid, usize> = HashMap::new();
    for entry in other_entries {
        if similar_ids.contains(&entry.user_id) && !excluded.contains(&entry.book_id) {
            *read_counts.entry(entry.book_id).or_default() += 1;
        }
    }

    let mut ranked: Vec<(Uuid, usize)> = read_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);

    ranked.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::Shelf;

    fn entry(user_id: Uuid, book_id: Uuid) -> LibraryEntry {
        LibraryEntry {
            user_id,
            book_id,
            shelf: Shelf::Read,
            progress: 100,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_one_shared_genre_is_not_similar() {
        // Scenario: V shares one genre, W shares two; only W qualifies.
        let user_v = Uuid::new_v4();
        let user_w = Uuid::new_v4();
        let fantasy_book = Uuid::new_v4();
        let scifi_book = Uuid::new_v4();
        let romance_book = Uuid::new_v4();

        let genre_by_book: HashMap<Uuid, &str> = [
            (fantasy_book, "Fantasy"),
            (scifi_book, "Sci-Fi"),
            (romance_book, "Romance"),
        ]
        .into_iter()
        .collect();
        let my_genres: HashSet<&str> = ["Fantasy", "Sci-Fi"].into_iter().collect();

        let entries = vec![
            entry(user_v, fantasy_book),
            entry(user_v, romance_book),
            entry(user_w, fantasy_book),
            entry(user_w, scifi_book),
        ];

        let similar = find_similar_users(&entries, &genre_by_book, &my_genres);

        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].user_id, user_w);
        assert_eq!(similar[0].shared_genre_count, 2);
    }

    #[test]
    fn test_similar_users_ranked_by_overlap_then_volume() {
        let heavy_reader = Uuid::new_v4();
        let light_reader = Uuid::new_v4();
        let fantasy_book = Uuid::new_v4();
        let scifi_book = Uuid::new_v4();
        let extra_fantasy = Uuid::new_v4();

        let genre_by_book: HashMap<Uuid, &str> = [
            (fantasy_book, "Fantasy"),
            (scifi_book, "Sci-Fi"),
            (extra_fantasy, "Fantasy"),
        ]
        .into_iter()
        .collect();
        let my_genres: HashSet<&str> = ["Fantasy", "Sci-Fi"].into_iter().collect();

        let entries = vec![
            entry(light_reader, fantasy_book),
            entry(light_reader, scifi_book),
            entry(heavy_reader, fantasy_book),
            entry(heavy_reader, scifi_book),
            entry(heavy_reader, extra_fantasy),
        ];

        let similar = find_similar_users(&entries, &genre_by_book, &my_genres);

        assert_eq!(similar.len(), 2);
        assert_eq!(similar[0].user_id, heavy_reader);
        assert_eq!(similar[0].total_books_read, 3);
        assert_eq!(similar[1].user_id, light_reader);
    }

    #[test]
    fn test_rank_books_counts_across_similar_users() {
        let reader_a = Uuid::new_v4();
        let reader_b = Uuid::new_v4();
        let popular = Uuid::new_v4();
        let niche = Uuid::new_v4();

        let similar = vec![
            SimilarUser {
                user_id: reader_a,
                shared_genre_count: 2,
                total_books_read: 2,
            },
            SimilarUser {
                user_id: reader_b,
                shared_genre_count: 2,
                total_books_read: 1,
            },
        ];

        let entries = vec![
            entry(reader_a, popular),
            entry(reader_b, popular),
            entry(reader_a, niche),
        ];

        let ranked = rank_books_by_read_count(&entries, &similar, &[], 10);
        assert_eq!(ranked[0], popular);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rank_books_excludes_own_library() {
        let reader = Uuid::new_v4();
        let already_owned = Uuid::new_v4();
        let fresh = Uuid::new_v4();

        let similar = vec![SimilarUser {
            user_id: reader,
            shared_genre_count: 2,
            total_books_read: 2,
        }];
        let entries = vec![entry(reader, already_owned), entry(reader, fresh)];

        let ranked = rank_books_by_read_count(&entries, &similar, &[already_owned], 10);
        assert_eq!(ranked, vec![fresh]);
    }

    #[test]
    fn test_rank_books_respects_limit() {
        let reader = Uuid::new_v4();
        let similar = vec![SimilarUser {
            user_id: reader,
            shared_genre_count: 2,
            total_books_read: 5,
        }];
        let entries: Vec<LibraryEntry> =
            (0..5).map(|_| entry(reader, Uuid::new_v4())).collect();

        let ranked = rank_books_by_read_count(&entries, &similar, &[], 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_entries_from_dissimilar_users_are_ignored() {
        let similar_reader = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let shared_pick = Uuid::new_v4();
        let stranger_pick = Uuid::new_v4();

        let similar = vec![SimilarUser {
            user_id: similar_reader,
            shared_genre_count: 3,
            total_books_read: 1,
        }];
        let entries = vec![
            entry(similar_reader, shared_pick),
            entry(stranger, stranger_pick),
        ];

        let ranked = rank_books_by_read_count(&entries, &similar, &[], 10);
        assert_eq!(ranked, vec![shared_pick]);
    }
}
