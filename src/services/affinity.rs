use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, GenreAffinity, LibraryEntry},
    stores::CatalogStore,
};

/// Derives a user's ranked genre preferences from their "read" entries.
///
/// Joins the entries to their catalog books and groups by genre. A user
/// with no reading history yields an empty list, which downstream
/// generators treat as "no signal" rather than an error.
pub async fn genre_affinity(
    catalog: &dyn CatalogStore,
    read_entries: &[LibraryEntry],
) -> AppResult<Vec<GenreAffinity>> {
    if read_entries.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = read_entries.iter().map(|e| e.book_id).collect();
    let books = catalog.books_by_ids(&ids).await?;

    Ok(compute_affinity(read_entries, &books))
}

/// Groups read entries by their book's genre and ranks the genres.
///
/// The per-genre rating is the mean of the books' catalog-wide
/// `average_rating`, not the user's own ratings. Ordering: books read
/// descending, ties broken by that mean rating descending.
pub fn compute_affinity(read_entries: &[LibraryEntry], books: &[Book]) -> Vec<GenreAffinity> {
    let by_id: HashMap<Uuid, &Book> = books.iter().map(|b| (b.id, b)).collect();

    let mut per_genre: HashMap<&str, (u32, f64)> = HashMap::new();
    for entry in read_entries {
        // Entries whose book is missing from the catalog carry no genre signal
        if let Some(book) = by_id.get(&entry.book_id) {
            let slot = per_genre.entry(book.genre.as_str()).or_insert((0, 0.0));
            slot.0 += 1;
            slot.1 += book.average_rating;
        }
    }

    let mut affinities: Vec<GenreAffinity> = per_genre
        .into_iter()
        .map(|(genre, (books_read, rating_sum))| GenreAffinity {
            genre: genre.to_string(),
            books_read,
            average_rating: rating_sum / f64::from(books_read),
        })
        .collect();

    affinities.sort_by(|a, b| {
        b.books_read
            .cmp(&a.books_read)
            .then_with(|| b.average_rating.total_cmp(&a.average_rating))
            .then_with(|| a.genre.cmp(&b.genre))
    });

    affinities
}
