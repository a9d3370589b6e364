//! Reading-statistics computations.
//!
//! Pure aggregation over library snapshots: shelf totals, the
//! consecutive-day reading streak, monthly progress, and the per-genre
//! breakdown. Handlers pass the current instant in so every function here
//! stays deterministic under test.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, GenreStats, LibraryEntry, MonthlyProgress, ReadingStreak, Shelf, ShelfStats},
    stores::{CatalogStore, LibraryStore},
};

/// Shelf totals for the current year plus the all-time reading streak
#[derive(Debug)]
pub struct ReadingStats {
    pub stats: ShelfStats,
    pub streak: ReadingStreak,
}

pub async fn reading_stats(
    library: &dyn LibraryStore,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<ReadingStats> {
    let entries = library.entries_for_user(user_id, None).await?;
    Ok(ReadingStats {
        stats: shelf_stats(&entries, now.year()),
        streak: reading_streak(&entries),
    })
}

pub async fn monthly_progress(
    library: &dyn LibraryStore,
    user_id: Uuid,
    year: i32,
) -> AppResult<Vec<MonthlyProgress>> {
    let entries = library.entries_for_user(user_id, Some(Shelf::Read)).await?;
    Ok(progress_by_month(&entries, year))
}

pub async fn genre_breakdown(
    library: &dyn LibraryStore,
    catalog: &dyn CatalogStore,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Vec<GenreStats>> {
    let entries = library.entries_for_user(user_id, Some(Shelf::Read)).await?;
    let this_year: Vec<LibraryEntry> = entries
        .into_iter()
        .filter(|e| e.updated_at.year() == now.year())
        .collect();

    let ids: Vec<Uuid> = this_year.iter().map(|e| e.book_id).collect();
    let books = catalog.books_by_ids(&ids).await?;

    Ok(breakdown_by_genre(&this_year, &books))
}

/// Counts books and pages per shelf among entries touched in `year`
pub fn shelf_stats(entries: &[LibraryEntry], year: i32) -> ShelfStats {
    let mut stats = ShelfStats {
        year,
        ..ShelfStats::default()
    };

    for entry in entries.iter().filter(|e| e.updated_at.year() == year) {
        match entry.shelf {
            Shelf::Read => {
                stats.books_read += 1;
                stats.total_pages_read += i64::from(entry.progress);
            }
            Shelf::CurrentlyReading => {
                stats.books_currently_reading += 1;
                stats.total_pages_currently_reading += i64::from(entry.progress);
            }
            Shelf::WantToRead => stats.books_want_to_read += 1,
        }
    }

    stats
}

/// Consecutive-day streak over the "read" shelf.
///
/// Finish dates collapse to calendar days; a run is a maximal sequence of
/// days each one day apart. `current` is the run containing the most
/// recent read day, `longest` the maximal run anywhere in history.
pub fn reading_streak(entries: &[LibraryEntry]) -> ReadingStreak {
    let read_entries: Vec<&LibraryEntry> =
        entries.iter().filter(|e| e.shelf == Shelf::Read).collect();

    let last_read_date = read_entries.iter().map(|e| e.updated_at).max();
    let Some(last_read_date) = last_read_date else {
        return ReadingStreak::empty();
    };

    let mut days: Vec<NaiveDate> = read_entries
        .iter()
        .map(|e| e.updated_at.date_naive())
        .collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let mut current = 0u32;
    let mut longest = 1u32;
    let mut run = 1u32;

    for window in days.windows(2) {
        if (window[0] - window[1]).num_days() == 1 {
            run += 1;
        } else {
            if current == 0 {
                current = run;
            }
            longest = longest.max(run);
            run = 1;
        }
    }
    longest = longest.max(run);
    if current == 0 {
        current = run;
    }

    ReadingStreak {
        current,
        longest,
        last_read_date: Some(last_read_date),
    }
}

/// Groups "read" entries of `year` by month, zero-filling missing months
pub fn progress_by_month(read_entries: &[LibraryEntry], year: i32) -> Vec<MonthlyProgress> {
    let mut months: Vec<MonthlyProgress> = (1..=12)
        .map(|month| MonthlyProgress {
            month,
            books_read: 0,
            total_pages: 0,
        })
        .collect();

    for entry in read_entries.iter().filter(|e| e.updated_at.year() == year) {
        let slot = &mut months[entry.updated_at.month() as usize - 1];
        slot.books_read += 1;
        slot.total_pages += i64::from(entry.progress);
    }

    months
}

/// Groups read entries by their book's genre, most-read genres first
pub fn breakdown_by_genre(read_entries: &[LibraryEntry], books: &[Book]) -> Vec<GenreStats> {
    let genre_by_book: HashMap<Uuid, &str> = books
        .iter()
        .map(|b| (b.id, b.genre.as_str()))
        .collect();

    let mut per_genre: HashMap<&str, (u32, i64)> = HashMap::new();
    for entry in read_entries {
        if let Some(genre) = genre_by_book.get(&entry.book_id) {
            let slot = per_genre.entry(genre).or_insert((0, 0));
            slot.0 += 1;
            slot.1 += i64::from(entry.progress);
        }
    }

    let mut breakdown: Vec<GenreStats> = per_genre
        .into_iter()
        .map(|(genre, (books_read, total_pages))| GenreStats {
            genre: genre.to_string(),
            books_read,
            total_pages,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.books_read
            .cmp(&a.books_read)
            .then_with(|| a.genre.cmp(&b.genre))
    });

    breakdown
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry_on(shelf: Shelf, progress: i32, when: DateTime<Utc>) -> LibraryEntry {
        LibraryEntry {
            user_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            shelf,
            progress,
            updated_at: when,
        }
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_shelf_stats_counts_current_year_only() {
        let entries = vec![
            entry_on(Shelf::Read, 300, at(2026, 3, 1)),
            entry_on(Shelf::Read, 250, at(2026, 5, 2)),
            entry_on(Shelf::CurrentlyReading, 40, at(2026, 6, 3)),
            entry_on(Shelf::WantToRead, 0, at(2026, 6, 4)),
            entry_on(Shelf::Read, 500, at(2025, 12, 30)),
        ];

        let stats = shelf_stats(&entries, 2026);

        assert_eq!(stats.books_read, 2);
        assert_eq!(stats.total_pages_read, 550);
        assert_eq!(stats.books_currently_reading, 1);
        assert_eq!(stats.total_pages_currently_reading, 40);
        assert_eq!(stats.books_want_to_read, 1);
        assert_eq!(stats.year, 2026);
    }

    #[test]
    fn test_streak_empty_history() {
        let streak = reading_streak(&[]);
        assert_eq!(streak, ReadingStreak::empty());
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let entries = vec![
            entry_on(Shelf::Read, 100, at(2026, 8, 5)),
            entry_on(Shelf::Read, 100, at(2026, 8, 6)),
            entry_on(Shelf::Read, 100, at(2026, 8, 7)),
            // A longer but older run, broken off from the current one
            entry_on(Shelf::Read, 100, at(2026, 7, 1)),
            entry_on(Shelf::Read, 100, at(2026, 7, 2)),
            entry_on(Shelf::Read, 100, at(2026, 7, 3)),
            entry_on(Shelf::Read, 100, at(2026, 7, 4)),
        ];

        let streak = reading_streak(&entries);

        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 4);
        assert_eq!(streak.last_read_date, Some(at(2026, 8, 7)));
    }

    #[test]
    fn test_streak_same_day_reads_collapse() {
        let entries = vec![
            entry_on(Shelf::Read, 100, at(2026, 8, 7)),
            entry_on(Shelf::Read, 100, at(2026, 8, 7)),
        ];

        let streak = reading_streak(&entries);

        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn test_streak_ignores_unfinished_shelves() {
        let entries = vec![
            entry_on(Shelf::CurrentlyReading, 10, at(2026, 8, 7)),
            entry_on(Shelf::WantToRead, 0, at(2026, 8, 6)),
        ];

        assert_eq!(reading_streak(&entries), ReadingStreak::empty());
    }

    #[test]
    fn test_monthly_progress_zero_fills() {
        let entries = vec![
            entry_on(Shelf::Read, 320, at(2026, 1, 10)),
            entry_on(Shelf::Read, 200, at(2026, 1, 20)),
            entry_on(Shelf::Read, 150, at(2026, 4, 5)),
            entry_on(Shelf::Read, 400, at(2025, 4, 5)),
        ];

        let months = progress_by_month(&entries, 2026);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].books_read, 2);
        assert_eq!(months[0].total_pages, 520);
        assert_eq!(months[3].books_read, 1);
        assert_eq!(months[1].books_read, 0);
    }

    #[test]
    fn test_genre_breakdown_orders_by_books_read() {
        let fantasy_a = Book {
            id: Uuid::new_v4(),
            title: "f1".to_string(),
            author: "a".to_string(),
            genre: "Fantasy".to_string(),
            cover_image: None,
            total_pages: 300,
            average_rating: 4.0,
            total_reviews: 5,
        };
        let mut fantasy_b = fantasy_a.clone();
        fantasy_b.id = Uuid::new_v4();
        let mut scifi = fantasy_a.clone();
        scifi.id = Uuid::new_v4();
        scifi.genre = "Sci-Fi".to_string();

        let entries = vec![
            LibraryEntry {
                user_id: Uuid::new_v4(),
                book_id: fantasy_a.id,
                shelf: Shelf::Read,
                progress: 300,
                updated_at: at(2026, 2, 1),
            },
            LibraryEntry {
                user_id: Uuid::new_v4(),
                book_id: fantasy_b.id,
                shelf: Shelf::Read,
                progress: 250,
                updated_at: at(2026, 3, 1),
            },
            LibraryEntry {
                user_id: Uuid::new_v4(),
                book_id: scifi.id,
                shelf: Shelf::Read,
                progress: 180,
                updated_at: at(2026, 4, 1),
            },
        ];

        let breakdown = breakdown_by_genre(&entries, &[fantasy_a, fantasy_b, scifi]);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].genre, "Fantasy");
        assert_eq!(breakdown[0].books_read, 2);
        assert_eq!(breakdown[0].total_pages, 550);
        assert_eq!(breakdown[1].genre, "Sci-Fi");
    }
}
