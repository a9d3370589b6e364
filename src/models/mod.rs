pub mod book;
pub mod library;
pub mod recommendation;
pub mod stats;

pub use book::Book;
pub use library::{LibraryEntry, Shelf};
pub use recommendation::{GenreAffinity, SimilarUser};
pub use stats::{GenreStats, MonthlyProgress, ReadingStreak, ShelfStats};
