use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-shelf totals for the current calendar year
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShelfStats {
    pub books_read: u32,
    pub books_currently_reading: u32,
    pub books_want_to_read: u32,
    pub total_pages_read: i64,
    pub total_pages_currently_reading: i64,
    pub year: i32,
}

/// Consecutive-day reading streak over the user's "read" history
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStreak {
    pub current: u32,
    pub longest: u32,
    pub last_read_date: Option<DateTime<Utc>>,
}

impl ReadingStreak {
    pub fn empty() -> Self {
        Self {
            current: 0,
            longest: 0,
            last_read_date: None,
        }
    }
}

/// Books finished in one month of a target year
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProgress {
    /// 1-based month number
    pub month: u32,
    pub books_read: u32,
    pub total_pages: i64,
}

/// Books finished in one genre during the current year
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenreStats {
    pub genre: String,
    pub books_read: u32,
    pub total_pages: i64,
}
