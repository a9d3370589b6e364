use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's reading-status bucket for a book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Shelf {
    WantToRead,
    CurrentlyReading,
    Read,
}

impl Shelf {
    /// Wire/store representation, matching the serde names
    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::WantToRead => "wantToRead",
            Shelf::CurrentlyReading => "currentlyReading",
            Shelf::Read => "read",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "wantToRead" => Some(Shelf::WantToRead),
            "currentlyReading" => Some(Shelf::CurrentlyReading),
            "read" => Some(Shelf::Read),
            _ => None,
        }
    }
}

/// One (user, book) membership record in a reading library.
///
/// The store enforces at most one entry per (user, book) pair. `progress`
/// is the number of pages read so far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub shelf: Shelf,
    pub progress: i32,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_serialization() {
        assert_eq!(
            serde_json::to_string(&Shelf::WantToRead).unwrap(),
            "\"wantToRead\""
        );
        assert_eq!(
            serde_json::to_string(&Shelf::CurrentlyReading).unwrap(),
            "\"currentlyReading\""
        );
        assert_eq!(serde_json::to_string(&Shelf::Read).unwrap(), "\"read\"");
    }

    #[test]
    fn test_shelf_parse_round_trips() {
        for shelf in [Shelf::WantToRead, Shelf::CurrentlyReading, Shelf::Read] {
            assert_eq!(Shelf::parse(shelf.as_str()), Some(shelf));
        }
        assert_eq!(Shelf::parse("finished"), None);
    }
}
