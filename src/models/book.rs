use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog book as served to clients.
///
/// Owned by the catalog store; this core only ever holds request-scoped
/// copies. `average_rating` may be absent upstream, in which case it is
/// treated as 0 everywhere ratings are compared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Genre identifier, e.g. "Fantasy"
    pub genre: String,
    pub cover_image: Option<String>,
    pub total_pages: i32,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: i32,
}
