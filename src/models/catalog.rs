use serde::{Deserialize, Serialize};
use validator::Validate;

/// A catalog entry. `id` is always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub rating: i64,
    pub published_date: i64,
}

impl CatalogBook {
    /// Builds a book from a request, discarding whatever id the client sent.
    pub fn from_request(id: i64, request: BookRequest) -> Self {
        Self {
            id,
            title: request.title,
            author: request.author,
            description: request.description,
            rating: request.rating,
            published_date: request.published_date,
        }
    }
}

/// Body accepted by the catalog's create and update routes.
///
/// `id` is ignored on create; on update it selects the book to replace.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookRequest {
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(length(min = 3))]
    pub title: String,

    #[validate(length(min = 1))]
    pub author: String,

    #[validate(length(min = 1, max = 100))]
    pub description: String,

    #[validate(range(min = 0, max = 5))]
    pub rating: i64,

    #[validate(range(min = 2000, max = 2030))]
    pub published_date: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookIdPath {
    #[validate(range(min = 1))]
    pub book_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RatingQuery {
    #[validate(range(min = 1, max = 5))]
    pub book_rating: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PublishedDatePath {
    #[validate(range(min = 2000, max = 2030))]
    pub published_date: i64,
}
