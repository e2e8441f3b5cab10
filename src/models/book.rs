use serde::{Deserialize, Serialize};

/// A bookshelf entry. The title doubles as the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub category: String,
}

impl Book {
    pub fn new(title: &str, author: &str, category: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
        }
    }

    pub fn has_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    pub fn has_author(&self, author: &str) -> bool {
        self.author.to_lowercase() == author.to_lowercase()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// `?category=` on the bookshelf filter routes.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
}

/// `?author_name=` on the author query route.
#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author_name: String,
}
