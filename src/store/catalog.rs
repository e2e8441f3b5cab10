use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{BookRequest, CatalogBook};

/// In-memory catalog of rated books.
///
/// Ids come from a counter owned by the store rather than from the last
/// element, so an id is never handed out twice even after deletions.
#[derive(Debug)]
pub struct Catalog {
    state: Mutex<CatalogState>,
}

#[derive(Debug)]
struct CatalogState {
    books: Vec<CatalogBook>,
    next_id: i64,
}

impl Catalog {
    pub fn new(books: Vec<CatalogBook>) -> Self {
        let next_id = books.iter().map(|book| book.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(CatalogState { books, next_id }),
        }
    }

    /// The catalog the service starts with.
    pub fn seeded() -> Self {
        let seed = [
            (1, "Computer Science Pro", "codingwithroby", "A very nice book!", 5, 2030),
            (2, "Be Fast with FastAPI", "codingwithroby", "A great book!", 5, 2030),
            (3, "Master Endpoints", "codingwithroby", "A awesome book!", 5, 2029),
            (4, "HP1", "Author 1", "Book Description", 2, 2028),
            (5, "HP2", "Author 2", "Book Description", 3, 2027),
            (6, "HP3", "Author 3", "Book Description", 1, 2026),
        ];

        Self::new(
            seed.into_iter()
                .map(|(id, title, author, description, rating, published_date)| CatalogBook {
                    id,
                    title: title.to_string(),
                    author: author.to_string(),
                    description: description.to_string(),
                    rating,
                    published_date,
                })
                .collect(),
        )
    }

    pub fn all(&self) -> Vec<CatalogBook> {
        self.lock().books.clone()
    }

    pub fn get(&self, id: i64) -> Option<CatalogBook> {
        self.lock().books.iter().find(|book| book.id == id).cloned()
    }

    pub fn by_rating(&self, rating: i64) -> Vec<CatalogBook> {
        self.filter(|book| book.rating == rating)
    }

    pub fn by_published_date(&self, published_date: i64) -> Vec<CatalogBook> {
        self.filter(|book| book.published_date == published_date)
    }

    /// Appends a new book under the next id and returns it.
    pub fn create(&self, request: BookRequest) -> CatalogBook {
        let mut state = self.lock();
        let book = CatalogBook::from_request(state.next_id, request);
        state.next_id += 1;
        state.books.push(book.clone());
        book
    }

    /// Replaces the book with the given id. `None` when no book has it.
    pub fn update(&self, id: i64, request: BookRequest) -> Option<CatalogBook> {
        let mut state = self.lock();
        let slot = state.books.iter_mut().find(|book| book.id == id)?;
        *slot = CatalogBook::from_request(id, request);
        Some(slot.clone())
    }

    pub fn delete(&self, id: i64) -> Option<CatalogBook> {
        let mut state = self.lock();
        let position = state.books.iter().position(|book| book.id == id)?;
        Some(state.books.remove(position))
    }

    fn filter(&self, predicate: impl Fn(&CatalogBook) -> bool) -> Vec<CatalogBook> {
        self.lock()
            .books
            .iter()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
