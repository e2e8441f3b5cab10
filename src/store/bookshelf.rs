use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::Book;

/// In-memory bookshelf. Every lookup is a linear scan under one lock.
#[derive(Debug, Default)]
pub struct Bookshelf {
    books: RwLock<Vec<Book>>,
}

impl Bookshelf {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// The shelf the service starts with.
    pub fn seeded() -> Self {
        Self::new(vec![
            Book::new("Title One", "Author One", "science"),
            Book::new("Title Two", "Author Two", "science"),
            Book::new("Title Three", "Author Three", "history"),
            Book::new("Title Four", "Author Four", "math"),
            Book::new("Title Five", "Author Five", "math"),
            Book::new("Title Six", "Author Two", "math"),
        ])
    }

    pub fn all(&self) -> Vec<Book> {
        self.read().clone()
    }

    pub fn find_by_title(&self, title: &str) -> Option<Book> {
        self.read().iter().find(|book| book.has_title(title)).cloned()
    }

    pub fn by_category(&self, category: &str) -> Vec<Book> {
        self.filter(|book| book.has_category(category))
    }

    pub fn by_author(&self, author: &str) -> Vec<Book> {
        self.filter(|book| book.has_author(author))
    }

    pub fn by_author_and_category(&self, author: &str, category: &str) -> Vec<Book> {
        self.filter(|book| book.has_author(author) && book.has_category(category))
    }

    /// Appends without any uniqueness check.
    pub fn add(&self, book: Book) {
        self.write().push(book);
    }

    /// Replaces every book whose title matches and returns how many were replaced.
    pub fn update(&self, book: Book) -> usize {
        let mut books = self.write();
        let mut replaced = 0;
        for slot in books.iter_mut().filter(|existing| existing.has_title(&book.title)) {
            *slot = book.clone();
            replaced += 1;
        }
        replaced
    }

    /// Removes the first book whose title matches.
    pub fn remove(&self, title: &str) -> Option<Book> {
        let mut books = self.write();
        let position = books.iter().position(|book| book.has_title(title))?;
        Some(books.remove(position))
    }

    fn filter(&self, predicate: impl Fn(&Book) -> bool) -> Vec<Book> {
        self.read().iter().filter(|book| predicate(book)).cloned().collect()
    }

    // A writer that panicked mid-operation leaves a consistent Vec behind.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Book>> {
        self.books.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Book>> {
        self.books.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_by_title_is_case_insensitive() {
        let shelf = Bookshelf::seeded();
        assert_eq!(
            shelf.find_by_title("title four"),
            Some(Book::new("Title Four", "Author Four", "math"))
        );
        assert_eq!(shelf.find_by_title("Title Seven"), None);
    }

    #[test]
    fn test_filters_return_empty_on_miss() {
        let shelf = Bookshelf::seeded();
        assert_eq!(shelf.by_category("MATH").len(), 3);
        assert_eq!(shelf.by_author("author two").len(), 2);
        assert_eq!(
            shelf.by_author_and_category("Author Two", "math"),
            vec![Book::new("Title Six", "Author Two", "math")]
        );
        assert!(shelf.by_category("poetry").is_empty());
        assert!(shelf.by_author_and_category("Author One", "math").is_empty());
    }

    #[test]
    fn test_add_allows_duplicates() {
        let shelf = Bookshelf::new(Vec::new());
        shelf.add(Book::new("Dune", "Frank Herbert", "fiction"));
        shelf.add(Book::new("Dune", "Frank Herbert", "fiction"));
        assert_eq!(shelf.all().len(), 2);
    }

    #[test]
    fn test_update_replaces_every_match() {
        let shelf = Bookshelf::new(vec![
            Book::new("Dune", "Frank Herbert", "fiction"),
            Book::new("Emma", "Jane Austen", "fiction"),
            Book::new("DUNE", "Someone Else", "fiction"),
        ]);

        let replaced = shelf.update(Book::new("dune", "Frank Herbert", "science fiction"));
        assert_eq!(replaced, 2);
        assert_eq!(shelf.by_category("science fiction").len(), 2);
        assert_eq!(shelf.find_by_title("Emma").unwrap().category, "fiction");
    }

    #[test]
    fn test_update_without_match_is_noop() {
        let shelf = Bookshelf::seeded();
        let before = shelf.all();
        assert_eq!(shelf.update(Book::new("Missing", "Nobody", "none")), 0);
        assert_eq!(shelf.all(), before);
    }

    #[test]
    fn test_remove_takes_first_match_only() {
        let shelf = Bookshelf::new(vec![
            Book::new("Dune", "First", "fiction"),
            Book::new("Dune", "Second", "fiction"),
        ]);

        let removed = shelf.remove("dune").unwrap();
        assert_eq!(removed.author, "First");
        assert_eq!(shelf.all(), vec![Book::new("Dune", "Second", "fiction")]);
        assert!(shelf.remove("Missing").is_none());
    }
}
