//! The fixed, read-only book collection.

use std::collections::HashSet;

use globalbooks_core::{DomainError, DomainResult, Entity, Price};

use crate::book::Book;

/// Ordered, immutable sequence of books with unique ISBNs.
///
/// Built once at startup and shared read-only (typically behind an `Arc`);
/// there are no mutation methods, so concurrent readers need no locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStore {
    books: Vec<Book>,
}

impl CatalogStore {
    /// Build a store from an ordered list of books.
    ///
    /// Fails if two books share an ISBN.
    pub fn from_books(books: Vec<Book>) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if !seen.insert(book.id()) {
                return Err(DomainError::invariant(format!(
                    "duplicate isbn '{}' in catalog",
                    book.id()
                )));
            }
        }
        Ok(Self { books })
    }

    /// The three-book catalog the service ships with.
    pub fn seeded() -> Self {
        Self {
            books: vec![
                Book::new(
                    "978-0134685991",
                    "Effective Java",
                    "Joshua Bloch",
                    Price::from_minor_units(4599),
                    50,
                ),
                Book::new(
                    "978-0596009205",
                    "Head First Java",
                    "Kathy Sierra",
                    Price::from_minor_units(3599),
                    30,
                ),
                Book::new(
                    "978-0132350884",
                    "Clean Code",
                    "Robert Martin",
                    Price::from_minor_units(4000),
                    25,
                ),
            ],
        }
    }

    /// Exact, case-sensitive ISBN lookup. A miss is `None`, not an error.
    pub fn find_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == isbn)
    }

    /// Books whose title or author contains `keyword`, ignoring case.
    ///
    /// The empty keyword matches every book. Results keep catalog order.
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        let needle = keyword.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.matches_lowercase(&needle))
            .collect()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
