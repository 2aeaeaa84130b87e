//! Request handler: adapts inbound requests to store queries.
//!
//! Transport adapters deserialize into the request types below, call the
//! handler, and serialize the response. Nothing here can fail.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::book::Book;
use crate::store::CatalogStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBookRequest {
    pub isbn: String,
}

/// `book` is `None` when no record has the requested ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBookResponse {
    pub book: Option<Book>,
}

/// An absent keyword behaves like the empty keyword (matches everything).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBooksRequest {
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBooksResponse {
    pub books: Vec<Book>,
}

/// Stateless handler over a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct CatalogHandler {
    store: Arc<CatalogStore>,
}

impl CatalogHandler {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn handle_get_book(&self, request: GetBookRequest) -> GetBookResponse {
        tracing::info!(isbn = %request.isbn, "received GetBook request");

        let book = self.store.find_by_isbn(&request.isbn).cloned();
        match &book {
            Some(found) => tracing::debug!(title = %found.title(), "found book"),
            None => tracing::debug!(isbn = %request.isbn, "no book with isbn"),
        }

        GetBookResponse { book }
    }

    pub fn handle_search_books(&self, request: SearchBooksRequest) -> SearchBooksResponse {
        let keyword = request.keyword.unwrap_or_default().to_lowercase();
        tracing::info!(keyword = %keyword, "received SearchBooks request");

        let books: Vec<Book> = self.store.search(&keyword).into_iter().cloned().collect();
        tracing::debug!(matches = books.len(), "search complete");

        SearchBooksResponse { books }
    }
}
