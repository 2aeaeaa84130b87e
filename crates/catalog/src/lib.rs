//! Book catalog domain module.
//!
//! This crate holds the fixed, in-memory catalog and the request handler that
//! answers `GetBook` and `SearchBooks`, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no XML, no credentials).

pub mod book;
pub mod handler;
pub mod store;

pub use book::Book;
pub use handler::{
    CatalogHandler, GetBookRequest, GetBookResponse, SearchBooksRequest, SearchBooksResponse,
};
pub use store::CatalogStore;
