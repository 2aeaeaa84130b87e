use serde::{Deserialize, Serialize};

use globalbooks_core::{Entity, Price};

/// A catalog record.
///
/// Immutable after creation: fields are only readable through accessors.
/// The ISBN is an opaque identifier and is not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    isbn: String,
    title: String,
    author: String,
    price: Price,
    stock: u32,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        price: Price,
        stock: u32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            price,
            stock,
        }
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Case-insensitive substring match against title or author.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}

impl Entity for Book {
    type Id = str;

    fn id(&self) -> &str {
        &self.isbn
    }
}
