//! SOAP payload ↔ catalog request/response mapping.

use globalbooks_catalog::{
    Book, GetBookRequest, GetBookResponse, SearchBooksRequest, SearchBooksResponse,
};

use crate::soap::{Element, EnvelopeError, XmlOut, encode_envelope};

/// Target namespace of the catalog payloads.
pub const CATALOG_NS: &str = "http://globalbooks.com/catalog";

const PREFIX: &str = "ns2";

/// A payload root mapped to a catalog operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOperation {
    GetBook(GetBookRequest),
    SearchBooks(SearchBooksRequest),
}

impl CatalogOperation {
    /// Map a payload root by `{namespace}localPart`; `None` means no endpoint.
    ///
    /// Request fields are matched by local name. A missing `isbn` becomes the
    /// empty string and a missing `keyword` stays absent.
    pub fn from_payload(payload: &Element) -> Option<Self> {
        if payload.namespace.as_deref() != Some(CATALOG_NS) {
            return None;
        }
        match payload.local_name.as_str() {
            "GetBookRequest" => Some(CatalogOperation::GetBook(GetBookRequest {
                isbn: payload
                    .child_by_local_name("isbn")
                    .map(|e| e.text.clone())
                    .unwrap_or_default(),
            })),
            "SearchBooksRequest" => Some(CatalogOperation::SearchBooks(SearchBooksRequest {
                keyword: payload.child_by_local_name("keyword").map(|e| e.text.clone()),
            })),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CatalogOperation::GetBook(_) => "GetBook",
            CatalogOperation::SearchBooks(_) => "SearchBooks",
        }
    }
}

pub fn encode_get_book_response(response: &GetBookResponse) -> Result<String, EnvelopeError> {
    encode_envelope(|out| {
        let root = format!("{PREFIX}:GetBookResponse");
        open_root(out, &root)?;
        if let Some(book) = &response.book {
            write_book(out, "book", book)?;
        }
        out.end(&root)
    })
}

pub fn encode_search_books_response(response: &SearchBooksResponse) -> Result<String, EnvelopeError> {
    encode_envelope(|out| {
        let root = format!("{PREFIX}:SearchBooksResponse");
        open_root(out, &root)?;
        for book in &response.books {
            write_book(out, "books", book)?;
        }
        out.end(&root)
    })
}

fn open_root(out: &mut XmlOut, root: &str) -> Result<(), EnvelopeError> {
    let ns_attr = format!("xmlns:{PREFIX}");
    out.start(root, &[(ns_attr.as_str(), CATALOG_NS)])
}

fn write_book(out: &mut XmlOut, element: &str, book: &Book) -> Result<(), EnvelopeError> {
    let name = |local: &str| format!("{PREFIX}:{local}");

    out.start(&name(element), &[])?;
    out.text_element(&name("isbn"), book.isbn())?;
    out.text_element(&name("title"), book.title())?;
    out.text_element(&name("author"), book.author())?;
    out.text_element(&name("price"), &book.price().to_string())?;
    out.text_element(&name("stock"), &book.stock().to_string())?;
    out.end(&name(element))
}
