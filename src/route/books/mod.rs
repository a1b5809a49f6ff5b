use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::book::{Book, BookChanges, NewBook};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

/// Request body for creating and updating books.
///
/// Every field is optional at the parsing stage. Creation requires all of them, updates
/// overwrite only the fields that are present. `null` counts as absent.
#[derive(Debug, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct BookPayload {
    #[validate(length(min = 1, message = "Must not be empty"))]
    #[schema(example = "Brave New World")]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Must not be empty"))]
    #[schema(example = "Aldous Huxley")]
    pub author: Option<String>,
    #[schema(example = 1932)]
    pub year: Option<i64>,
}

impl BookPayload {
    /// Converts into a [`NewBook`], or returns the first missing field in the order title, author, year.
    pub fn into_new_book(self) -> Result<NewBook, &'static str> {
        let title = self.title.ok_or("title")?;
        let author = self.author.ok_or("author")?;
        let year = self.year.ok_or("year")?;

        Ok(NewBook {
            title,
            author,
            year,
        })
    }
}

impl From<BookPayload> for BookChanges {
    fn from(payload: BookPayload) -> Self {
        BookChanges {
            title: payload.title,
            author: payload.author,
            year: payload.year,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    /// Always `true`.
    pub success: bool,
    pub data: Book,
}

impl BookResponse {
    pub fn new(book: Book) -> Self {
        Self {
            success: true,
            data: book,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListBooksResponse {
    /// Always `true`.
    pub success: bool,
    pub data: Vec<Book>,
    /// Number of books in `data`.
    pub total: usize,
}

impl ListBooksResponse {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            success: true,
            total: books.len(),
            data: books,
        }
    }
}

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
