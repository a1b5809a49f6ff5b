use axum::Json;
use utoipa::OpenApi;

use crate::{
    book::Book,
    error::ApiErrorResponse,
    route::books::{self, BookPayload, BookResponse, ListBooksResponse},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        books::list_books::list_books,
        books::get_book::get_book,
        books::create_book::create_book,
        books::update_book::update_book,
        books::delete_book::delete_book,
    ),
    components(schemas(Book, BookPayload, BookResponse, ListBooksResponse, ApiErrorResponse)),
    tags((name = "books", description = "Book records"))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document of the book API.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
