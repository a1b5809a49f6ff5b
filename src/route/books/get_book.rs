use axum::extract::State;

use crate::{
    error::{ApiError, ApiErrorResponse, BookNotFoundError, ErrorVerbosityProvider},
    extractor::path::ApiPath,
    server_error,
    state::ApiState,
};

use super::BookResponse;

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 404, description = "Book not found", body = ApiErrorResponse),
    )
)]
#[tracing::instrument(name = "get_book", skip_all)]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<BookResponse, ApiError> {
    let book = state
        .store()
        .get(id)
        .await
        .map_err(server_error!(state))?
        .ok_or_else(|| BookNotFoundError::new(state.error_verbosity(), id))?;

    Ok(BookResponse::new(book))
}
