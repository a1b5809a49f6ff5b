use axum::extract::State;

use crate::{
    book::BookChanges,
    error::{ApiError, ApiErrorResponse, BookNotFoundError, ErrorVerbosityProvider},
    extractor::{json::ApiJson, path::ApiPath, validated::Validated},
    server_error,
    state::ApiState,
};

use super::{BookPayload, BookResponse};

/// Overwrites the fields present in the body and keeps the others.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Merged book", body = BookResponse),
        (status = 400, description = "Not JSON or invalid fields", body = ApiErrorResponse),
        (status = 404, description = "Book not found", body = ApiErrorResponse),
    )
)]
#[tracing::instrument(name = "update_book", skip_all)]
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
    Validated(ApiJson(payload)): Validated<ApiJson<BookPayload>>,
) -> Result<BookResponse, ApiError> {
    let changes = BookChanges::from(payload);

    let book = state
        .store()
        .update(id, &changes)
        .await
        .map_err(server_error!(state))?
        .ok_or_else(|| BookNotFoundError::new(state.error_verbosity(), id))?;

    tracing::info!(id, "Updated book");

    Ok(BookResponse::new(book))
}
