use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::{ApiError, ApiErrorResponse, BookNotFoundError, ErrorVerbosityProvider},
    extractor::path::ApiPath,
    server_error,
    state::ApiState,
};

/// Empty [`StatusCode::NO_CONTENT`] response.
#[derive(Debug)]
pub struct DeleteBookResponse;

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ApiErrorResponse),
    )
)]
#[tracing::instrument(name = "delete_book", skip_all)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<DeleteBookResponse, ApiError> {
    let deleted = state
        .store()
        .delete(id)
        .await
        .map_err(server_error!(state))?;

    if !deleted {
        return Err(BookNotFoundError::new(state.error_verbosity(), id).into());
    }

    tracing::info!(id, "Deleted book");

    Ok(DeleteBookResponse)
}
