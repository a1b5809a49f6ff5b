use axum::extract::State;

use crate::{
    error::{ApiError, ApiErrorResponse},
    server_error,
    state::ApiState,
};

use super::ListBooksResponse;

/// Lists every book in storage order.
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = ListBooksResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse),
    )
)]
#[tracing::instrument(name = "list_books", skip_all)]
pub async fn list_books(State(state): State<ApiState>) -> Result<ListBooksResponse, ApiError> {
    let books = state.store().list().await.map_err(server_error!(state))?;

    tracing::debug!(total = books.len(), "Listed books");

    Ok(ListBooksResponse::new(books))
}
