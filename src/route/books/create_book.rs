use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{ApiError, ApiErrorResponse, BodyError, BodyErrorType, ErrorVerbosityProvider},
    extractor::{json::ApiJson, validated::Validated},
    server_error,
    state::ApiState,
};

use super::{BookPayload, BookResponse};

/// [`BookResponse`] sent with [`StatusCode::CREATED`].
#[derive(Debug)]
pub struct CreateBookResponse(pub BookResponse);

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Not JSON, missing or invalid fields", body = ApiErrorResponse),
    )
)]
#[tracing::instrument(name = "create_book", skip_all)]
pub async fn create_book(
    State(state): State<ApiState>,
    Validated(ApiJson(payload)): Validated<ApiJson<BookPayload>>,
) -> Result<CreateBookResponse, ApiError> {
    let new_book = payload.into_new_book().map_err(|field| {
        tracing::warn!(field, "Rejection. Missing required field");

        BodyError::new(
            state.error_verbosity(),
            BodyErrorType::MissingField { field },
        )
    })?;

    let book = state
        .store()
        .create(&new_book)
        .await
        .map_err(server_error!(state))?;

    tracing::info!(id = book.id, "Created book");

    Ok(CreateBookResponse(BookResponse::new(book)))
}
