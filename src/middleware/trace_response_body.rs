use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;

use crate::error::{ApiError, ErrorVerbosityProvider, InternalServerError};

/// Middleware to trace the response body.
///
/// Buffers the whole body before passing it on. Enable only while debugging.
pub async fn trace_response_body<S: ErrorVerbosityProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let (parts, body) = next.run(req).await.into_parts();

    let bytes = body
        .collect()
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?
        .to_bytes();

    let status = parts.status;

    match std::str::from_utf8(&bytes) {
        Ok("") => tracing::trace!(%method, %uri, %status, "Empty response body"),
        Ok(body) => tracing::trace!(%method, %uri, %status, %body, "Response body"),
        Err(_) => tracing::trace!(%method, %uri, %status, len = bytes.len(), "Binary response body"),
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
