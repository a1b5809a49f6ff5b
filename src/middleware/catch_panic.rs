use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, ErrorVerbosity, InternalServerError};

/// Builds the response for a panicking handler, for use with
/// [`tower_http::catch_panic::CatchPanicLayer::custom`].
pub fn handle_panic(
    verbosity: ErrorVerbosity,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone {
    move |panic| {
        let details = if let Some(details) = panic.downcast_ref::<String>() {
            details.as_str()
        } else if let Some(details) = panic.downcast_ref::<&str>() {
            details
        } else {
            "Unknown panic payload"
        };

        tracing::error!(%details, "Handler panicked");

        ApiError::InternalServerError(InternalServerError::new(verbosity)).into_response()
    }
}
