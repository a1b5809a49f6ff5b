use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns the error envelope with the appropriate status code.
    #[default]
    Message,
    /// Server returns the error envelope, enriched with the rejection reason for client errors.
    ///
    /// Internal server errors never carry a reason.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_message(&self) -> bool {
        match self {
            ErrorVerbosity::Message | ErrorVerbosity::Full => true,
            ErrorVerbosity::StatusCode => false,
        }
    }

    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    /// Returns the error verbosity.
    fn error_verbosity(&self) -> ErrorVerbosity;
}

/// Maps any error into an [`InternalServerError`] using the verbosity of the given state.
///
/// Usage: `.map_err(server_error!(state))?`
#[macro_export]
macro_rules! server_error {
    ($state:expr) => {
        |err| {
            $crate::error::InternalServerError::from_generic_error(
                $crate::error::ErrorVerbosityProvider::error_verbosity(&$state),
                err,
            )
        }
    };
}

/// Error envelope returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Always `false`.
    success: bool,
    /// Human readable error message.
    #[schema(value_type = String, example = "Book not found")]
    error: Cow<'static, str>,
    /// Why the request was rejected. Only present with `Full` verbosity.
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    /// Expected request body schema as YAML. Only present with `Full` verbosity.
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_schema: Option<String>,
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let error_message = error.message();

        let (reason, expected_schema) = match error {
            ApiError::Body(err) => (err.body_error_reason, err.body_expected_schema),
            ApiError::Path(err) => (err.path_error_reason, None),
            _ => (None, None),
        };

        ApiErrorResponse {
            success: false,
            error: error_message,
            reason,
            expected_schema,
        }
    }
}

#[derive(Debug, From)]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an unexpected failure occurs, including storage failures.
    InternalServerError(InternalServerError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Path error
    ///
    /// This error is returned when the path parameters do not match the resource.
    Path(PathError),
    /// Method not allowed
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when no route matches the request.
    NotFound(NotFoundError),
    /// Book not found error
    ///
    /// This error is returned when the requested book does not exist.
    BookNotFound(BookNotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
            ApiError::BookNotFound(err) => err.verbosity,
        }
    }

    fn message(&self) -> Cow<'static, str> {
        match self {
            ApiError::InternalServerError(_) => Cow::Borrowed("Internal Server Error"),
            ApiError::Body(err) => err.message(),
            ApiError::Path(_) => Cow::Borrowed("Resource not found"),
            ApiError::MethodNotAllowed(_) => Cow::Borrowed("Method not allowed"),
            ApiError::NotFound(_) => Cow::Borrowed("Resource not found"),
            ApiError::BookNotFound(_) => Cow::Borrowed("Book not found"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Path(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BookNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if !self.verbosity().should_generate_message() {
            return status_code.into_response();
        }

        (status_code, Json(ApiErrorResponse::from(self))).into_response()
    }
}

#[derive(Debug)]
pub struct InternalServerError {
    verbosity: ErrorVerbosity,
}

impl InternalServerError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        InternalServerError { verbosity }
    }

    /// Logs the error and discards it. Clients never see the cause.
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        InternalServerError { verbosity }
    }
}

#[derive(Debug)]
pub enum BodyErrorType {
    /// The request does not declare a JSON body.
    ContentType,
    /// The body is JSON but does not fit the expected shape.
    Malformed,
    /// A required field is absent.
    MissingField { field: &'static str },
    /// Fields are present but fail validation.
    InvalidFields { fields: Vec<String> },
}

#[derive(Debug)]
pub struct BodyError {
    verbosity: ErrorVerbosity,
    body_error_type: BodyErrorType,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(verbosity: ErrorVerbosity, body_error_type: BodyErrorType) -> Self {
        BodyError {
            verbosity,
            body_error_type,
            body_error_reason: None,
            body_expected_schema: None,
        }
    }

    pub fn content_type(verbosity: ErrorVerbosity, body_error_reason: String) -> Self {
        BodyError {
            body_error_reason: verbosity
                .should_generate_error_reason()
                .then_some(body_error_reason),
            ..Self::new(verbosity, BodyErrorType::ContentType)
        }
    }

    pub fn malformed(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), Some(body_expected_schema)),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_type: BodyErrorType::Malformed,
            body_error_reason,
            body_expected_schema,
        }
    }

    pub fn from_validation_errors(verbosity: ErrorVerbosity, errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();

        BodyError {
            body_error_reason: verbosity
                .should_generate_error_reason()
                .then(|| errors.to_string()),
            ..Self::new(verbosity, BodyErrorType::InvalidFields { fields })
        }
    }

    fn message(&self) -> Cow<'static, str> {
        match &self.body_error_type {
            BodyErrorType::ContentType => Cow::Borrowed("Content-type must be application/json"),
            BodyErrorType::Malformed => Cow::Borrowed("Failed to parse request body"),
            BodyErrorType::MissingField { field } => {
                Cow::Owned(format!("Missing required fields: {field}"))
            }
            BodyErrorType::InvalidFields { fields } => {
                Cow::Owned(format!("Invalid fields: {}", fields.join(", ")))
            }
        }
    }
}

#[derive(Debug)]
pub struct PathError {
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
        }
    }
}

#[derive(Debug)]
pub struct MethodNotAllowedError {
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug)]
pub struct NotFoundError {
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

#[derive(Debug)]
pub struct BookNotFoundError {
    verbosity: ErrorVerbosity,
}

impl BookNotFoundError {
    pub fn new(verbosity: ErrorVerbosity, id: i64) -> Self {
        tracing::debug!(id, "Book not found");

        BookNotFoundError { verbosity }
    }
}
