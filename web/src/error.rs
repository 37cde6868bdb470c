use std::collections::BTreeMap;
use std::error::Error as StdError;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use domain::error::{
    AccessTokenErrorKind, DomainErrorKind, EntityErrorKind, Error as DomainError,
    ExternalErrorKind, InternalErrorKind,
};
use domain::validation::ValidationErrors;

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

/// JSON body of every error response.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub summary: String,
    pub general_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, summary: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            summary: summary.into(),
            general_errors: Vec::new(),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn with_general_error(mut self, message: impl Into<String>) -> Self {
        self.general_errors.push(message.into());
        self
    }

    fn with_validation_errors(mut self, errors: ValidationErrors) -> Self {
        self.general_errors.extend(errors.general_errors);
        self.field_errors = errors.field_errors;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad request").with_general_error(message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "You are not authorized to perform this action",
        )
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

fn access_token_message(kind: AccessTokenErrorKind) -> &'static str {
    match kind {
        AccessTokenErrorKind::Malformed => "Access token is malformed",
        AccessTokenErrorKind::InvalidSignature => "Access token signature is invalid",
        AccessTokenErrorKind::Expired => "Access token has expired",
        AccessTokenErrorKind::InvalidClaims => "Access token claims are invalid",
        AccessTokenErrorKind::MissingScope => "Access token does not permit this request",
        AccessTokenErrorKind::UnknownAccount => "Access token belongs to an account that no longer exists",
    }
}

impl From<Error> for ErrorResponse {
    fn from(error: Error) -> Self {
        let DomainError { source, error_kind } = error.0;

        match error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        ErrorResponse::new(StatusCode::NOT_FOUND, "The resource was not found")
                    }
                    EntityErrorKind::Unauthenticated => ErrorResponse::unauthorized()
                        .with_general_error("Invalid email address or password"),
                    EntityErrorKind::Conflict => ErrorResponse::new(
                        StatusCode::CONFLICT,
                        "The resource conflicts with an existing one",
                    ),
                    EntityErrorKind::DbTransaction => {
                        error!("Database error (source: {source:?})");
                        ErrorResponse::internal()
                    }
                },
                InternalErrorKind::Validation(errors) => {
                    ErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY, "Please fix the errors below")
                        .with_validation_errors(errors)
                }
                InternalErrorKind::AccessToken(kind) => {
                    debug!("Rejected access token: {kind:?}");
                    ErrorResponse::unauthorized().with_general_error(access_token_message(kind))
                }
                InternalErrorKind::Config | InternalErrorKind::Other(_) => {
                    error!("Internal error: {internal_error_kind:?} (source: {source:?})");
                    ErrorResponse::internal()
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::CreditCardDeclined(reason) => ErrorResponse::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Your purchase could not be completed",
                )
                .with_general_error(reason),
            },
        }
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        debug!("Rejected JSON body: {message}");

        match (&rejection, json_field_error(&message)) {
            (JsonRejection::JsonDataError(_), Some((field, field_message))) => {
                let mut errors = ValidationErrors::new();
                errors.add_field(&field, field_message);
                ErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY, "Please fix the errors below")
                    .with_validation_errors(errors)
            }
            _ => ErrorResponse::new(rejection.status(), "The request body could not be read")
                .with_general_error(message),
        }
    }
}

impl From<PathRejection> for ErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path: {}", rejection.body_text());
        ErrorResponse::new(rejection.status(), "The URL is not valid")
            .with_general_error(rejection.body_text())
    }
}

impl From<QueryRejection> for ErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        debug!("Rejected query string: {}", rejection.body_text());
        ErrorResponse::new(rejection.status(), "The query string is not valid")
            .with_general_error(rejection.body_text())
    }
}

// serde reports a missing field as "missing field `name`" and any other problem
// as "<field>: <message>", each followed by " at line L column C".
fn json_field_error(body_text: &str) -> Option<(String, String)> {
    let detail = body_text
        .split_once("target type: ")
        .map_or(body_text, |(_, detail)| detail);
    let detail = detail.split(" at line ").next().unwrap_or(detail);

    if let Some(rest) = detail.strip_prefix("missing field `") {
        let field = rest.split('`').next().filter(|field| !field.is_empty())?;
        return Some((field.to_string(), "This field is required".to_string()));
    }

    let (field, message) = detail.split_once(": ")?;
    (!field.is_empty() && !field.contains(' ')).then(|| (field.to_string(), message.to_string()))
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
