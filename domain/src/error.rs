//! Error types for the `domain` layer.
use crate::validation::ValidationErrors;
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api`, and `web` is dependent on `domain`.
/// but `web` should not be dependent, directly, on `entity_api`. Ultimately the various
/// `error_kind`s are used by `web` to return appropriate HTTP status codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Validation(ValidationErrors),
    AccessToken(AccessTokenErrorKind),
    Config,
    Other(String),
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity" layer (`entity_api` and `entity`).
/// These errors are translated from the `entity_api` layer to the `domain` layer and reduced to a subset of error kinds
/// that are relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Unauthenticated,
    Conflict,
    DbTransaction,
}

/// Reasons an access token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTokenErrorKind {
    /// Not three base64url segments, undecodable JSON, or an unexpected algorithm.
    Malformed,
    InvalidSignature,
    Expired,
    /// Wrong issuer, a missing claim, a future `iat` or a `sub` that is not an account id.
    InvalidClaims,
    /// The token is genuine but was not issued for the requested use.
    MissingScope,
    /// The token verified but its account no longer exists.
    UnknownAccount,
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The card processor refused the charge; carries the processor's reason.
    CreditCardDeclined(String),
}

impl Error {
    pub fn validation(errors: ValidationErrors) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(errors)),
        }
    }

    pub fn access_token(kind: AccessTokenErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::AccessToken(kind)),
        }
    }

    pub fn entity(kind: EntityErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(kind)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            // An update that matched no row means the row is gone
            EntityApiErrorKind::RecordNotFound | EntityApiErrorKind::RecordNotUpdated => {
                EntityErrorKind::NotFound
            }
            EntityApiErrorKind::RecordUnauthenticated => EntityErrorKind::Unauthenticated,
            EntityApiErrorKind::DuplicateRecord => EntityErrorKind::Conflict,
            EntityApiErrorKind::SystemError => EntityErrorKind::DbTransaction,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let access_token_error_kind = match err.kind() {
            JwtErrorKind::InvalidSignature => AccessTokenErrorKind::InvalidSignature,
            JwtErrorKind::ExpiredSignature => AccessTokenErrorKind::Expired,
            JwtErrorKind::InvalidIssuer
            | JwtErrorKind::MissingRequiredClaim(_)
            | JwtErrorKind::ImmatureSignature
            | JwtErrorKind::Json(_) => AccessTokenErrorKind::InvalidClaims,
            JwtErrorKind::InvalidEcdsaKey
            | JwtErrorKind::InvalidKeyFormat
            | JwtErrorKind::MissingAlgorithm => {
                return Error {
                    source: Some(Box::new(err)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                        "Access token signing failed".to_string(),
                    )),
                }
            }
            _ => AccessTokenErrorKind::Malformed,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::AccessToken(
                access_token_error_kind,
            )),
        }
    }
}
