use super::RejectionType;
use crate::ErrorResponse;
use axum::{extract::FromRequestParts, http::request::Parts};
use domain::accounts::Model;

/// The account that presented a valid `api`-scoped access token. Inserted into the
/// request extensions by the `require_auth` middleware; routes without that
/// middleware reject with 401.
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedAccount(pub Model);

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or_else(ErrorResponse::unauthorized)
    }
}
