use crate::access_token::{AccessToken, AccessTokenIssuer, AccessTokenScope, VerifiedAccessToken};
use crate::error::{AccessTokenErrorKind, EntityErrorKind, Error};
use crate::validation::ValidationErrors;
use crate::{accounts, Id};
use entity_api::account as account_api;
use email_address::EmailAddress;
use entity_api::error::EntityApiErrorKind;
use log::*;
use sea_orm::DatabaseConnection;
use secrecy::{ExposeSecret, SecretString};
use std::sync::LazyLock;

/// Verified against when no account matches the email address, so a lookup miss
/// costs the same as a wrong password.
static UNKNOWN_ACCOUNT_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| account_api::generate_hash("not-a-real-password".to_string()));

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<accounts::Model, Error> {
    Ok(account_api::find_by_id(db, id).await?)
}

#[derive(Debug)]
pub struct Credentials {
    pub email_address: String,
    pub password: SecretString,
}

/// Signs an account in. A syntactically invalid email address is a validation
/// error; unknown email addresses and wrong passwords both fail as
/// `Unauthenticated`. On success returns the account with a token scoped for both
/// the API and the SSE stream.
pub async fn authenticate(
    db: &DatabaseConnection,
    access_token_issuer: &AccessTokenIssuer,
    credentials: Credentials,
) -> Result<(accounts::Model, AccessToken), Error> {
    let email_address = credentials.email_address.trim().to_lowercase();
    let password = credentials.password.expose_secret();

    if !EmailAddress::is_valid(&email_address) {
        let mut errors = ValidationErrors::new();
        errors.add_field("email_address", "Please enter a valid email address");
        return Err(Error::validation(errors));
    }

    let Some(account) = account_api::find_by_email_address(db, &email_address).await? else {
        // Result is ignored; we only want the hashing cost
        let _ = account_api::verify_password(password, &UNKNOWN_ACCOUNT_PASSWORD_HASH);
        info!("Authentication failed for unknown email address {email_address}");
        return Err(Error::entity(EntityErrorKind::Unauthenticated));
    };

    if account_api::verify_password(password, &account.password).is_err() {
        info!("Authentication failed for account {}", account.id);
        return Err(Error::entity(EntityErrorKind::Unauthenticated));
    }

    let access_token = access_token_issuer.issue(
        account.id,
        &[AccessTokenScope::Api, AccessTokenScope::Sse],
        access_token_issuer.access_token_lifetime(),
    )?;

    info!("Account {} authenticated", account.id);
    Ok((account, access_token))
}

/// Short-lived token that may only open the SSE stream. Meant to be put in a query
/// string, where it is more likely to end up in logs than a header would be.
pub fn issue_sse_token(
    access_token_issuer: &AccessTokenIssuer,
    account: &accounts::Model,
) -> Result<AccessToken, Error> {
    access_token_issuer.issue(
        account.id,
        &[AccessTokenScope::Sse],
        access_token_issuer.sse_access_token_lifetime(),
    )
}

/// Verifies `token` for `required_scope` and loads the account it was issued to.
/// A token for an account that no longer exists is rejected as `UnknownAccount`.
pub async fn find_by_access_token(
    db: &DatabaseConnection,
    access_token_issuer: &AccessTokenIssuer,
    token: &str,
    required_scope: AccessTokenScope,
) -> Result<(accounts::Model, VerifiedAccessToken), Error> {
    let verified = access_token_issuer.verify(token, required_scope)?;

    let account = match account_api::find_by_id(db, verified.account_id).await {
        Ok(account) => account,
        Err(e) if e.error_kind == EntityApiErrorKind::RecordNotFound => {
            warn!(
                "Access token refers to missing account {}",
                verified.account_id
            );
            return Err(Error::access_token(AccessTokenErrorKind::UnknownAccount));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((account, verified))
}
