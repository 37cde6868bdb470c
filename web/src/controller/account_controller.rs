use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_account::AuthenticatedAccount, compare_api_version::CompareApiVersion,
    request_data::JsonBody,
};
use crate::params::account::AuthenticateParams;
use crate::response::account::{AccessTokenResponse, AccountResponse, AuthenticateResponse};
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::account as AccountApi;
use service::config::ApiVersion;

use log::*;

/// POST exchange an email address and password for an access token
#[utoipa::path(
    post,
    path = "/accounts/authenticate",
    params(ApiVersion),
    request_body = AuthenticateParams,
    responses(
        (status = 200, description = "Successfully authenticated", body = AuthenticateResponse),
        (status = 401, description = "Invalid email address or password", body = crate::ErrorResponse),
        (status = 422, description = "Malformed email address", body = crate::ErrorResponse)
    )
)]
pub async fn authenticate(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    JsonBody(params): JsonBody<AuthenticateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Authenticate {}", params.email_address);

    let (account, access_token) = AccountApi::authenticate(
        app_state.db_conn_ref(),
        &app_state.access_token_issuer,
        params.into(),
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        AuthenticateResponse {
            account: account.into(),
            access_token: access_token.into(),
        },
    )))
}

/// GET the account the access token was issued to
#[utoipa::path(
    get,
    path = "/accounts/me",
    params(ApiVersion),
    responses(
        (status = 200, description = "The authenticated account", body = AccountResponse),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        AccountResponse::from(account),
    )))
}

/// POST issue a short-lived token that can only open the SSE stream
#[utoipa::path(
    post,
    path = "/accounts/sse_access_token",
    params(ApiVersion),
    responses(
        (status = 200, description = "A token scoped to the SSE stream", body = AccessTokenResponse),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sse_access_token(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedAccount(account): AuthenticatedAccount,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST SSE access token for account {}", account.id);

    let access_token = AccountApi::issue_sse_token(&app_state.access_token_issuer, &account)?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        AccessTokenResponse::from(access_token),
    )))
}
