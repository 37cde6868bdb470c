use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_account::AuthenticatedAccount, compare_api_version::CompareApiVersion,
    request_data::{PathParam, QueryParams},
};
use crate::params::purchase::IndexParams;
use crate::response::purchase::PurchaseResponse;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::purchase as PurchaseApi;
use domain::Id;
use service::config::ApiVersion;

use log::*;

/// GET the authenticated account's purchases, oldest first
#[utoipa::path(
    get,
    path = "/purchases",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "The caller's purchases", body = [PurchaseResponse]),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedAccount(account): AuthenticatedAccount,
    State(app_state): State<AppState>,
    QueryParams(params): QueryParams<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Purchases for account {} with {params:?}", account.id);

    let purchases =
        PurchaseApi::find_by(app_state.db_conn_ref(), params.for_account(account.id)).await?;
    let purchases: Vec<PurchaseResponse> = purchases
        .into_iter()
        .map(|purchase| PurchaseResponse::new(purchase, account.locale, &account.time_zone))
        .collect();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), purchases)))
}

/// GET a particular Purchase specified by its id.
#[utoipa::path(
    get,
    path = "/purchases/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Purchase id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Purchase", body = PurchaseResponse),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse),
        (status = 403, description = "The Purchase belongs to another account", body = crate::ErrorResponse),
        (status = 404, description = "Purchase not found", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedAccount(account): AuthenticatedAccount,
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Purchase by id: {id}");

    let purchase = PurchaseApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        PurchaseResponse::new(purchase, account.locale, &account.time_zone),
    )))
}
