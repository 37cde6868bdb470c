use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_account::AuthenticatedAccount, compare_api_version::CompareApiVersion,
    request_data::{JsonBody, PathParam, QueryParams},
    request_locale::RequestLocale,
};
use crate::params::toy::{CreateParams, IndexParams, PurchaseParams, UpdateParams};
use crate::response::purchase::{PurchaseResponse, ToyPurchaseResponse};
use crate::response::toy::ToyResponse;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::toy as ToyApi;
use domain::Id;
use service::config::ApiVersion;

use log::*;

/// GET search the catalog by name
#[utoipa::path(
    get,
    path = "/toys",
    params(ApiVersion, IndexParams),
    responses(
        (status = 200, description = "Toys whose name contains the query, by name", body = [ToyResponse]),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    RequestLocale(locale): RequestLocale,
    State(app_state): State<AppState>,
    QueryParams(params): QueryParams<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Toys matching {:?}", params.query);

    let toys = ToyApi::search(app_state.db_conn_ref(), params.query.as_deref()).await?;
    let toys: Vec<ToyResponse> = toys
        .into_iter()
        .map(|toy| ToyResponse::new(toy, locale))
        .collect();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), toys)))
}

/// GET a particular Toy specified by its id.
#[utoipa::path(
    get,
    path = "/toys/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Toy id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Toy by its id", body = ToyResponse),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse),
        (status = 404, description = "Toy not found", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    RequestLocale(locale): RequestLocale,
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Toy by id: {id}");

    let toy = ToyApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        ToyResponse::new(toy, locale),
    )))
}

/// POST add a Toy to the catalog
#[utoipa::path(
    post,
    path = "/toys",
    params(ApiVersion),
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully created a new Toy", body = ToyResponse),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse),
        (status = 403, description = "Only employees and administrators may edit the catalog", body = crate::ErrorResponse),
        (status = 422, description = "Unprocessable Entity", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    RequestLocale(locale): RequestLocale,
    State(app_state): State<AppState>,
    JsonBody(params): JsonBody<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Toy from: {params:?}");

    let toy = ToyApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        params.into(),
    )
    .await?;

    debug!("New Toy: {toy:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED.into(),
            ToyResponse::new(toy, locale),
        )),
    ))
}

/// PUT change some of a Toy's fields
#[utoipa::path(
    put,
    path = "/toys/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Id of the Toy to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the Toy", body = ToyResponse),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse),
        (status = 403, description = "Only employees and administrators may edit the catalog", body = crate::ErrorResponse),
        (status = 404, description = "Toy not found", body = crate::ErrorResponse),
        (status = 422, description = "Unprocessable Entity", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    RequestLocale(locale): RequestLocale,
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Id>,
    JsonBody(params): JsonBody<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Toy {id} with: {params:?}");

    let toy = ToyApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
        params.into(),
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        ToyResponse::new(toy, locale),
    )))
}

/// DELETE remove a Toy that has never been purchased
#[utoipa::path(
    delete,
    path = "/toys/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Id of the Toy to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted the Toy"),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse),
        (status = 403, description = "Only administrators may delete toys", body = crate::ErrorResponse),
        (status = 404, description = "Toy not found", body = crate::ErrorResponse),
        (status = 422, description = "The Toy has purchases", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Toy by id: {id}");

    ToyApi::delete(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST buy a Toy with a credit card
#[utoipa::path(
    post,
    path = "/toys/{id}/purchase",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Id of the Toy to buy")
    ),
    request_body = PurchaseParams,
    responses(
        (status = 201, description = "The card was charged and the purchase recorded", body = ToyPurchaseResponse),
        (status = 401, description = "Unauthorized", body = crate::ErrorResponse),
        (status = 404, description = "Toy not found", body = crate::ErrorResponse),
        (status = 422, description = "Invalid or declined credit card", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn purchase(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedAccount(account): AuthenticatedAccount,
    RequestLocale(locale): RequestLocale,
    State(app_state): State<AppState>,
    PathParam(id): PathParam<Id>,
    JsonBody(params): JsonBody<PurchaseParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Purchase Toy {id} by account {}", account.id);

    let (toy, purchase) = ToyApi::purchase(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        app_state.credit_card_processor.as_ref(),
        &account,
        id,
        params.into(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED.into(),
            ToyPurchaseResponse {
                toy: ToyResponse::new(toy, locale),
                purchase: PurchaseResponse::new(purchase, locale, &account.time_zone),
            },
        )),
    ))
}
