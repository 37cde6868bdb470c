use crate::{
    controller::{
        account_controller, health_check_controller, purchase_controller, toy_controller,
    },
    event_source::handler as event_source_handler,
    middleware::auth::require_auth,
    params, protect, response, AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

// The OpenAPI document served at /api-docs/openapi.json. A path or schema
// only appears there if it is listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Toy Store API"
        ),
        paths(
            health_check_controller::health_check,
            account_controller::authenticate,
            account_controller::me,
            account_controller::sse_access_token,
            toy_controller::index,
            toy_controller::read,
            toy_controller::create,
            toy_controller::update,
            toy_controller::delete,
            toy_controller::purchase,
            purchase_controller::index,
            purchase_controller::read,
            event_source_handler::event_source,
        ),
        components(
            schemas(
                domain::Currency,
                domain::Locale,
                domain::Role,
                crate::ErrorResponse,
                params::account::AuthenticateParams,
                params::toy::CreateParams,
                params::toy::UpdateParams,
                params::toy::PurchaseParams,
                response::account::AccountResponse,
                response::account::AccessTokenResponse,
                response::account::AuthenticateResponse,
                response::toy::ToyResponse,
                response::purchase::PurchaseResponse,
                response::purchase::ToyPurchaseResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "toystore", description = "Toy catalog, purchases and live catalog updates")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the bearer access token requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token returned from POST /accounts/authenticate",
                        ))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(api_doc_routes())
        .merge(account_routes(app_state.clone()))
        .merge(account_protected_routes(app_state.clone()))
        .merge(event_source_routes(app_state.clone()))
        .merge(toy_routes(app_state.clone()))
        .merge(purchase_routes(app_state))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn api_doc_routes() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn account_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/accounts/authenticate",
            post(account_controller::authenticate),
        )
        .with_state(app_state)
}

fn account_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/accounts/me", get(account_controller::me))
        .route(
            "/accounts/sse_access_token",
            post(account_controller::sse_access_token),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

// Authenticated by an sse-scoped token, which may come in the query string
fn event_source_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/toys/event_source",
            get(event_source_handler::event_source),
        )
        .with_state(app_state)
}

fn toy_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/toys", get(toy_controller::index))
        .route("/toys/{id}", get(toy_controller::read))
        .route("/toys/{id}/purchase", post(toy_controller::purchase))
        .merge(
            // POST /toys, PUT /toys/{id}
            Router::new()
                .route("/toys", post(toy_controller::create))
                .route("/toys/{id}", put(toy_controller::update))
                .route_layer(from_fn_with_state(app_state.clone(), protect::toys::edit)),
        )
        .merge(
            // DELETE /toys/{id}
            Router::new()
                .route("/toys/{id}", delete(toy_controller::delete))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::toys::delete,
                )),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn purchase_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/purchases", get(purchase_controller::index))
        .merge(
            // GET /purchases/{id}
            Router::new()
                .route("/purchases/{id}", get(purchase_controller::read))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::purchases::read,
                )),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}
