//! HTTP surface of the toy store: JSON endpoints, bearer-token authentication,
//! role-based authorization and the SSE event stream.

use axum::http::header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use domain::access_token::AccessTokenIssuer;
use domain::credit_card::CreditCardProcessor;
use events::EventPublisher;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::{ApiVersion, Config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
mod event_source;
mod extractors;
mod middleware;
mod params;
mod protect;
mod response;
mod router;

pub use error::{Error, ErrorResponse, Result};

/// Everything a request handler can reach. Cheap to clone; shared parts are behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub service_state: service::AppState,
    pub event_publisher: Arc<EventPublisher>,
    pub sse_manager: Arc<sse::Manager>,
    pub access_token_issuer: AccessTokenIssuer,
    pub credit_card_processor: Arc<dyn CreditCardProcessor>,
}

impl AppState {
    pub fn new(
        service_state: service::AppState,
        event_publisher: Arc<EventPublisher>,
        sse_manager: Arc<sse::Manager>,
        access_token_issuer: AccessTokenIssuer,
        credit_card_processor: Arc<dyn CreditCardProcessor>,
    ) -> Self {
        Self {
            service_state,
            event_publisher,
            sse_manager,
            access_token_issuer,
            credit_card_processor,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }
}

/// The complete application: every route plus the CORS layer.
pub fn app(app_state: AppState) -> Router {
    let cors = cors_layer(app_state.config());
    router::define_routes(app_state).layer(cors)
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let config = app_state.config();
    let server_url = format!("{}:{}", config.interface, config.port);
    info!(
        "Starting toy store server on {server_url} (API version {})",
        config.api_version()
    );

    let listener = TcpListener::bind(&server_url).await?;
    axum::serve(listener, app(app_state)).await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin}: {e}");
                None
            }
        })
        .collect();
    debug!("CORS allowed origins: {allowed_origins:?}");

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            ACCEPT,
            ACCEPT_LANGUAGE,
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(ApiVersion::field_name()),
        ])
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use domain::access_token::{AccessTokenKeys, AccessTokenScope};
    use domain::credit_card::MockCreditCardProcessor;
    use domain::{accounts, Id};
    use entity_api::{schema::in_memory_database, seed_database};
    use sse::SseDomainEventHandler;

    pub(crate) const DECLINED_CARD: &str = "4000000000000002";
    pub(crate) const APPROVED_CARD: &str = "4242424242424242";

    /// A seeded in-memory store wired the same way the binary wires it.
    pub(crate) async fn app_state() -> AppState {
        let db = Arc::new(in_memory_database().await.unwrap());
        seed_database(&db).await.unwrap();

        let config = Config::default();
        let sse_manager = Arc::new(sse::Manager::new());
        let event_publisher = EventPublisher::new()
            .with_handler(Arc::new(SseDomainEventHandler::new(sse_manager.clone())));
        let access_token_issuer = AccessTokenIssuer::new(
            AccessTokenKeys::generate().unwrap(),
            chrono::Duration::hours(1),
            chrono::Duration::seconds(60),
        );

        AppState::new(
            service::AppState::new(config, &db),
            Arc::new(event_publisher),
            sse_manager,
            access_token_issuer,
            Arc::new(MockCreditCardProcessor::new([DECLINED_CARD])),
        )
    }

    pub(crate) async fn account(app_state: &AppState, email_address: &str) -> accounts::Model {
        entity_api::account::find_by_email_address(app_state.db_conn_ref(), email_address)
            .await
            .unwrap()
            .unwrap()
    }

    pub(crate) fn token_for(app_state: &AppState, account_id: Id, scopes: &[AccessTokenScope]) -> String {
        app_state
            .access_token_issuer
            .issue(account_id, scopes, chrono::Duration::hours(1))
            .unwrap()
            .token
    }

    pub(crate) async fn api_token(app_state: &AppState, email_address: &str) -> String {
        let account = account(app_state, email_address).await;
        token_for(app_state, account.id, &[AccessTokenScope::Api])
    }
}
