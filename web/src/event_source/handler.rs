use crate::extractors::request_data::QueryParams;
use crate::middleware::auth::bearer_token;
use crate::params::event_source::EventSourceParams;
use crate::{AppState, Error, ErrorResponse};
use async_stream::stream;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use domain::access_token::AccessTokenScope;
use domain::account as AccountApi;
use domain::Locale;
use futures::Stream;
use log::*;
use sse::connection::ConnectionId;
use sse::message::Audience;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Unregisters the connection when the response stream is dropped, which is how
/// axum reports a client that went away.
struct ConnectionGuard {
    manager: Arc<sse::Manager>,
    connection_id: ConnectionId,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!("SSE connection {} closed", self.connection_id.as_str());
        self.manager.unregister_connection(&self.connection_id);
    }
}

/// GET open the catalog event stream
#[utoipa::path(
    get,
    path = "/toys/event_source",
    params(EventSourceParams),
    responses(
        (status = 200, description = "A text/event-stream of toy_created, toy_updated, toy_deleted, toy_purchased and purchase_completed events", content_type = "text/event-stream", body = String),
        (status = 400, description = "Unsupported locale", body = crate::ErrorResponse),
        (status = 401, description = "Missing or invalid sse-scoped access token", body = crate::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub(crate) async fn event_source(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    QueryParams(params): QueryParams<EventSourceParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ErrorResponse> {
    let Some(token) = params.access_token.as_deref().or_else(|| bearer_token(&headers)) else {
        return Err(ErrorResponse::unauthorized().with_general_error("An access token is required"));
    };

    let (account, _) = AccountApi::find_by_access_token(
        app_state.db_conn_ref(),
        &app_state.access_token_issuer,
        token,
        AccessTokenScope::Sse,
    )
    .await
    .map_err(|e| ErrorResponse::from(Error::from(e)))?;

    let locale = match params.locale.as_deref() {
        Some(tag) => tag
            .parse::<Locale>()
            .map_err(|_| ErrorResponse::bad_request(format!("Unsupported locale {tag}")))?,
        None => account.locale,
    };

    debug!("Establishing SSE connection for account {} ({locale})", account.id);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let audience = Audience {
        locale,
        time_zone: account.time_zone.clone(),
    };
    let connection_id = app_state
        .sse_manager
        .register_connection(account.id, audience, tx);

    let guard = ConnectionGuard {
        manager: app_state.sse_manager.clone(),
        connection_id,
    };

    let stream = stream! {
        let _guard = guard;
        while let Some(event) = rx.recv().await {
            yield event;
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
