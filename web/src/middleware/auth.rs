use crate::extractors::authenticated_account::AuthenticatedAccount;
use crate::{AppState, Error, ErrorResponse};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::access_token::AccessTokenScope;
use domain::account as AccountApi;

/// The token in an `Authorization: Bearer <token>` header, if there is one.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authentication middleware that returns 401 Unauthorized unless the request carries
/// an `api`-scoped access token for an existing account. On success the account is
/// made available to handlers through the [`AuthenticatedAccount`] extractor.
pub(crate) async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ErrorResponse::unauthorized()
            .with_general_error("An access token is required")
            .into_response();
    };

    match AccountApi::find_by_access_token(
        app_state.db_conn_ref(),
        &app_state.access_token_issuer,
        token,
        AccessTokenScope::Api,
    )
    .await
    {
        Ok((account, _)) => {
            request.extensions_mut().insert(AuthenticatedAccount(account));
            next.run(request).await
        }
        Err(e) => Error::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use domain::Id;
    use tower::ServiceExt;

    async fn whoami(AuthenticatedAccount(account): AuthenticatedAccount) -> String {
        account.email_address
    }

    fn router(app_state: AppState) -> Router {
        Router::new()
            .route("/test", get(whoami))
            .route_layer(from_fn_with_state(app_state.clone(), require_auth))
            .with_state(app_state)
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_token_accepts_any_scheme_case() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn require_auth_returns_401_without_a_token() {
        let app_state = test_support::app_state().await;

        let response = router(app_state).oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_returns_401_for_a_garbage_token() {
        let app_state = test_support::app_state().await;

        let response = router(app_state)
            .oneshot(request(Some("Bearer not-a-token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_returns_401_for_an_sse_only_token() {
        let app_state = test_support::app_state().await;
        let account = test_support::account(&app_state, "customer@soklet.com").await;
        let token = test_support::token_for(&app_state, account.id, &[AccessTokenScope::Sse]);

        let response = router(app_state)
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_returns_401_for_an_unknown_account() {
        let app_state = test_support::app_state().await;
        let token = test_support::token_for(&app_state, Id::new_v4(), &[AccessTokenScope::Api]);

        let response = router(app_state)
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_lets_valid_tokens_through() {
        let app_state = test_support::app_state().await;
        let token = test_support::api_token(&app_state, "customer@soklet.com").await;

        let response = router(app_state)
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
