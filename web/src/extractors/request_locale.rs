use super::authenticated_account::AuthenticatedAccount;
use super::RejectionType;
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use domain::locale::resolve_accept_language;
use domain::Locale;

/// Locale to format the response in: the signed-in account's locale, else the best
/// supported match in `Accept-Language`, else the configured default.
pub(crate) struct RequestLocale(pub Locale);

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = RejectionType;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(AuthenticatedAccount(account)) = parts.extensions.get::<AuthenticatedAccount>() {
            return Ok(RequestLocale(account.locale));
        }

        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(resolve_accept_language)
            .unwrap_or(state.config().default_locale);

        Ok(RequestLocale(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn locale_tag(RequestLocale(locale): RequestLocale) -> String {
        locale.to_string()
    }

    async fn resolve(app_state: AppState, accept_language: Option<&str>) -> String {
        let app = Router::new()
            .route("/locale", get(locale_tag))
            .with_state(app_state);
        let mut builder = Request::builder().uri("/locale");
        if let Some(value) = accept_language {
            builder = builder.header(ACCEPT_LANGUAGE, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn anonymous_requests_use_accept_language() {
        let app_state = test_support::app_state().await;

        assert_eq!(
            resolve(app_state, Some("fr-FR, de-DE;q=0.8, en-US;q=0.5")).await,
            "de-DE"
        );
    }

    #[tokio::test]
    async fn anonymous_requests_fall_back_to_the_default_locale() {
        let app_state = test_support::app_state().await;

        assert_eq!(resolve(app_state.clone(), None).await, "en-US");
        assert_eq!(resolve(app_state, Some("fr-FR")).await, "en-US");
    }
}
