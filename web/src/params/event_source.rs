use serde::Deserialize;
use utoipa::IntoParams;

/// Query string of the SSE endpoint. Browsers' `EventSource` cannot set headers, so
/// the token may travel here instead of in `Authorization`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct EventSourceParams {
    /// An `sse`-scoped access token
    pub(crate) access_token: Option<String>,
    /// BCP 47 tag to format payloads in; defaults to the account's locale
    #[param(example = "pt-BR")]
    pub(crate) locale: Option<String>,
}
