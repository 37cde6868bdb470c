use super::RejectionType;
use crate::{AppState, ErrorResponse};
use axum::{extract::FromRequestParts, http::request::Parts};
use log::*;
use semver::Version;
use service::config::ApiVersion;

/// The API version the request was made against. Clients may omit the `x-version`
/// header; when they send it, it has to match the version this server exposes.
pub(crate) struct CompareApiVersion(pub Version);

impl FromRequestParts<AppState> for CompareApiVersion {
    type Rejection = RejectionType;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let server_version = Version::parse(state.config().api_version()).map_err(|e| {
            error!("Configured API version is not a semantic version: {e}");
            ErrorResponse::bad_request("Server API version is misconfigured")
        })?;

        let Some(header) = parts.headers.get(ApiVersion::field_name()) else {
            return Ok(CompareApiVersion(server_version));
        };

        let requested = header
            .to_str()
            .ok()
            .and_then(|value| Version::parse(value.trim()).ok())
            .ok_or_else(|| {
                ErrorResponse::bad_request(format!(
                    "{} must be a semantic version",
                    ApiVersion::field_name()
                ))
            })?;

        if requested != server_version {
            debug!("Rejecting request for API version {requested}, serving {server_version}");
            return Err(ErrorResponse::bad_request(format!(
                "API version {requested} is not supported; use {server_version}"
            )));
        }

        Ok(CompareApiVersion(requested))
    }
}
