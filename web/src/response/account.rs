use chrono::{DateTime, Utc};
use domain::access_token::AccessToken;
use domain::{accounts, Id, Locale, Role};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AccountResponse {
    #[schema(value_type = String, format = Uuid)]
    pub(crate) account_id: Id,
    pub(crate) role: Role,
    pub(crate) name: String,
    pub(crate) email_address: String,
    pub(crate) locale: Locale,
    /// IANA time zone name
    pub(crate) time_zone: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            account_id: account.id,
            role: account.role,
            name: account.name,
            email_address: account.email_address,
            locale: account.locale,
            time_zone: account.time_zone,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AccessTokenResponse {
    /// Send as `Authorization: Bearer <access_token>`
    pub(crate) access_token: String,
    /// What the token may be used for: `api`, `sse` or both
    pub(crate) scopes: Vec<String>,
    pub(crate) expires_at: DateTime<Utc>,
}

impl From<AccessToken> for AccessTokenResponse {
    fn from(access_token: AccessToken) -> Self {
        Self {
            access_token: access_token.token,
            scopes: access_token
                .scopes
                .iter()
                .map(ToString::to_string)
                .collect(),
            expires_at: access_token.expires_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthenticateResponse {
    pub(crate) account: AccountResponse,
    #[serde(flatten)]
    pub(crate) access_token: AccessTokenResponse,
}
