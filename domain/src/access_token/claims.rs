//! Claims carried in the payload segment of an access token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenScope {
    /// Call the JSON API.
    Api,
    /// Open the Server-Sent Event stream.
    Sse,
}

impl fmt::Display for AccessTokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessTokenScope::Api => write!(f, "api"),
            AccessTokenScope::Sse => write!(f, "sse"),
        }
    }
}

/// Registered claims (`iss`, `sub`, `iat`, `exp`) plus the scopes the token grants.
/// `sub` is the account id; timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AccessTokenClaims {
    pub(crate) iss: String,
    pub(crate) sub: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) scopes: Vec<AccessTokenScope>,
}

/// Claims as read from a token whose signature checked out. Every registered
/// claim is optional here so a missing one is reported after the issuer check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SignedClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) exp: Option<i64>,
    #[serde(default)]
    pub(crate) scopes: Vec<AccessTokenScope>,
}
