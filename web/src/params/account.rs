use domain::account::Credentials;
use secrecy::SecretString;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AuthenticateParams {
    #[schema(example = "customer@soklet.com")]
    pub(crate) email_address: String,
    #[schema(value_type = String, format = Password)]
    pub(crate) password: SecretString,
}

impl From<AuthenticateParams> for Credentials {
    fn from(params: AuthenticateParams) -> Self {
        Credentials {
            email_address: params.email_address,
            password: params.password,
        }
    }
}
