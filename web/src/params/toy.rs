use domain::credit_card::CreditCard;
use domain::toy::{CreateToy, UpdateToy};
use domain::Currency;
use secrecy::SecretString;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    /// Case-insensitive substring of the toy's name
    pub(crate) query: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    #[schema(example = "Yo-yo")]
    pub(crate) name: String,
    /// Decimal amount in `currency`, e.g. `12.50`
    #[schema(example = "12.50")]
    pub(crate) price: String,
    pub(crate) currency: Currency,
}

impl From<CreateParams> for CreateToy {
    fn from(params: CreateParams) -> Self {
        CreateToy {
            name: params.name,
            price: params.price,
            currency: params.currency,
        }
    }
}

/// Omitted fields are left unchanged. Sending `currency` requires `price`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) name: Option<String>,
    pub(crate) price: Option<String>,
    pub(crate) currency: Option<Currency>,
}

impl From<UpdateParams> for UpdateToy {
    fn from(params: UpdateParams) -> Self {
        UpdateToy {
            name: params.name,
            price: params.price,
            currency: params.currency,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PurchaseParams {
    #[schema(value_type = String, example = "4242 4242 4242 4242")]
    pub(crate) credit_card_number: SecretString,
    /// `YYYY-MM`
    #[schema(example = "2030-12")]
    pub(crate) credit_card_expiration: String,
}

impl From<PurchaseParams> for CreditCard {
    fn from(params: PurchaseParams) -> Self {
        CreditCard {
            number: params.credit_card_number,
            expiration: params.credit_card_expiration,
        }
    }
}
