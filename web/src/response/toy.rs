use chrono::{DateTime, FixedOffset};
use domain::money::Money;
use domain::{toys, Currency, Id, Locale};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ToyResponse {
    #[schema(value_type = String, format = Uuid)]
    pub(crate) toy_id: Id,
    pub(crate) name: String,
    /// Plain decimal amount
    #[schema(example = "12.50")]
    pub(crate) price: String,
    pub(crate) currency: Currency,
    /// Amount formatted for the requester's locale
    #[schema(example = "US$ 12,50")]
    pub(crate) price_description: String,
    pub(crate) created_at: DateTime<FixedOffset>,
    pub(crate) updated_at: DateTime<FixedOffset>,
}

impl ToyResponse {
    pub(crate) fn new(toy: toys::Model, locale: Locale) -> Self {
        let price = Money::new(toy.price_minor_units, toy.currency);
        Self {
            toy_id: toy.id,
            name: toy.name,
            price: price.to_decimal_string(),
            currency: toy.currency,
            price_description: price.format(locale),
            created_at: toy.created_at,
            updated_at: toy.updated_at,
        }
    }
}
