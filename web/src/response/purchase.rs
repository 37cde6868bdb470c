use super::toy::ToyResponse;
use chrono::{DateTime, FixedOffset, Utc};
use domain::locale::format_timestamp;
use domain::money::Money;
use domain::{purchases, Currency, Id, Locale};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PurchaseResponse {
    #[schema(value_type = String, format = Uuid)]
    pub(crate) purchase_id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub(crate) account_id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub(crate) toy_id: Id,
    /// Amount charged, as a plain decimal
    pub(crate) price: String,
    pub(crate) currency: Currency,
    pub(crate) price_description: String,
    pub(crate) credit_card_transaction_id: String,
    pub(crate) created_at: DateTime<FixedOffset>,
    /// `created_at` in the requester's time zone and locale
    pub(crate) created_at_description: String,
}

impl PurchaseResponse {
    pub(crate) fn new(purchase: purchases::Model, locale: Locale, time_zone: &str) -> Self {
        let price = Money::new(purchase.price_minor_units, purchase.currency);
        Self {
            purchase_id: purchase.id,
            account_id: purchase.account_id,
            toy_id: purchase.toy_id,
            price: price.to_decimal_string(),
            currency: purchase.currency,
            price_description: price.format(locale),
            credit_card_transaction_id: purchase.credit_card_transaction_id,
            created_at: purchase.created_at,
            created_at_description: format_timestamp(
                purchase.created_at.with_timezone(&Utc),
                locale,
                time_zone,
            ),
        }
    }
}

/// Result of buying a toy.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ToyPurchaseResponse {
    pub(crate) toy: ToyResponse,
    pub(crate) purchase: PurchaseResponse,
}
