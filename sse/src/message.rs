use chrono::{DateTime, Utc};
use domain::locale::format_timestamp;
use domain::money::Money;
use domain::{purchases, toys, Currency, Id, Locale};
use serde::Serialize;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    // Catalog changes (broadcast)
    #[serde(rename = "toy_created")]
    ToyCreated { toy: LocalizedToy },
    #[serde(rename = "toy_updated")]
    ToyUpdated { toy: LocalizedToy },
    #[serde(rename = "toy_deleted")]
    ToyDeleted { toy: LocalizedToy },
    #[serde(rename = "toy_purchased")]
    ToyPurchased { toy: LocalizedToy },

    // Sent only to the buyer's own connections
    #[serde(rename = "purchase_completed")]
    PurchaseCompleted { purchase: LocalizedPurchase },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::ToyCreated { .. } => "toy_created",
            Event::ToyUpdated { .. } => "toy_updated",
            Event::ToyDeleted { .. } => "toy_deleted",
            Event::ToyPurchased { .. } => "toy_purchased",
            Event::PurchaseCompleted { .. } => "purchase_completed",
        }
    }
}

/// A toy as seen by a subscriber in a particular locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedToy {
    pub toy_id: Id,
    pub name: String,
    /// Plain decimal amount, e.g. `12.50`
    pub price: String,
    pub currency: Currency,
    /// Locale-formatted amount, e.g. `R$ 12,50`
    pub price_description: String,
}

impl LocalizedToy {
    pub fn new(toy: &toys::Model, locale: Locale) -> Self {
        let price = Money::new(toy.price_minor_units, toy.currency);
        Self {
            toy_id: toy.id,
            name: toy.name.clone(),
            price: price.to_decimal_string(),
            currency: toy.currency,
            price_description: price.format(locale),
        }
    }
}

/// A purchase as seen by its buyer, with amounts and timestamps in their locale and time zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedPurchase {
    pub purchase_id: Id,
    pub toy_id: Id,
    pub toy_name: String,
    pub price: String,
    pub currency: Currency,
    pub price_description: String,
    pub credit_card_transaction_id: String,
    pub created_at: DateTime<Utc>,
    pub created_at_description: String,
}

impl LocalizedPurchase {
    pub fn new(
        purchase: &purchases::Model,
        toy: &toys::Model,
        locale: Locale,
        time_zone: &str,
    ) -> Self {
        let price = Money::new(purchase.price_minor_units, purchase.currency);
        let created_at = purchase.created_at.with_timezone(&Utc);
        Self {
            purchase_id: purchase.id,
            toy_id: toy.id,
            toy_name: toy.name.clone(),
            price: price.to_decimal_string(),
            currency: purchase.currency,
            price_description: price.format(locale),
            credit_card_transaction_id: purchase.credit_card_transaction_id.clone(),
            created_at,
            created_at_description: format_timestamp(created_at, locale, time_zone),
        }
    }
}

/// Which connections a message goes to.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageScope {
    /// Every connection opened by one account
    Account { account_id: Id },
    /// Every open connection
    Broadcast,
}

/// The formatting context shared by a group of connections. A message is rendered
/// once per audience rather than once per connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Audience {
    pub locale: Locale,
    /// IANA time zone name of the connection's account
    pub time_zone: String,
}
