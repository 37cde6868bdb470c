//! Catalog management and purchasing.
//!
//! Every successful change publishes a [`DomainEvent`] after it has been stored so
//! subscribers (the SSE stream) can fan it out.

use crate::credit_card::{CreditCard, CreditCardProcessor};
use crate::error::Error;
use crate::money::Money;
use crate::validation::ValidationErrors;
use crate::{accounts, purchases, toys, Id, UpdateMap};
use chrono::Utc;
use entity::currency::Currency;
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use entity_api::{purchase as purchase_api, toy as toy_api};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::{ActiveEnum, DatabaseConnection, Value};

const MAX_NAME_LENGTH: usize = 255;

/// A new catalog entry. `price` is decimal text in `currency`'s units, e.g. `12.50`.
#[derive(Debug, Clone)]
pub struct CreateToy {
    pub name: String,
    pub price: String,
    pub currency: Currency,
}

/// Fields to change on an existing toy; `None` leaves a field as it is.
/// Changing the currency requires a price in the new currency.
#[derive(Debug, Clone, Default)]
pub struct UpdateToy {
    pub name: Option<String>,
    pub price: Option<String>,
    pub currency: Option<Currency>,
}

pub async fn search(db: &DatabaseConnection, query: Option<&str>) -> Result<Vec<toys::Model>, Error> {
    Ok(toy_api::search(db, query).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<toys::Model, Error> {
    Ok(toy_api::find_by_id(db, id).await?)
}

pub async fn create(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    create_toy: CreateToy,
) -> Result<toys::Model, Error> {
    let mut errors = ValidationErrors::new();

    let name = validate_name(&create_toy.name, &mut errors);
    let price = validate_price(&create_toy.price, create_toy.currency, &mut errors);
    if let Some(name) = &name {
        ensure_name_available(db, name, None, &mut errors).await?;
    }
    errors.into_result()?;

    let (Some(name), Some(price)) = (name, price) else {
        return Err(Error::validation(ValidationErrors::general(
            "Toy could not be validated",
        )));
    };

    let now = Utc::now();
    let toy = toy_api::create(
        db,
        toys::Model {
            id: Id::new_v4(),
            name_key: toys::name_key(&name),
            name: name.clone(),
            price_minor_units: price.minor_units,
            currency: price.currency,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await
    .map_err(|e| name_taken_or(e, &name))?;

    info!("Created toy {} ({})", toy.id, toy.name);
    event_publisher
        .publish(DomainEvent::ToyCreated { toy: toy.clone() })
        .await;

    Ok(toy)
}

pub async fn update(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    id: Id,
    update_toy: UpdateToy,
) -> Result<toys::Model, Error> {
    let existing_toy = find_by_id(db, id).await?;
    let mut errors = ValidationErrors::new();
    let mut update_map = UpdateMap::new();
    let mut new_name = None;

    if let Some(name) = update_toy.name.as_deref() {
        if let Some(name) = validate_name(name, &mut errors) {
            ensure_name_available(db, &name, Some(id), &mut errors).await?;
            update_map.insert("name".to_string(), Some(Value::from(name.clone())));
            new_name = Some(name);
        }
    }

    match (update_toy.price.as_deref(), update_toy.currency) {
        (Some(price), currency) => {
            let currency = currency.unwrap_or(existing_toy.currency);
            if let Some(price) = validate_price(price, currency, &mut errors) {
                update_map.insert(
                    "price_minor_units".to_string(),
                    Some(Value::from(price.minor_units)),
                );
                update_map.insert(
                    "currency".to_string(),
                    Some(Value::from(price.currency.to_value())),
                );
            }
        }
        (None, Some(currency)) if currency != existing_toy.currency => {
            errors.add_field("price", "Price is required when changing currency");
        }
        (None, _) => {}
    }

    errors.into_result()?;

    if update_map.is_empty() {
        debug!("Nothing to update on toy {id}");
        return Ok(existing_toy);
    }

    let toy = toy_api::update(db, id, update_map)
        .await
        .map_err(|e| match &new_name {
            Some(name) => name_taken_or(e, name),
            None => e.into(),
        })?;

    info!("Updated toy {} ({})", toy.id, toy.name);
    event_publisher
        .publish(DomainEvent::ToyUpdated { toy: toy.clone() })
        .await;

    Ok(toy)
}

/// Removes a toy from the catalog. Toys that have been purchased are kept so
/// purchase history stays intact.
pub async fn delete(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    id: Id,
) -> Result<toys::Model, Error> {
    let toy = find_by_id(db, id).await?;

    if purchase_api::count_by_toy_id(db, id).await? > 0 {
        return Err(Error::validation(ValidationErrors::general(format!(
            "'{}' has already been purchased and cannot be deleted",
            toy.name
        ))));
    }

    let toy = toy_api::delete_by_id(db, id).await?;

    info!("Deleted toy {} ({})", toy.id, toy.name);
    event_publisher
        .publish(DomainEvent::ToyDeleted { toy: toy.clone() })
        .await;

    Ok(toy)
}

/// Charges `credit_card` for the toy's current price and records the purchase.
/// Nothing is recorded when the card is invalid or the charge is declined.
pub async fn purchase(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    credit_card_processor: &dyn CreditCardProcessor,
    account: &accounts::Model,
    toy_id: Id,
    credit_card: CreditCard,
) -> Result<(toys::Model, purchases::Model), Error> {
    let toy = find_by_id(db, toy_id).await?;
    let credit_card = credit_card.validate(Utc::now().date_naive())?;
    let price = Money::new(toy.price_minor_units, toy.currency);

    let transaction = credit_card_processor.charge(&credit_card, price).await?;

    let purchase = purchase_api::create(
        db,
        purchases::Model {
            id: Id::new_v4(),
            account_id: account.id,
            toy_id: toy.id,
            price_minor_units: price.minor_units,
            currency: price.currency,
            credit_card_transaction_id: transaction.transaction_id,
            created_at: Utc::now().into(),
        },
    )
    .await?;

    info!(
        "Account {} purchased toy {} for {} {}",
        account.id,
        toy.id,
        price.to_decimal_string(),
        price.currency
    );
    event_publisher
        .publish(DomainEvent::ToyPurchased {
            toy: toy.clone(),
            purchase: purchase.clone(),
        })
        .await;

    Ok((toy, purchase))
}

fn validate_name(name: &str, errors: &mut ValidationErrors) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        errors.add_field("name", "Name is required");
        None
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.add_field(
            "name",
            format!("Name must be at most {MAX_NAME_LENGTH} characters"),
        );
        None
    } else {
        Some(name.to_string())
    }
}

fn validate_price(price: &str, currency: Currency, errors: &mut ValidationErrors) -> Option<Money> {
    Money::parse(price, currency)
        .map_err(|e| errors.add_field("price", e.to_string()))
        .ok()
}

async fn ensure_name_available(
    db: &DatabaseConnection,
    name: &str,
    updating: Option<Id>,
    errors: &mut ValidationErrors,
) -> Result<(), Error> {
    if let Some(existing) = toy_api::find_by_name(db, name).await? {
        if Some(existing.id) != updating {
            errors.add_field("name", format!("A toy named '{}' already exists", existing.name));
        }
    }
    Ok(())
}

// The unique index on the name key catches a name claimed between the
// availability check and the write.
fn name_taken_or(error: EntityApiError, name: &str) -> Error {
    if error.error_kind != EntityApiErrorKind::DuplicateRecord {
        return error.into();
    }
    warn!("Toy name '{name}' was taken concurrently");
    let mut errors = ValidationErrors::new();
    errors.add_field("name", format!("A toy named '{name}' already exists"));
    Error::validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credit_card::MockCreditCardProcessor;
    use crate::error::{DomainErrorKind, EntityErrorKind, ExternalErrorKind, InternalErrorKind};
    use async_trait::async_trait;
    use entity_api::{account as account_api, schema::in_memory_database};
    use events::EventHandler;
    use secrecy::SecretString;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordedEvents(Mutex<Vec<DomainEvent>>);

    #[async_trait]
    impl EventHandler for RecordedEvents {
        async fn handle(&self, event: &DomainEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    fn publisher() -> (EventPublisher, Arc<RecordedEvents>) {
        let recorded = Arc::new(RecordedEvents::default());
        (
            EventPublisher::new().with_handler(recorded.clone()),
            recorded,
        )
    }

    fn event_names(recorded: &RecordedEvents) -> Vec<&'static str> {
        recorded.0.lock().unwrap().iter().map(DomainEvent::name).collect()
    }

    fn create_toy(name: &str, price: &str, currency: Currency) -> CreateToy {
        CreateToy {
            name: name.to_string(),
            price: price.to_string(),
            currency,
        }
    }

    fn validation_errors(result: Result<toys::Model, Error>) -> ValidationErrors {
        match result.map_err(|e| e.error_kind) {
            Err(DomainErrorKind::Internal(InternalErrorKind::Validation(errors))) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    async fn customer(db: &DatabaseConnection) -> Result<accounts::Model, Error> {
        let now = Utc::now();
        Ok(account_api::create(
            db,
            accounts::Model {
                id: Id::new_v4(),
                role: entity::roles::Role::Customer,
                name: "Customer".to_string(),
                email_address: "customer@example.com".to_string(),
                password: "hunter22".to_string(),
                locale: entity::locale::Locale::EnUs,
                time_zone: "UTC".to_string(),
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?)
    }

    fn card(number: &str) -> CreditCard {
        CreditCard {
            number: SecretString::new(number.to_string()),
            expiration: "2099-12".to_string(),
        }
    }

    #[tokio::test]
    async fn create_stores_the_price_in_minor_units_and_publishes() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, recorded) = publisher();

        let toy = create(&db, &publisher, create_toy("  Kite ", "12.5", Currency::Eur)).await?;

        assert_eq!(toy.name, "Kite");
        assert_eq!(toy.price_minor_units, 1250);
        assert_eq!(toy.currency, Currency::Eur);
        assert_eq!(event_names(&recorded), vec!["toy_created"]);
        Ok(())
    }

    #[tokio::test]
    async fn create_collects_every_field_error() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, recorded) = publisher();

        let errors = validation_errors(
            create(&db, &publisher, create_toy(" ", "1.5", Currency::Jpy)).await,
        );

        assert_eq!(
            errors.field_errors.keys().collect::<Vec<_>>(),
            vec!["name", "price"]
        );
        assert!(event_names(&recorded).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn names_are_unique_ignoring_case() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, _) = publisher();
        create(&db, &publisher, create_toy("Kite", "10", Currency::Usd)).await?;
        let other = create(&db, &publisher, create_toy("Yo-yo", "3", Currency::Usd)).await?;

        let duplicate_create =
            validation_errors(create(&db, &publisher, create_toy("KITE", "10", Currency::Usd)).await);
        let duplicate_rename = validation_errors(
            update(
                &db,
                &publisher,
                other.id,
                UpdateToy {
                    name: Some("kite".to_string()),
                    ..Default::default()
                },
            )
            .await,
        );

        assert!(duplicate_create.field_errors.contains_key("name"));
        assert!(duplicate_rename.field_errors.contains_key("name"));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_cannot_share_a_name() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, recorded) = publisher();

        let (kite, shouted_kite) = tokio::join!(
            create(&db, &publisher, create_toy("Kite", "10", Currency::Usd)),
            create(&db, &publisher, create_toy("KITE", "10", Currency::Usd)),
        );

        let (created, rejected) = match (kite, shouted_kite) {
            (Ok(toy), Err(e)) | (Err(e), Ok(toy)) => (toy, e),
            (a, b) => panic!("expected exactly one create to succeed, got {a:?} and {b:?}"),
        };
        assert!(validation_errors(Err(rejected)).field_errors.contains_key("name"));
        assert_eq!(
            search(&db, Some("kite")).await?.into_iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![created.id]
        );
        assert_eq!(event_names(&recorded), vec!["toy_created"]);
        Ok(())
    }

    #[tokio::test]
    async fn accented_names_are_unique_ignoring_case() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, _) = publisher();
        let bus = create(&db, &publisher, create_toy("Ónibus", "45", Currency::Brl)).await?;

        let duplicate =
            validation_errors(create(&db, &publisher, create_toy("ónibus", "45", Currency::Brl)).await);
        let found = search(&db, Some("ÓNIBUS")).await?;

        assert!(duplicate.field_errors.contains_key("name"));
        assert_eq!(found.into_iter().map(|t| t.id).collect::<Vec<_>>(), vec![bus.id]);
        Ok(())
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, recorded) = publisher();
        let toy = create(&db, &publisher, create_toy("Kite", "10", Currency::Usd)).await?;

        let renamed = update(
            &db,
            &publisher,
            toy.id,
            UpdateToy {
                name: Some("Box Kite".to_string()),
                ..Default::default()
            },
        )
        .await?;
        let repriced = update(
            &db,
            &publisher,
            toy.id,
            UpdateToy {
                price: Some("1500".to_string()),
                currency: Some(Currency::Jpy),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(renamed.price_minor_units, 1000);
        assert_eq!(repriced.name, "Box Kite");
        assert_eq!(repriced.price_minor_units, 1500);
        assert_eq!(repriced.currency, Currency::Jpy);
        assert_eq!(
            event_names(&recorded),
            vec!["toy_created", "toy_updated", "toy_updated"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn changing_currency_requires_a_price() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, _) = publisher();
        let toy = create(&db, &publisher, create_toy("Kite", "10", Currency::Usd)).await?;

        let errors = validation_errors(
            update(
                &db,
                &publisher,
                toy.id,
                UpdateToy {
                    currency: Some(Currency::Gbp),
                    ..Default::default()
                },
            )
            .await,
        );

        assert!(errors.field_errors.contains_key("price"));
        Ok(())
    }

    #[tokio::test]
    async fn purchase_records_the_price_paid_and_blocks_deletion() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, recorded) = publisher();
        let processor = MockCreditCardProcessor::new(["4000000000000002"]);
        let account = customer(&db).await?;
        let toy = create(&db, &publisher, create_toy("Kite", "10.99", Currency::Usd)).await?;

        let (_, purchase) = purchase(
            &db,
            &publisher,
            &processor,
            &account,
            toy.id,
            card("4242 4242 4242 4242"),
        )
        .await?;
        let deletion = delete(&db, &publisher, toy.id).await;

        assert_eq!(purchase.account_id, account.id);
        assert_eq!(purchase.price_minor_units, 1099);
        assert!(!purchase.credit_card_transaction_id.is_empty());
        assert!(!validation_errors(deletion).general_errors.is_empty());
        assert_eq!(event_names(&recorded), vec!["toy_created", "toy_purchased"]);
        Ok(())
    }

    #[tokio::test]
    async fn declined_cards_record_nothing() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, recorded) = publisher();
        let processor = MockCreditCardProcessor::new(["4000000000000002"]);
        let account = customer(&db).await?;
        let toy = create(&db, &publisher, create_toy("Kite", "10.99", Currency::Usd)).await?;

        let result = purchase(
            &db,
            &publisher,
            &processor,
            &account,
            toy.id,
            card("4000000000000002"),
        )
        .await;

        assert!(matches!(
            result.map(|_| ()).map_err(|e| e.error_kind),
            Err(DomainErrorKind::External(
                ExternalErrorKind::CreditCardDeclined(_)
            ))
        ));
        assert_eq!(purchase_api::count_by_toy_id(&db, toy.id).await?, 0);
        assert_eq!(event_names(&recorded), vec!["toy_created"]);
        Ok(())
    }

    #[tokio::test]
    async fn unpurchased_toys_can_be_deleted() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (publisher, recorded) = publisher();
        let toy = create(&db, &publisher, create_toy("Kite", "10", Currency::Usd)).await?;

        delete(&db, &publisher, toy.id).await?;

        assert_eq!(
            find_by_id(&db, toy.id).await.map(|_| ()).map_err(|e| e.error_kind),
            Err(DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound
            )))
        );
        assert_eq!(event_names(&recorded), vec!["toy_created", "toy_deleted"]);
        Ok(())
    }
}
