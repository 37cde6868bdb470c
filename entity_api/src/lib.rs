use chrono::Utc;
use entity::currency::Currency;
use entity::locale::Locale;
use entity::roles::Role;
use log::*;
use sea_orm::{DatabaseConnection, Value};
use std::collections::HashMap;

pub use entity::{accounts, purchases, toys, Id};

pub mod account;
pub mod error;
pub mod mutate;
pub mod purchase;
pub mod query;
pub mod schema;
pub mod toy;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// This structure is particularly useful in scenarios where you need to pass filter parameters
/// from a web request down to the database query layer in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("account_id".to_string(), Some(Value::String(Some(Box::new("an_account_id".to_string())))));
/// let filter_value = query_filter_map.get("account_id");
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` is a trait that provides a method for converting a struct into a `QueryFilterMap`.
/// This is particularly useful for translating data between different layers of the application,
/// such as from web request parameters to database query filters.
///
/// Implementing this trait for a struct allows you to define how the fields of the struct should be
/// mapped to the keys and values of the `QueryFilterMap`. This ensures that the data is passed
/// in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use entity_api::QueryFilterMap;
/// use entity_api::IntoQueryFilterMap;
///
/// #[derive(Debug)]
/// struct MyParams {
///     toy_id: String,
/// }
///
/// impl IntoQueryFilterMap for MyParams {
///     fn into_query_filter_map(self) -> QueryFilterMap {
///         let mut query_filter_map = QueryFilterMap::new();
///         query_filter_map.insert(
///             "toy_id".to_string(),
///             Some(sea_orm::Value::String(Some(Box::new(self.toy_id)))),
///         );
///         query_filter_map
///     }
/// }
/// ```
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Password shared by every seeded account.
pub const SEED_ACCOUNT_PASSWORD: &str = "test123";

/// Populates a freshly created database with one account per role and a small
/// toy catalog priced in several currencies.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let seed_accounts = [
        (
            Role::Administrator,
            "Example Administrator",
            "admin@soklet.com",
            Locale::EnUs,
            "America/New_York",
        ),
        (
            Role::Employee,
            "Example Employee",
            "employee@soklet.com",
            Locale::DeDe,
            "Europe/Berlin",
        ),
        (
            Role::Customer,
            "Example Customer",
            "customer@soklet.com",
            Locale::PtBr,
            "America/Sao_Paulo",
        ),
        (
            Role::Customer,
            "Another Customer",
            "customer2@soklet.com",
            Locale::JaJp,
            "Asia/Tokyo",
        ),
    ];

    let now = Utc::now();

    for (role, name, email_address, locale, time_zone) in seed_accounts {
        account::create(
            db,
            accounts::Model {
                id: Id::new_v4(),
                role,
                name: name.to_owned(),
                email_address: email_address.to_owned(),
                password: SEED_ACCOUNT_PASSWORD.to_owned(),
                locale,
                time_zone: time_zone.to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?;
    }

    let seed_toys = [
        ("Teddy Bear", 1_999, Currency::Usd),
        ("Rubber Duck", 499, Currency::Usd),
        ("Wooden Train Set", 4_950, Currency::Eur),
        ("Spinning Top", 350, Currency::Gbp),
        ("Kendama", 1_800, Currency::Jpy),
        ("Pipa", 1_590, Currency::Brl),
    ];

    for (name, price_minor_units, currency) in seed_toys {
        toy::create(
            db,
            toys::Model {
                id: Id::new_v4(),
                name: name.to_owned(),
                name_key: toys::name_key(name),
                price_minor_units,
                currency,
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?;
    }

    info!(
        "Seeded database with {} accounts and {} toys",
        seed_accounts.len(),
        seed_toys.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::in_memory_database;

    #[tokio::test]
    async fn seed_database_creates_one_account_per_role_with_usable_passwords(
    ) -> Result<(), error::Error> {
        let db = in_memory_database().await?;

        seed_database(&db).await?;

        for email_address in ["admin@soklet.com", "employee@soklet.com", "customer@soklet.com"] {
            let account = account::find_by_email_address(&db, email_address)
                .await?
                .unwrap();
            account::verify_password(SEED_ACCOUNT_PASSWORD, &account.password)?;
        }
        assert_eq!(toy::search(&db, None).await?.len(), 6);
        Ok(())
    }
}
