use super::error::{EntityApiErrorKind, Error};
use crate::{query, QueryFilterMap};
use chrono::Utc;
use entity::purchases::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, Set};

pub async fn create(db: &impl ConnectionTrait, purchase_model: Model) -> Result<Model, Error> {
    debug!("New Purchase Model to be inserted: {purchase_model:?}");

    let purchase_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        account_id: Set(purchase_model.account_id),
        toy_id: Set(purchase_model.toy_id),
        price_minor_units: Set(purchase_model.price_minor_units),
        currency: Set(purchase_model.currency),
        credit_card_transaction_id: Set(purchase_model.credit_card_transaction_id),
        created_at: Set(Utc::now().into()),
    };

    Ok(purchase_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

pub async fn count_by_toy_id(db: &impl ConnectionTrait, toy_id: Id) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::ToyId.eq(toy_id))
        .count(db)
        .await?)
}

/// Purchases matching `query_filter_map`, oldest first.
pub async fn find_by(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
) -> Result<Vec<Model>, Error> {
    query::find_by::<Entity, Column>(db, query_filter_map, Column::CreatedAt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseConnection, Value};
    use crate::schema::in_memory_database;
    use crate::{account, toy};
    use entity::{accounts, currency::Currency, locale::Locale, roles::Role, toys};

    async fn account_and_toy(db: &DatabaseConnection) -> Result<(accounts::Model, toys::Model), Error> {
        let now = Utc::now();
        let account = account::create(
            db,
            accounts::Model {
                id: Id::new_v4(),
                role: Role::Customer,
                name: "Buyer".to_string(),
                email_address: "buyer@example.com".to_string(),
                password: "hunter22".to_string(),
                locale: Locale::EnUs,
                time_zone: "UTC".to_string(),
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?;
        let toy = toy::create(
            db,
            toys::Model {
                id: Id::new_v4(),
                name: "Kite".to_string(),
                name_key: "kite".to_string(),
                price_minor_units: 1200,
                currency: Currency::Eur,
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?;
        Ok((account, toy))
    }

    fn purchase_of(account: &accounts::Model, toy: &toys::Model, transaction: &str) -> Model {
        Model {
            id: Id::new_v4(),
            account_id: account.id,
            toy_id: toy.id,
            price_minor_units: toy.price_minor_units,
            currency: toy.currency,
            credit_card_transaction_id: transaction.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn purchases_are_found_by_account_and_counted_by_toy() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (account, toy) = account_and_toy(&db).await?;

        let first = create(&db, purchase_of(&account, &toy, "txn-1")).await?;
        let second = create(&db, purchase_of(&account, &toy, "txn-2")).await?;

        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "account_id".to_string(),
            Some(Value::Uuid(Some(Box::new(account.id)))),
        );
        let mut by_account = find_by(&db, query_filter_map).await?;
        by_account.sort_by_key(|p| p.created_at);
        assert_eq!(
            by_account.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        assert_eq!(count_by_toy_id(&db, toy.id).await?, 2);
        assert_eq!(count_by_toy_id(&db, Id::new_v4()).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_filters_on_known_columns() -> Result<(), Error> {
        let db = in_memory_database().await?;
        let (account, toy) = account_and_toy(&db).await?;
        let purchase = create(&db, purchase_of(&account, &toy, "txn-1")).await?;

        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "credit_card_transaction_id".to_string(),
            Some(Value::String(Some(Box::new("txn-1".to_string())))),
        );
        let found = find_by(&db, query_filter_map).await?;

        assert_eq!(found, vec![purchase]);
        Ok(())
    }
}
