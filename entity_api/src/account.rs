use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::accounts::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};

pub use entity::roles::Role;

/// Inserts a new account. `account_model.password` is the plaintext password; only its
/// hash is stored.
pub async fn create(db: &impl ConnectionTrait, account_model: Model) -> Result<Model, Error> {
    debug!(
        "New Account to be inserted: {} <{}>",
        account_model.name, account_model.email_address
    );

    let now = Utc::now();
    let account_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        role: Set(account_model.role),
        name: Set(account_model.name),
        email_address: Set(account_model.email_address.trim().to_lowercase()),
        password: Set(generate_hash(account_model.password)),
        locale: Set(account_model.locale),
        time_zone: Set(account_model.time_zone),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(account_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Looks an account up by email address. Lookups are case-insensitive because
/// addresses are stored lowercased.
pub async fn find_by_email_address(
    db: &impl ConnectionTrait,
    email_address: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::EmailAddress.eq(email_address.trim().to_lowercase()))
        .one(db)
        .await?)
}

pub fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}
