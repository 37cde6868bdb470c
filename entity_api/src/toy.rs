use super::error::{EntityApiErrorKind, Error};
use crate::mutate::{self, UpdateMap};
use chrono::Utc;
use entity::toys::{name_key, ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{entity::prelude::*, ConnectionTrait, IntoActiveModel, QueryOrder, Set, Value};

const LIKE_ESCAPE: char = '\\';

pub async fn create(db: &impl ConnectionTrait, toy_model: Model) -> Result<Model, Error> {
    debug!("New Toy Model to be inserted: {toy_model:?}");

    let now = Utc::now();
    let toy_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        name_key: Set(name_key(&toy_model.name)),
        name: Set(toy_model.name),
        price_minor_units: Set(toy_model.price_minor_units),
        currency: Set(toy_model.currency),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(toy_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Finds the toy whose name matches `name` ignoring case.
pub async fn find_by_name(db: &impl ConnectionTrait, name: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::NameKey.eq(name_key(name)))
        .one(db)
        .await?)
}

/// Returns toys whose name contains `query` (case-insensitive), ordered by name.
/// A missing or blank query returns the whole catalog.
pub async fn search(db: &impl ConnectionTrait, query: Option<&str>) -> Result<Vec<Model>, Error> {
    let mut select = Entity::find();

    if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(&name_key(query)));
        select = select.filter(Column::NameKey.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)));
    }

    Ok(select.order_by_asc(Column::Name).all(db).await?)
}

// `%` and `_` in a search are literal characters, not wildcards
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Applies `update_map` to the toy with `id`, always bumping `updated_at`.
/// A new `name` also refreshes `name_key`.
pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let existing_toy = find_by_id(db, id).await?;
    debug!("Existing Toy model to be Updated: {existing_toy:?}");

    if let Some(Value::String(Some(name))) = update_map.get(Column::Name.as_str()) {
        let key = name_key(name);
        update_map.insert(
            Column::NameKey.as_str().to_string(),
            Some(Value::from(key)),
        );
    }

    update_map.insert(
        Column::UpdatedAt.as_str().to_string(),
        Some(Value::ChronoDateTimeWithTimeZone(Some(Box::new(
            Utc::now().into(),
        )))),
    );

    mutate::update::<ActiveModel, Column>(db, existing_toy.into_active_model(), update_map).await
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let toy = find_by_id(db, id).await?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(toy)
}
