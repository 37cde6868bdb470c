use crate::error::Error;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IdenStatic, IntoActiveModel, Value,
};
use std::collections::HashMap;

/// Updates an existing record using a map of column names to values.
///
/// Only the columns present in `update_map` are touched; everything else on
/// `active_model` keeps whatever state it already had.
///
/// # Type Parameters
///
/// * `A` - The ActiveModel type that implements ActiveModelTrait and ActiveModelBehavior
/// * `C` - The Column type that implements ColumnTrait
pub async fn update<A, C>(
    db: &impl ConnectionTrait,
    mut active_model: A,
    update_map: UpdateMap,
) -> Result<<A::Entity as EntityTrait>::Model, Error>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ColumnTrait,
    A::Entity: EntityTrait<Column = C>,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    for column in C::iter() {
        if let Some(value) = update_map.get(column.as_str()) {
            active_model.set(column, value.clone());
        }
    }
    Ok(active_model.update(db).await?)
}

/// Column names mapped to the values they should be updated to.
#[derive(Default, Debug)]
pub struct UpdateMap {
    map: HashMap<String, Option<Value>>,
}

impl UpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, or `None` when the key is absent or holds no value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).and_then(|opt| opt.as_ref())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key).and_then(|opt| opt)
    }

    /// Inserts a key-value pair into the map, overwriting any existing value.
    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    pub fn is_empty(&self) -> bool {
        self.map.values().all(Option::is_none)
    }
}
