use crate::currency::Currency;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "toys")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub name: String,
    /// `name` folded by [`name_key`]; the unique index that keeps names distinct ignoring case
    #[sea_orm(unique)]
    #[serde(skip)]
    pub name_key: String,
    /// Price expressed in the currency's smallest unit (cents for USD, yen for JPY)
    pub price_minor_units: i64,
    pub currency: Currency,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchases::Entity")]
    Purchases,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lookup form of a toy name: trimmed and lowercased with Unicode case rules,
/// so `Ónibus` and `ÓNIBUS` share a key.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
