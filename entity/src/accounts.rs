use crate::locale::Locale;
use crate::roles::Role;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub role: Role,
    pub name: String,
    /// Always stored lowercased
    #[sea_orm(unique)]
    pub email_address: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub locale: Locale,
    /// IANA time zone name, e.g. `America/Sao_Paulo`
    pub time_zone: String,
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
