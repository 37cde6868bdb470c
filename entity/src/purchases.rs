use crate::currency::Currency;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A completed toy purchase. Price and currency are copied from the toy at the
/// time of purchase so later catalog changes don't rewrite history.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub account_id: Id,
    pub toy_id: Id,
    pub price_minor_units: i64,
    pub currency: Currency,
    pub credit_card_transaction_id: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::toys::Entity",
        from = "Column::ToyId",
        to = "super::toys::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Toys,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::toys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Toys.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
