use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What an account is allowed to do in the store.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
    /// Browses the catalog and purchases toys
    #[sea_orm(string_value = "customer")]
    #[default]
    Customer,
    /// Maintains the catalog
    #[sea_orm(string_value = "employee")]
    Employee,
    /// Everything an employee can do, plus removing toys and reading any purchase
    #[sea_orm(string_value = "administrator")]
    Administrator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(fmt, "customer"),
            Role::Employee => write!(fmt, "employee"),
            Role::Administrator => write!(fmt, "administrator"),
        }
    }
}
