//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with the store's entities within the domain layer, while the
//! underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{mutate::UpdateMap, IntoQueryFilterMap, QueryFilterMap};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{accounts, purchases, toys, Id};
pub use entity::{currency::Currency, locale::Locale, roles::Role};

pub mod access_token;
pub mod account;
pub mod credit_card;
pub mod error;
pub mod locale;
pub mod money;
pub mod purchase;
pub mod toy;
pub mod validation;
