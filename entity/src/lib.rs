use uuid::Uuid;

pub mod prelude;

// Core entities
pub mod accounts;
pub mod purchases;
pub mod toys;

// Column value types
pub mod currency;
pub mod locale;
pub mod roles;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
