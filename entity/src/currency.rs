use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// ISO 4217 currencies the store prices toys in.
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
#[serde(rename_all = "UPPERCASE")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Currency {
    #[sea_orm(string_value = "USD")]
    #[default]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
    #[sea_orm(string_value = "GBP")]
    Gbp,
    #[sea_orm(string_value = "BRL")]
    Brl,
    #[sea_orm(string_value = "JPY")]
    Jpy,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Brl => "BRL",
            Currency::Jpy => "JPY",
        }
    }

    /// Number of digits after the decimal separator for amounts in this currency.
    pub fn minor_unit_digits(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "BRL" => Ok(Currency::Brl),
            "JPY" => Ok(Currency::Jpy),
            _ => Err(format!("Unsupported currency '{}'", code.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!(" Brl ".parse::<Currency>(), Ok(Currency::Brl));
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn yen_has_no_minor_units() {
        assert_eq!(Currency::Jpy.minor_unit_digits(), 0);
        assert_eq!(Currency::Eur.minor_unit_digits(), 2);
    }
}
