use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use sea_orm::Iterable;
use std::str::FromStr;
use utoipa::ToSchema;

/// Locales the store can format prices and timestamps for, stored as BCP 47 tags.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Locale {
    #[sea_orm(string_value = "en-US")]
    #[serde(rename = "en-US")]
    #[default]
    EnUs,
    #[sea_orm(string_value = "pt-BR")]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[sea_orm(string_value = "de-DE")]
    #[serde(rename = "de-DE")]
    DeDe,
    #[sea_orm(string_value = "ja-JP")]
    #[serde(rename = "ja-JP")]
    JaJp,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::PtBr => "pt-BR",
            Locale::DeDe => "de-DE",
            Locale::JaJp => "ja-JP",
        }
    }

    /// Matches a language tag such as `pt-BR`, `pt_br` or a bare `pt` against the
    /// supported locales. Region subtags we don't support fall back to the language.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        let normalized = tag.trim().replace('_', "-").to_lowercase();
        let language = normalized.split('-').next().unwrap_or_default();

        Locale::iter()
            .find(|locale| locale.tag().to_lowercase() == normalized)
            .or(match language {
                "en" => Some(Locale::EnUs),
                "pt" => Some(Locale::PtBr),
                "de" => Some(Locale::DeDe),
                "ja" => Some(Locale::JaJp),
                _ => None,
            })
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}", self.tag())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(tag).ok_or_else(|| format!("Unsupported locale '{tag}'"))
    }
}
