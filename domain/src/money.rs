//! Prices as integer minor units, parsed from and rendered to decimal text.

use entity::currency::Currency;
use entity::locale::Locale;
use std::fmt;

/// An amount in a currency's smallest unit (cents, yen, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    pub minor_units: i64,
    pub currency: Currency,
}

/// Why a price string could not be read as an amount of a currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    Invalid,
    TooManyFractionDigits { currency: Currency, allowed: u32 },
    OutOfRange,
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Empty => write!(f, "Price is required"),
            MoneyParseError::Invalid => {
                write!(f, "Price must be a non-negative decimal number such as 12.50")
            }
            MoneyParseError::TooManyFractionDigits {
                currency,
                allowed: 0,
            } => write!(f, "Prices in {currency} cannot have a fractional part"),
            MoneyParseError::TooManyFractionDigits { currency, allowed } => write!(
                f,
                "Prices in {currency} can have at most {allowed} fractional digits"
            ),
            MoneyParseError::OutOfRange => write!(f, "Price is too large"),
        }
    }
}

impl Money {
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Reads decimal text such as `12`, `12.5` or `12.50` as an amount of `currency`.
    /// Signs, exponents, grouping separators and more fractional digits than the
    /// currency has are rejected.
    pub fn parse(text: &str, currency: Currency) -> Result<Money, MoneyParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text, None),
        };

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || fraction.is_some_and(|f| !all_digits(f)) {
            return Err(MoneyParseError::Invalid);
        }

        let allowed = currency.minor_unit_digits();
        let fraction = fraction.unwrap_or_default();
        if fraction.len() > allowed as usize {
            return Err(MoneyParseError::TooManyFractionDigits { currency, allowed });
        }

        let scale = 10_i64.pow(allowed);
        let whole: i64 = whole.parse().map_err(|_| MoneyParseError::OutOfRange)?;
        let fraction: i64 = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{fraction:0<width$}", width = allowed as usize);
            padded.parse().map_err(|_| MoneyParseError::Invalid)?
        };

        whole
            .checked_mul(scale)
            .and_then(|minor_units| minor_units.checked_add(fraction))
            .map(|minor_units| Money::new(minor_units, currency))
            .ok_or(MoneyParseError::OutOfRange)
    }

    /// Plain decimal form with exactly the currency's fractional digits: `12.50`, `1800`.
    pub fn to_decimal_string(&self) -> String {
        let (whole, fraction) = self.split();
        match fraction {
            Some(fraction) => format!("{whole}.{fraction}"),
            None => whole,
        }
    }

    /// Display form for `locale`, e.g. `$1,234.50`, `US$ 1.234,50` or `1.234,50 $`.
    pub fn format(&self, locale: Locale) -> String {
        let (grouping, decimal) = match locale {
            Locale::EnUs | Locale::JaJp => (',', '.'),
            Locale::PtBr | Locale::DeDe => ('.', ','),
        };

        let (whole, fraction) = self.split();
        let mut number = group_thousands(&whole, grouping);
        if let Some(fraction) = fraction {
            number.push(decimal);
            number.push_str(&fraction);
        }

        let symbol = currency_symbol(locale, self.currency);
        match locale {
            Locale::EnUs | Locale::JaJp => format!("{symbol}{number}"),
            Locale::PtBr => format!("{symbol} {number}"),
            Locale::DeDe => format!("{number} {symbol}"),
        }
    }

    fn split(&self) -> (String, Option<String>) {
        let digits = self.currency.minor_unit_digits();
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let magnitude = self.minor_units.unsigned_abs();

        if digits == 0 {
            return (format!("{sign}{magnitude}"), None);
        }

        let scale = 10_u64.pow(digits);
        (
            format!("{sign}{}", magnitude / scale),
            Some(format!(
                "{:0width$}",
                magnitude % scale,
                width = digits as usize
            )),
        )
    }
}

fn currency_symbol(locale: Locale, currency: Currency) -> &'static str {
    match (locale, currency) {
        (Locale::PtBr, Currency::Usd) => "US$",
        (Locale::PtBr, Currency::Jpy) => "JP¥",
        (Locale::JaJp, Currency::Jpy) => "￥",
        (_, Currency::Usd) => "$",
        (_, Currency::Eur) => "€",
        (_, Currency::Gbp) => "£",
        (_, Currency::Brl) => "R$",
        (_, Currency::Jpy) => "¥",
    }
}

fn group_thousands(whole: &str, separator: char) -> String {
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(whole.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
