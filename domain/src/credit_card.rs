//! Card validation and the (mocked) payment processor.
//!
//! Nothing here talks to a payment network. [`MockCreditCardProcessor`] approves
//! every valid card except the numbers it is configured to decline.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::money::Money;
use crate::validation::ValidationErrors;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashSet;

/// Card details as the customer entered them.
#[derive(Debug)]
pub struct CreditCard {
    pub number: SecretString,
    /// `YYYY-MM`
    pub expiration: String,
}

/// A card whose number and expiration passed [`CreditCard::validate`].
#[derive(Debug)]
pub struct ValidatedCreditCard {
    /// Digits only
    pub number: SecretString,
    pub expiration_year: i32,
    pub expiration_month: u32,
}

impl ValidatedCreditCard {
    pub fn last_four(&self) -> &str {
        let number = self.number.expose_secret();
        &number[number.len().saturating_sub(4)..]
    }
}

/// Processor-assigned id for a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditCardTransaction {
    pub transaction_id: String,
}

impl CreditCard {
    /// Checks the number (12 to 19 digits once spaces and dashes are removed, passing
    /// the Luhn check) and that the expiration month is not before `today`'s month.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedCreditCard, Error> {
        let mut errors = ValidationErrors::new();

        let number: String = self
            .number
            .expose_secret()
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();

        if number.is_empty() {
            errors.add_field("credit_card_number", "Credit card number is required");
        } else if !number.chars().all(|c| c.is_ascii_digit())
            || !(12..=19).contains(&number.len())
        {
            errors.add_field(
                "credit_card_number",
                "Credit card number must be 12 to 19 digits",
            );
        } else if !passes_luhn_check(&number) {
            errors.add_field("credit_card_number", "Credit card number is invalid");
        }

        let expiration = parse_expiration(&self.expiration);
        match expiration {
            None => errors.add_field(
                "credit_card_expiration",
                "Expiration must be formatted as YYYY-MM",
            ),
            Some((year, month)) if (year, month) < (today.year(), today.month()) => {
                errors.add_field("credit_card_expiration", "Credit card has expired")
            }
            Some(_) => {}
        }

        errors.into_result()?;

        let (expiration_year, expiration_month) = expiration.unwrap_or_default();
        Ok(ValidatedCreditCard {
            number: SecretString::new(number),
            expiration_year,
            expiration_month,
        })
    }
}

fn parse_expiration(expiration: &str) -> Option<(i32, u32)> {
    let (year, month) = expiration.trim().split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

/// Luhn mod-10 checksum over a string of ASCII digits.
pub fn passes_luhn_check(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

#[async_trait]
pub trait CreditCardProcessor: Send + Sync {
    /// Charges `amount` to `card`, returning the processor's transaction id.
    async fn charge(
        &self,
        card: &ValidatedCreditCard,
        amount: Money,
    ) -> Result<CreditCardTransaction, Error>;
}

/// Approves every card except a configured set of numbers.
/// A real system would call out to a payment gateway here.
#[derive(Debug, Clone, Default)]
pub struct MockCreditCardProcessor {
    declined_numbers: HashSet<String>,
}

impl MockCreditCardProcessor {
    pub fn new<I, S>(declined_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            declined_numbers: declined_numbers
                .into_iter()
                .map(|n| n.as_ref().chars().filter(char::is_ascii_digit).collect())
                .collect(),
        }
    }
}

#[async_trait]
impl CreditCardProcessor for MockCreditCardProcessor {
    async fn charge(
        &self,
        card: &ValidatedCreditCard,
        amount: Money,
    ) -> Result<CreditCardTransaction, Error> {
        if self.declined_numbers.contains(card.number.expose_secret()) {
            info!(
                "Declining charge of {} {} to card ending in {}",
                amount.to_decimal_string(),
                amount.currency,
                card.last_four()
            );
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::CreditCardDeclined(
                    "Your credit card was declined".to_string(),
                )),
            });
        }

        let transaction_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Charged {} {} to card ending in {} (transaction {transaction_id})",
            amount.to_decimal_string(),
            amount.currency,
            card.last_four()
        );
        Ok(CreditCardTransaction { transaction_id })
    }
}
