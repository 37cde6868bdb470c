//! Collects user-facing validation failures so a request can report all of them at once.

use serde::Serialize;
use std::collections::BTreeMap;

/// Validation failures, either tied to a request field or general to the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub general_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add_general(message);
        errors
    }

    pub fn add_general(&mut self, message: impl Into<String>) {
        self.general_errors.push(message.into());
    }

    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.general_errors.is_empty() && self.field_errors.is_empty()
    }

    /// `Ok(())` when nothing was collected, otherwise a validation error carrying `self`.
    pub fn into_result(self) -> Result<(), crate::error::Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(crate::error::Error::validation(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add_field("name", "Name is required");
        errors.add_field("name", "Name is too long");
        errors.add_field("price", "Price is invalid");

        assert_eq!(errors.field_errors["name"].len(), 2);
        assert_eq!(errors.field_errors["price"], vec!["Price is invalid"]);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
