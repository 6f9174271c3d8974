//! Filter and partial-update value types for employee queries.
//!
//! # Responsibility
//! - Describe which records an operation targets (`EmployeeFilter`).
//! - Describe which fields an update overwrites (`EmployeeUpdate`).
//!
//! # Invariants
//! - Only `EmployeeField` keys are representable.
//! - Filter entries combine with AND; an empty filter matches everything.
//! - Update values must pass the same non-empty rule as inserts.

use crate::model::employee::{validate_field_value, EmployeeField, EmployeeValidationError};
use std::collections::BTreeMap;

/// Exact-match filter over employee fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    conditions: BTreeMap<EmployeeField, String>,
}

impl EmployeeFilter {
    /// Filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an exact-match condition on `field`.
    pub fn with(mut self, field: EmployeeField, value: impl Into<String>) -> Self {
        self.conditions.insert(field, value.into());
        self
    }

    pub fn first_name(self, value: impl Into<String>) -> Self {
        self.with(EmployeeField::FirstName, value)
    }

    pub fn last_name(self, value: impl Into<String>) -> Self {
        self.with(EmployeeField::LastName, value)
    }

    pub fn department(self, value: impl Into<String>) -> Self {
        self.with(EmployeeField::Department, value)
    }

    /// Builds a filter from textual field names, e.g. parsed user input.
    ///
    /// # Errors
    /// - `UnknownField` when a name is not an employee field.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, EmployeeValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::all();
        for (name, value) in pairs {
            let field = name.as_ref().parse::<EmployeeField>()?;
            filter = filter.with(field, value);
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Conditions in stable field order.
    pub fn conditions(&self) -> impl Iterator<Item = (EmployeeField, &str)> {
        self.conditions
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }
}

/// Partial update: the set of fields to overwrite and their new values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    changes: BTreeMap<EmployeeField, String>,
}

impl EmployeeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` to `value` when applied.
    pub fn set(mut self, field: EmployeeField, value: impl Into<String>) -> Self {
        self.changes.insert(field, value.into());
        self
    }

    pub fn first_name(self, value: impl Into<String>) -> Self {
        self.set(EmployeeField::FirstName, value)
    }

    pub fn last_name(self, value: impl Into<String>) -> Self {
        self.set(EmployeeField::LastName, value)
    }

    pub fn department(self, value: impl Into<String>) -> Self {
        self.set(EmployeeField::Department, value)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changes in stable field order.
    pub fn changes(&self) -> impl Iterator<Item = (EmployeeField, &str)> {
        self.changes
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Rejects updates that would empty a required field.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        for (field, value) in self.changes() {
            validate_field_value(field, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeFilter, EmployeeUpdate};
    use crate::model::employee::{EmployeeField, EmployeeValidationError};

    #[test]
    fn filter_conditions_come_back_in_field_order() {
        let filter = EmployeeFilter::all()
            .department("department1")
            .first_name("FirstName1")
            .first_name("FirstName2");

        let conditions: Vec<_> = filter.conditions().collect();
        assert_eq!(
            conditions,
            vec![
                (EmployeeField::FirstName, "FirstName2"),
                (EmployeeField::Department, "department1"),
            ]
        );
        assert!(EmployeeFilter::all().is_empty());
    }

    #[test]
    fn from_pairs_rejects_unknown_fields() {
        let filter = EmployeeFilter::from_pairs([("firstName", "FirstName1")]).unwrap();
        assert_eq!(filter, EmployeeFilter::all().first_name("FirstName1"));

        let err = EmployeeFilter::from_pairs([("age", "42")]).unwrap_err();
        assert_eq!(err, EmployeeValidationError::UnknownField("age".to_string()));
    }

    #[test]
    fn update_validation_rejects_empty_values() {
        let update = EmployeeUpdate::new().first_name("=FirstName1=").last_name("");
        assert_eq!(
            update.validate(),
            Err(EmployeeValidationError::MissingField(EmployeeField::LastName))
        );
    }
}
