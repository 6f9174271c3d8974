//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record persisted by the store.
//! - Validate required fields at the boundary before any store call.
//!
//! # Invariants
//! - `id` is `None` until the store assigns an identity on insert.
//! - An assigned `id` is never the nil UUID and never changes.
//! - `first_name`, `last_name` and `department` are non-empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier assigned by the store on insert.
pub type EmployeeId = Uuid;

/// Closed set of employee fields addressable by filters and updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeField {
    FirstName,
    LastName,
    Department,
}

impl EmployeeField {
    /// All fields in declaration order.
    pub const ALL: [EmployeeField; 3] = [Self::FirstName, Self::LastName, Self::Department];

    /// Storage column / wire name for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Department => "department",
        }
    }
}

impl Display for EmployeeField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeField {
    type Err = EmployeeValidationError;

    /// Accepts both snake_case and camelCase spellings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "first_name" | "firstName" => Ok(Self::FirstName),
            "last_name" | "lastName" => Ok(Self::LastName),
            "department" => Ok(Self::Department),
            other => Err(EmployeeValidationError::UnknownField(other.to_string())),
        }
    }
}

/// Boundary validation failures for employee records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// A required field is empty.
    MissingField(EmployeeField),
    /// The nil UUID cannot identify a record.
    NilId,
    /// Field name does not belong to the employee record.
    UnknownField(String),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "employee field `{field}` is required"),
            Self::NilId => write!(f, "employee id must not be nil"),
            Self::UnknownField(name) => write!(f, "unknown employee field `{name}`"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Canonical employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEmployee")]
pub struct Employee {
    /// Store-assigned identity; `None` for records not yet inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

impl Employee {
    /// Builds a new, not yet persisted record.
    ///
    /// Validation is deferred to the write path so callers can assemble a
    /// record field by field.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
        }
    }

    /// Rebuilds a persisted record from its stored state.
    ///
    /// # Errors
    /// - `NilId` for the nil UUID.
    /// - `MissingField` for any empty field.
    pub fn with_id(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Result<Self, EmployeeValidationError> {
        let mut employee = Self::new(first_name, last_name, department);
        employee.id = Some(id);
        employee.validate()?;
        Ok(employee)
    }

    /// True until the store has assigned an identity.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns the value of one field.
    pub fn field(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::FirstName => &self.first_name,
            EmployeeField::LastName => &self.last_name,
            EmployeeField::Department => &self.department,
        }
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.id.is_some_and(|id| id.is_nil()) {
            return Err(EmployeeValidationError::NilId);
        }
        for field in EmployeeField::ALL {
            validate_field_value(field, self.field(field))?;
        }
        Ok(())
    }
}

/// Rejects empty values for a required field; whitespace counts as content.
pub fn validate_field_value(field: EmployeeField, value: &str) -> Result<(), EmployeeValidationError> {
    if value.is_empty() {
        return Err(EmployeeValidationError::MissingField(field));
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawEmployee {
    #[serde(default)]
    id: Option<EmployeeId>,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    department: String,
}

impl TryFrom<RawEmployee> for Employee {
    type Error = EmployeeValidationError;

    fn try_from(raw: RawEmployee) -> Result<Self, Self::Error> {
        let employee = Self {
            id: raw.id,
            first_name: raw.first_name,
            last_name: raw.last_name,
            department: raw.department,
        };
        employee.validate()?;
        Ok(employee)
    }
}

#[cfg(test)]
mod tests {
    use super::{Employee, EmployeeField, EmployeeValidationError};

    #[test]
    fn field_names_parse_in_both_spellings() {
        assert_eq!("firstName".parse::<EmployeeField>(), Ok(EmployeeField::FirstName));
        assert_eq!("last_name".parse::<EmployeeField>(), Ok(EmployeeField::LastName));
        assert_eq!(
            "salary".parse::<EmployeeField>(),
            Err(EmployeeValidationError::UnknownField("salary".to_string()))
        );
    }

    #[test]
    fn field_reads_the_named_value() {
        let employee = Employee::new("Ada", "Lovelace", "R&D");

        assert_eq!(employee.field(EmployeeField::FirstName), "Ada");
        assert_eq!(employee.field(EmployeeField::Department), "R&D");
    }
}
