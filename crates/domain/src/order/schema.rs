//! Order schema: field-level and structural validation of a draft order.
//!
//! Validation is a pure function over an [`OrderDraft`]. It never fails and
//! never stops at the first problem: every violated field is reported.

use serde::Serialize;

use super::{FormField, MAX_TICKET_QTY, OrderDraft};
use crate::catalog::Catalog;

const REQUIRED: &str = "Required";

#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Non-empty once surrounding whitespace is removed.
    NotBlank,
    NotEmpty,
    MinLength(usize),
}

impl Rule {
    fn check(self, value: &str) -> Option<String> {
        match self {
            Rule::NotBlank if value.trim().is_empty() => Some(REQUIRED.to_string()),
            Rule::NotEmpty if value.is_empty() => Some(REQUIRED.to_string()),
            Rule::MinLength(min) if value.chars().count() < min => {
                Some(format!("Must be at least {min} characters"))
            }
            _ => None,
        }
    }
}

const FIELD_RULES: [(FormField, Rule); 6] = [
    (FormField::FirstName, Rule::NotBlank),
    (FormField::LastName, Rule::NotBlank),
    (FormField::Address, Rule::NotBlank),
    (FormField::CcNumber, Rule::NotEmpty),
    (FormField::CcExpiration, Rule::MinLength(5)),
    (FormField::CcSecurity, Rule::MinLength(3)),
];

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field path, e.g. `firstName` or `tickets.GA`.
    pub field: String,
    pub message: String,
}

/// Violated fields in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns the message for a field path.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Returns true if the field path has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates errors in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins every outstanding error as `field: message`, separated by `; `.
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Outcome of validating a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    field_errors: FieldErrors,
}

impl ValidationResult {
    /// True iff no field is in error.
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Converts into `Ok(())` or the field errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.field_errors.is_empty() {
            Ok(())
        } else {
            Err(self.field_errors)
        }
    }
}

/// Validates a draft order against the active catalog.
pub fn validate(draft: &OrderDraft, catalog: &Catalog) -> ValidationResult {
    let mut errors = FieldErrors::default();

    for offering_type in catalog.types() {
        let quantity = draft.quantities.get(offering_type.as_str());
        if quantity > MAX_TICKET_QTY {
            errors.push(
                ticket_path(offering_type.as_str()),
                format!("Must be between 0 and {MAX_TICKET_QTY}"),
            );
        }
    }

    for (offering_type, _) in draft.quantities.iter() {
        if !catalog.contains(offering_type.as_str()) {
            errors.push(ticket_path(offering_type.as_str()), "Unknown ticket type");
        }
    }

    for (field, rule) in FIELD_RULES {
        if let Some(message) = rule.check(draft.form.get(field)) {
            errors.push(field.as_str(), message);
        }
    }

    ValidationResult {
        field_errors: errors,
    }
}

/// Field path for a ticket quantity input.
pub fn ticket_path(offering_type: &str) -> String {
    format!("tickets.{offering_type}")
}
