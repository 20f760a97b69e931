//! Live form fields and the draft order assembled from them at submit time.

use serde::{Deserialize, Serialize};

use super::QuantityMap;

/// Identity and payment fields of the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Address,
    CcNumber,
    CcExpiration,
    CcSecurity,
}

impl FormField {
    /// Every field, in validation order.
    pub const ALL: [FormField; 6] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Address,
        FormField::CcNumber,
        FormField::CcExpiration,
        FormField::CcSecurity,
    ];

    /// Returns the field path used in validation errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Address => "address",
            FormField::CcNumber => "ccNumber",
            FormField::CcExpiration => "ccExpiration",
            FormField::CcSecurity => "ccSecurity",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current values of the identity and payment inputs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub cc_number: String,
    pub cc_expiration: String,
    pub cc_security: String,
}

impl OrderForm {
    /// Returns the current value of a field.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Address => &self.address,
            FormField::CcNumber => &self.cc_number,
            FormField::CcExpiration => &self.cc_expiration,
            FormField::CcSecurity => &self.cc_security,
        }
    }

    /// Replaces the value of a field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Address => &mut self.address,
            FormField::CcNumber => &mut self.cc_number,
            FormField::CcExpiration => &mut self.cc_expiration,
            FormField::CcSecurity => &mut self.cc_security,
        };
        *slot = value.into();
    }
}

// Card details stay out of logs.
impl std::fmt::Debug for OrderForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("address", &self.address)
            .field("cc_number", &"<redacted>")
            .field("cc_expiration", &"<redacted>")
            .field("cc_security", &"<redacted>")
            .finish()
    }
}

/// The full candidate order: a quantity snapshot plus the form fields.
///
/// Built once, synchronously, right before validation. It is never kept in
/// sync with later edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(rename = "tickets")]
    pub quantities: QuantityMap,

    #[serde(flatten)]
    pub form: OrderForm,
}

impl OrderDraft {
    /// Merges the live form values with a quantity snapshot.
    pub fn assemble(form: &OrderForm, quantities: QuantityMap) -> Self {
        Self {
            quantities,
            form: form.clone(),
        }
    }
}
