//! Checkout forms and their validation.
//!
//! Checkout is two steps: the delivery form (payment method and address),
//! then the contact form (email and phone). Validation is a pair of pure
//! functions that rebuild a complete [`FormErrors`] map from the form on
//! every call, so they can run after each keystroke.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Payment method chosen on the delivery step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payment {
    /// Pay online by card
    Card,
    /// Pay in cash on delivery
    Cash,
    /// Not chosen yet
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Payment {
    /// Interprets raw input from the payment buttons.
    ///
    /// Anything other than `"card"` or `"cash"` is stored as [`Payment::Unset`]
    /// and reported by validation.
    #[must_use]
    pub fn from_input(value: &str) -> Self {
        match value.trim() {
            "card" => Self::Card,
            "cash" => Self::Cash,
            _ => Self::Unset,
        }
    }

    /// Whether a method has been chosen
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Cash => write!(f, "cash"),
            Self::Unset => write!(f, "unset"),
        }
    }
}

/// Fields of the delivery form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryField {
    /// Payment method
    Payment,
    /// Delivery address
    Address,
}

/// Fields of the contact form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactField {
    /// Email address
    Email,
    /// Phone number
    Phone,
}

/// Every user-editable field of an order; keys of [`FormErrors`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    /// Payment method
    Payment,
    /// Delivery address
    Address,
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl From<DeliveryField> for OrderField {
    fn from(field: DeliveryField) -> Self {
        match field {
            DeliveryField::Payment => Self::Payment,
            DeliveryField::Address => Self::Address,
        }
    }
}

impl From<ContactField> for OrderField {
    fn from(field: ContactField) -> Self {
        match field {
            ContactField::Email => Self::Email,
            ContactField::Phone => Self::Phone,
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => write!(f, "payment"),
            Self::Address => write!(f, "address"),
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
        }
    }
}

/// First checkout step: how to pay and where to deliver
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryForm {
    /// Payment method
    pub payment: Payment,
    /// Delivery address
    pub address: String,
}

impl DeliveryForm {
    /// Stores raw input into `field`
    pub fn set(&mut self, field: DeliveryField, value: &str) {
        match field {
            DeliveryField::Payment => self.payment = Payment::from_input(value),
            DeliveryField::Address => self.address = value.to_string(),
        }
    }
}

/// Second checkout step: how to reach the customer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl ContactForm {
    /// Stores raw input into `field`
    pub fn set(&mut self, field: ContactField, value: &str) {
        match field {
            ContactField::Email => self.email = value.to_string(),
            ContactField::Phone => self.phone = value.to_string(),
        }
    }
}

/// Why a form is currently invalid: field → message
///
/// An absent key means the field is valid; an empty map means the form is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<OrderField, String>);

impl FormErrors {
    /// No errors
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records an error for `field`, replacing any previous one
    pub fn insert(&mut self, field: OrderField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message for `field`, if it is invalid
    #[must_use]
    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` has an error
    #[must_use]
    pub fn contains(&self, field: OrderField) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether there are no errors at all
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of invalid fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`FormErrors::is_valid`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors in field order
    pub fn iter(&self) -> impl Iterator<Item = (OrderField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// All messages joined with `"; "`, as shown under a form
    #[must_use]
    pub fn summary(&self) -> String {
        self.0.values().map(String::as_str).collect::<Vec<_>>().join("; ")
    }

    /// Combines two error maps; used when both checkout steps are checked at once
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates the delivery step.
///
/// Requires an address and a chosen payment method.
#[must_use]
pub fn validate_delivery(form: &DeliveryForm) -> FormErrors {
    let mut errors = FormErrors::new();
    if is_blank(&form.address) {
        errors.insert(OrderField::Address, "address required");
    }
    if !form.payment.is_set() {
        errors.insert(OrderField::Payment, "payment method required");
    }
    errors
}

/// Validates the contact step.
///
/// Requires a non-empty email and phone. Formats are not checked.
#[must_use]
pub fn validate_contacts(form: &ContactForm) -> FormErrors {
    let mut errors = FormErrors::new();
    if is_blank(&form.email) {
        errors.insert(OrderField::Email, "email required");
    }
    if is_blank(&form.phone) {
        errors.insert(OrderField::Phone, "phone required");
    }
    errors
}
