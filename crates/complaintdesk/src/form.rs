//! The complaint form: field values, single-field edits and submission checks.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::complaint::{Category, ComplaintId, ComplaintRecord, Urgency};
use crate::error::{Error, Result};

/// The email shape accepted by an HTML `type="email"` input.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Current values of the complaint form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormFields {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Selected category.
    pub category: Category,
    /// Free text description.
    pub description: String,
    /// Selected urgency.
    pub urgency: Urgency,
}

/// A change to exactly one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Replace the name.
    Name(String),
    /// Replace the email.
    Email(String),
    /// Select a category.
    Category(Category),
    /// Replace the description.
    Description(String),
    /// Select an urgency.
    Urgency(Urgency),
}

impl FieldEdit {
    /// Field names accepted by [`FieldEdit::parse`].
    pub const FIELDS: [&'static str; 5] = ["name", "email", "category", "description", "urgency"];

    /// Build an edit from a field name and raw input.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown field, category or urgency.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name(value.to_string())),
            "email" => Ok(Self::Email(value.to_string())),
            "category" => Ok(Self::Category(value.parse()?)),
            "description" => Ok(Self::Description(value.to_string())),
            "urgency" => Ok(Self::Urgency(value.parse()?)),
            _ => Err(Error::UnknownField(field.to_string())),
        }
    }
}

impl FormFields {
    /// Apply one edit, leaving every other field untouched.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            // Email inputs drop surrounding whitespace on entry
            FieldEdit::Email(email) => self.email = email.trim().to_string(),
            FieldEdit::Category(category) => self.category = category,
            FieldEdit::Description(description) => self.description = description,
            FieldEdit::Urgency(urgency) => self.urgency = urgency,
        }
    }

    /// Check the fields an input boundary would refuse to submit.
    ///
    /// Name, email and description must be non-empty; the email must have
    /// the `local@domain` shape. Category and urgency always hold a value.
    ///
    /// These checks stand in for the form's `required` and `type="email"`
    /// input controls. Stored records are never re-validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] for the first empty required field, or
    /// [`Error::InvalidEmail`].
    pub fn check(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::missing_field("name"));
        }
        if self.email.is_empty() {
            return Err(Error::missing_field("email"));
        }
        if self.description.is_empty() {
            return Err(Error::missing_field("description"));
        }
        if !email_regex().is_match(&self.email) {
            return Err(Error::InvalidEmail {
                value: self.email.clone(),
            });
        }
        Ok(())
    }

    /// Build the record these fields describe under `id`.
    #[must_use]
    pub fn to_record(&self, id: ComplaintId) -> ComplaintRecord {
        ComplaintRecord {
            id,
            name: self.name.clone(),
            email: self.email.clone(),
            category: self.category,
            description: self.description.clone(),
            urgency: self.urgency,
        }
    }

    /// Reset every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
