//! Field catalogue for the customer form.
//!
//! Every user-editable column of the `customers` table has one entry here,
//! carrying its constraints. The validator and the front-ends both read from
//! this table so that limits and messages live in one place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format rule applied after the required and length checks pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// `user@domain.tld` shape.
    Email,
    /// Absolute URL.
    Url,
}

/// A user-editable customer field, in form declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Name,
    Email,
    Phone,
    Company,
    Designation,
    LinkedinUrl,
    InstagramId,
}

impl CustomerField {
    /// All fields in declaration order.
    pub const ALL: [CustomerField; 7] = [
        CustomerField::Name,
        CustomerField::Email,
        CustomerField::Phone,
        CustomerField::Company,
        CustomerField::Designation,
        CustomerField::LinkedinUrl,
        CustomerField::InstagramId,
    ];

    /// Column name, also used as the form key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerField::Name => "name",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
            CustomerField::Company => "company",
            CustomerField::Designation => "designation",
            CustomerField::LinkedinUrl => "linkedin_url",
            CustomerField::InstagramId => "instagram_id",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CustomerField::Name => "Full Name",
            CustomerField::Email => "Email Address",
            CustomerField::Phone => "Phone Number",
            CustomerField::Company => "Company",
            CustomerField::Designation => "Designation",
            CustomerField::LinkedinUrl => "LinkedIn Profile URL",
            CustomerField::InstagramId => "Instagram ID",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, CustomerField::Name | CustomerField::Email)
    }

    /// Maximum length in characters, after trimming.
    pub fn max_len(&self) -> usize {
        match self {
            CustomerField::Name => 100,
            CustomerField::Email => 255,
            CustomerField::Phone => 20,
            CustomerField::Company => 100,
            CustomerField::Designation => 100,
            CustomerField::LinkedinUrl => 500,
            CustomerField::InstagramId => 50,
        }
    }

    pub fn format(&self) -> Option<FieldFormat> {
        match self {
            CustomerField::Email => Some(FieldFormat::Email),
            CustomerField::LinkedinUrl => Some(FieldFormat::Url),
            _ => None,
        }
    }

    pub fn required_message(&self) -> String {
        match self {
            CustomerField::Name => "Name is required".to_string(),
            CustomerField::Email => "Email is required".to_string(),
            other => format!("{} is required", other.label()),
        }
    }

    pub fn length_message(&self) -> &'static str {
        match self {
            CustomerField::Name => "Name must be less than 100 characters",
            CustomerField::Email => "Email must be less than 255 characters",
            CustomerField::Phone => "Phone must be less than 20 characters",
            CustomerField::Company => "Company must be less than 100 characters",
            CustomerField::Designation => "Designation must be less than 100 characters",
            CustomerField::LinkedinUrl => "URL must be less than 500 characters",
            CustomerField::InstagramId => "Instagram ID must be less than 50 characters",
        }
    }

    pub fn format_message(&self) -> Option<&'static str> {
        match self.format()? {
            FieldFormat::Email => Some("Invalid email address"),
            FieldFormat::Url => Some("Invalid URL"),
        }
    }

    /// Example value shown as a hint by the interactive shell.
    pub fn placeholder(&self) -> &'static str {
        match self {
            CustomerField::Name => "John Doe",
            CustomerField::Email => "john@example.com",
            CustomerField::Phone => "+1 (555) 123-4567",
            CustomerField::Company => "Acme Inc.",
            CustomerField::Designation => "Software Engineer",
            CustomerField::LinkedinUrl => "https://linkedin.com/in/johndoe",
            CustomerField::InstagramId => "@johndoe",
        }
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a form key does not name a customer field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown customer field: '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for CustomerField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        CustomerField::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
