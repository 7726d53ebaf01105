//! Customer form validation.
//!
//! A pure function from raw input to either a normalized [`NewCustomer`] or
//! the first violated constraint per field. Checks run in a fixed order for
//! every field: required, then length, then format.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::field::{CustomerField, FieldFormat};
use super::form::CustomerForm;
use super::model::NewCustomer;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_%+'-]+(?:\.[A-Za-z0-9_%+'-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// First violated message per field, ordered by field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<CustomerField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CustomerField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CustomerField) -> bool {
        self.0.contains_key(&field)
    }

    /// Records the message for a field, replacing any previous one.
    pub fn insert(&mut self, field: CustomerField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: CustomerField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CustomerField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Outcome of validating a whole form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(NewCustomer),
    /// Never empty.
    Invalid(FieldErrors),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn into_result(self) -> Result<NewCustomer, FieldErrors> {
        match self {
            Validation::Valid(customer) => Ok(customer),
            Validation::Invalid(errors) => Err(errors),
        }
    }
}

/// Validates one field in isolation.
///
/// Returns the trimmed value (`None` when blank and optional), or the
/// message of the first violated constraint.
pub fn validate_field(field: CustomerField, raw: &str) -> Result<Option<String>, String> {
    let value = raw.trim();

    if value.is_empty() {
        if field.is_required() {
            return Err(field.required_message());
        }
        return Ok(None);
    }

    // A badly shaped email or URL reports the format error whatever its length.
    if let Some(format) = field.format() {
        let ok = match format {
            FieldFormat::Email => EMAIL_RE.is_match(value),
            FieldFormat::Url => reqwest::Url::parse(value).is_ok(),
        };
        if !ok {
            // format() and format_message() are defined for the same fields
            let message = field.format_message().unwrap_or("Invalid value");
            return Err(message.to_string());
        }
    }

    if value.chars().count() > field.max_len() {
        return Err(field.length_message().to_string());
    }

    Ok(Some(value.to_string()))
}

/// Validates every field of the form.
pub fn validate(form: &CustomerForm) -> Validation {
    let mut errors = FieldErrors::new();
    let mut values: BTreeMap<CustomerField, Option<String>> = BTreeMap::new();

    for (field, raw) in form.entries() {
        match validate_field(field, raw) {
            Ok(value) => {
                values.insert(field, value);
            }
            Err(message) => errors.insert(field, message),
        }
    }

    if !errors.is_empty() {
        return Validation::Invalid(errors);
    }

    let mut take = |field: CustomerField| values.remove(&field).flatten();
    let name = take(CustomerField::Name);
    let email = take(CustomerField::Email);
    match (name, email) {
        (Some(name), Some(email)) => Validation::Valid(NewCustomer {
            name,
            email,
            phone: take(CustomerField::Phone),
            company: take(CustomerField::Company),
            designation: take(CustomerField::Designation),
            linkedin_url: take(CustomerField::LinkedinUrl),
            instagram_id: take(CustomerField::InstagramId),
        }),
        // Required fields never validate to None
        (name, _) => {
            let mut errors = FieldErrors::new();
            let missing = if name.is_none() {
                CustomerField::Name
            } else {
                CustomerField::Email
            };
            errors.insert(missing, missing.required_message());
            Validation::Invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str) -> CustomerForm {
        CustomerForm {
            name: name.to_string(),
            email: email.to_string(),
            ..CustomerForm::default()
        }
    }

    fn errors_of(form: &CustomerForm) -> FieldErrors {
        match validate(form) {
            Validation::Invalid(errors) => errors,
            Validation::Valid(c) => panic!("expected errors, got {c:?}"),
        }
    }

    #[test]
    fn test_blank_name_is_required_error() {
        for name in ["", "   ", "\t\n"] {
            let errors = errors_of(&form(name, "jane@example.com"));
            assert_eq!(errors.get(CustomerField::Name), Some("Name is required"));
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_long_name_is_length_error() {
        let errors = errors_of(&form(&"a".repeat(101), "not-an-email"));
        assert_eq!(
            errors.get(CustomerField::Name),
            Some("Name must be less than 100 characters")
        );
        assert_eq!(errors.iter().next().map(|(f, _)| f), Some(CustomerField::Name));
        assert_eq!(errors.get(CustomerField::Email), Some("Invalid email address"));
    }

    #[test]
    fn test_name_boundary_is_inclusive() {
        assert!(validate(&form(&"a".repeat(100), "jane@example.com")).is_valid());
        // trimmed before counting
        assert!(validate(&form(&format!("  {}  ", "a".repeat(100)), "jane@example.com")).is_valid());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(validate(&form(&"é".repeat(100), "jane@example.com")).is_valid());
    }

    #[test]
    fn test_malformed_emails() {
        for email in [
            "jane",
            "jane@",
            "@example.com",
            "jane@example",
            "jane@@example.com",
            "jane doe@example.com",
            "jane..doe@example.com",
            ".jane@example.com",
            "jane@-example.com",
            "jane@example.c",
        ] {
            let errors = errors_of(&form("Jane", email));
            assert_eq!(
                errors.get(CustomerField::Email),
                Some("Invalid email address"),
                "{email}"
            );
        }
    }

    #[test]
    fn test_well_formed_emails() {
        for email in [
            "jane@example.com",
            "jane.doe+crm@mail.example.co.uk",
            "o'neil@example.ie",
            "  JANE@EXAMPLE.COM  ",
        ] {
            assert!(validate(&form("Jane", email)).is_valid(), "{email}");
        }
    }

    #[test]
    fn test_blank_email_is_required_error() {
        let errors = errors_of(&form("Jane", "  "));
        assert_eq!(errors.get(CustomerField::Email), Some("Email is required"));
    }

    #[test]
    fn test_malformed_email_reports_format_regardless_of_length() {
        let errors = errors_of(&form("Jane", &"a".repeat(300)));
        assert_eq!(errors.get(CustomerField::Email), Some("Invalid email address"));
        assert_eq!(
            validate_field(CustomerField::Email, &format!("{}@", "a".repeat(260))),
            Err("Invalid email address".to_string())
        );
    }

    #[test]
    fn test_well_formed_long_email_reports_length() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_field(CustomerField::Email, &email),
            Err("Email must be less than 255 characters".to_string())
        );
    }

    #[test]
    fn test_malformed_url_reports_format_regardless_of_length() {
        assert_eq!(
            validate_field(CustomerField::LinkedinUrl, &"x".repeat(600)),
            Err("Invalid URL".to_string())
        );
        let long_url = format!("https://linkedin.com/in/{}", "j".repeat(500));
        assert_eq!(
            validate_field(CustomerField::LinkedinUrl, &long_url),
            Err("URL must be less than 500 characters".to_string())
        );
    }

    #[test]
    fn test_optional_fields_normalized_to_none() {
        let mut input = form("  Jane Doe ", " jane@example.com ");
        input.phone = "   ".to_string();
        input.company = " Acme ".to_string();
        let customer = validate(&input).into_result().unwrap();
        assert_eq!(customer.name, "Jane Doe");
        assert_eq!(customer.email, "jane@example.com");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.company.as_deref(), Some("Acme"));
        assert_eq!(customer.designation, None);
        assert_eq!(customer.linkedin_url, None);
        assert_eq!(customer.instagram_id, None);
    }

    #[test]
    fn test_optional_length_limits() {
        let mut input = form("Jane", "jane@example.com");
        input.phone = "1".repeat(21);
        input.instagram_id = "i".repeat(51);
        input.designation = "d".repeat(100);
        let errors = errors_of(&input);
        assert_eq!(
            errors.get(CustomerField::Phone),
            Some("Phone must be less than 20 characters")
        );
        assert_eq!(
            errors.get(CustomerField::InstagramId),
            Some("Instagram ID must be less than 50 characters")
        );
        assert!(!errors.contains(CustomerField::Designation));
    }

    #[test]
    fn test_linkedin_url() {
        assert_eq!(
            validate_field(CustomerField::LinkedinUrl, "linkedin.com/in/jane"),
            Err("Invalid URL".to_string())
        );
        assert_eq!(
            validate_field(CustomerField::LinkedinUrl, " https://linkedin.com/in/jane "),
            Ok(Some("https://linkedin.com/in/jane".to_string()))
        );
        let long = format!("https://linkedin.com/in/{}", "j".repeat(480));
        assert_eq!(
            validate_field(CustomerField::LinkedinUrl, &long),
            Err("URL must be less than 500 characters".to_string())
        );
    }

    #[test]
    fn test_field_errors_serialize_by_column_name() {
        let errors = errors_of(&form("", "x"));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"], "Name is required");
        assert_eq!(json["email"], "Invalid email address");
    }
}
