//! Raw form input.

use super::field::{CustomerField, UnknownField};
use serde::{Deserialize, Serialize};

/// Raw, untrimmed input for every customer field.
///
/// `Default` is the all-empty form the registration workflow resets to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub instagram_id: String,
}

impl CustomerForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a form from `(key, value)` pairs. Keys are field names.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, UnknownField>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let field: CustomerField = key.as_ref().parse()?;
            form.set(field, value);
        }
        Ok(form)
    }

    pub fn get(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::Email => &self.email,
            CustomerField::Phone => &self.phone,
            CustomerField::Company => &self.company,
            CustomerField::Designation => &self.designation,
            CustomerField::LinkedinUrl => &self.linkedin_url,
            CustomerField::InstagramId => &self.instagram_id,
        }
    }

    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CustomerField::Name => self.name = value,
            CustomerField::Email => self.email = value,
            CustomerField::Phone => self.phone = value,
            CustomerField::Company => self.company = value,
            CustomerField::Designation => self.designation = value,
            CustomerField::LinkedinUrl => self.linkedin_url = value,
            CustomerField::InstagramId => self.instagram_id = value,
        }
    }

    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        CustomerField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Fields in declaration order with their raw values.
    pub fn entries(&self) -> impl Iterator<Item = (CustomerField, &str)> {
        CustomerField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}
