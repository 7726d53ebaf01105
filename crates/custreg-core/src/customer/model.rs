//! Customer domain model.
//!
//! `NewCustomer` is the validated insert payload; `Customer` is a stored row
//! as returned by the collaborator. Optional columns are `None` when absent,
//! never an empty string.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A validated customer ready to be inserted.
///
/// Serialises with absent optional fields as JSON `null`. `id` and
/// `created_at` are assigned by the store and therefore not present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_id: Option<String>,
}

/// A customer row as stored in the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub instagram_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Materialises a stored row from an insert payload.
    pub fn from_new(id: impl Into<String>, new: NewCustomer, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            designation: new.designation,
            linkedin_url: new.linkedin_url,
            instagram_id: new.instagram_id,
            created_at,
        }
    }

    /// Public profile link for the Instagram handle, first `@` stripped.
    pub fn instagram_profile_url(&self) -> Option<String> {
        self.instagram_id
            .as_deref()
            .map(|handle| format!("https://instagram.com/{}", handle.replacen('@', "", 1)))
    }

    /// Registration date in the local time zone, e.g. `Jan 5, 2025`.
    pub fn registered_on(&self) -> String {
        self.registered_on_in(&Local)
    }

    /// Registration date as seen in `tz`.
    pub fn registered_on_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.created_at
            .with_timezone(tz)
            .format("%b %-d, %Y")
            .to_string()
    }
}

/// Orders rows newest first.
///
/// The input is expected in insertion order. Rows sharing a `created_at`
/// come out most recently inserted first.
pub fn sort_recent_first(mut customers: Vec<Customer>) -> Vec<Customer> {
    customers.reverse();
    customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    customers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, secs: i64) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {id}"),
            email: format!("{id}@example.com"),
            phone: None,
            company: None,
            designation: None,
            linkedin_url: None,
            instagram_id: None,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_new_customer_serializes_nulls() {
        let new = NewCustomer {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            company: Some("Acme".to_string()),
            designation: None,
            linkedin_url: None,
            instagram_id: None,
        };
        let json = serde_json::to_value(&new).unwrap();
        assert!(json["phone"].is_null());
        assert_eq!(json["company"], "Acme");
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_deserialize_supabase_row() {
        let row = r#"{
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": null,
            "company": null,
            "designation": "CTO",
            "linkedin_url": null,
            "instagram_id": "@jane",
            "created_at": "2025-01-05T10:15:30.123456+00:00"
        }"#;
        let customer: Customer = serde_json::from_str(row).unwrap();
        assert_eq!(customer.designation.as_deref(), Some("CTO"));
        assert_eq!(customer.registered_on_in(&Utc), "Jan 5, 2025");
    }

    #[test]
    fn test_registered_on_uses_the_given_zone() {
        let mut c = customer("a", 0);
        c.created_at = Utc.with_ymd_and_hms(2025, 1, 5, 23, 30, 0).unwrap();
        assert_eq!(c.registered_on_in(&Utc), "Jan 5, 2025");

        let tokyo = chrono::FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(c.registered_on_in(&tokyo), "Jan 6, 2025");
        let honolulu = chrono::FixedOffset::west_opt(10 * 3600).unwrap();
        assert_eq!(c.registered_on_in(&honolulu), "Jan 5, 2025");

        assert_eq!(c.registered_on(), c.registered_on_in(&Local));
    }

    #[test]
    fn test_instagram_profile_url_strips_first_at() {
        let mut c = customer("a", 0);
        assert_eq!(c.instagram_profile_url(), None);
        c.instagram_id = Some("@jane".to_string());
        assert_eq!(
            c.instagram_profile_url().as_deref(),
            Some("https://instagram.com/jane")
        );
        c.instagram_id = Some("jane".to_string());
        assert_eq!(
            c.instagram_profile_url().as_deref(),
            Some("https://instagram.com/jane")
        );
    }

    #[test]
    fn test_sort_recent_first_breaks_ties_by_insertion() {
        let rows = vec![customer("a", 10), customer("b", 20), customer("c", 20), customer("d", 5)];
        let ids: Vec<_> = sort_recent_first(rows).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_sort_recent_first_is_stable_across_calls() {
        let rows = vec![customer("a", 1), customer("b", 1), customer("c", 2)];
        let first = sort_recent_first(rows.clone());
        let second = sort_recent_first(rows);
        assert_eq!(first, second);
    }
}
