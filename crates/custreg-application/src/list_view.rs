//! Display model for the customer list.
//!
//! Turns a [`ListSnapshot`] into display strings: absent values become an
//! em dash, Instagram handles carry their profile link, dates use the short
//! month format. Front-ends only add colour.

use custreg_core::customer::Customer;

use crate::customer_list_loader::ListSnapshot;

pub const ABSENT: &str = "—";
pub const TITLE: &str = "Registered Customers";
pub const LOADING: &str = "Loading customers...";
pub const EMPTY: &str = "No customers registered yet";
pub const EMPTY_HINT: &str = "Add your first customer using the form";

pub const COLUMNS: [&str; 8] = [
    "Name",
    "Email",
    "Phone",
    "Company",
    "Designation",
    "LinkedIn",
    "Instagram",
    "Registered",
];

/// `1 customer registered`, `3 customers registered`.
pub fn count_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} customer{plural} registered")
}

fn or_absent(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => ABSENT.to_string(),
    }
}

/// One table row, every cell already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub cells: [String; 8],
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        let instagram = match (c.instagram_id.as_deref(), c.instagram_profile_url()) {
            (Some(handle), Some(url)) if !handle.is_empty() => format!("{handle} ({url})"),
            _ => ABSENT.to_string(),
        };
        Self {
            cells: [
                c.name.clone(),
                c.email.clone(),
                or_absent(c.phone.as_deref()),
                or_absent(c.company.as_deref()),
                or_absent(c.designation.as_deref()),
                or_absent(c.linkedin_url.as_deref()),
                instagram,
                c.registered_on(),
            ],
        }
    }
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Loading,
    Empty,
    Rows(Vec<CustomerRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerListView {
    pub summary: String,
    pub body: ListBody,
}

impl CustomerListView {
    pub fn from_snapshot(snapshot: &ListSnapshot) -> Self {
        let body = if snapshot.loading {
            ListBody::Loading
        } else if snapshot.customers.is_empty() {
            ListBody::Empty
        } else {
            ListBody::Rows(snapshot.customers.iter().map(CustomerRow::from).collect())
        };
        Self {
            summary: count_label(snapshot.customers.len()),
            body,
        }
    }

    /// Renders the body as an aligned plain-text table.
    pub fn render_body(&self) -> String {
        match &self.body {
            ListBody::Loading => LOADING.to_string(),
            ListBody::Empty => format!("{EMPTY}\n{EMPTY_HINT}"),
            ListBody::Rows(rows) => render_table(rows),
        }
    }
}

fn render_table(rows: &[CustomerRow]) -> String {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &mut dyn Iterator<Item = &str>| -> String {
        cells
            .zip(widths.iter())
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(&mut COLUMNS.iter().copied()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(line(&mut row.cells.iter().map(String::as_str)));
    }
    out.join("\n")
}
