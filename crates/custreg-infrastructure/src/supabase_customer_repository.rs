//! SupabaseCustomerRepository - PostgREST implementation of the customer table.
//!
//! Talks to `{url}/rest/v1/{table}` with the project's anon key.
//! The key is sent as both `apikey` and bearer token and is never logged.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Request, Response, Url};
use serde::Deserialize;
use std::time::Duration;

use custreg_core::config::SupabaseSettings;
use custreg_core::customer::{Customer, CustomerRepository, NewCustomer};
use custreg_core::error::{CustomerError, Result};

const REST_PATH: &str = "rest/v1";
/// `id` breaks ties so equal timestamps come back in the same order every time.
const ORDER_RECENT_FIRST: &str = "created_at.desc,id.desc";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Customer repository backed by a Supabase project.
#[derive(Clone)]
pub struct SupabaseCustomerRepository {
    client: Client,
    table_url: Url,
}

impl std::fmt::Debug for SupabaseCustomerRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseCustomerRepository")
            .field("table_url", &self.table_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseCustomerRepository {
    /// Creates a repository from connection settings.
    ///
    /// Fails with `CustomerError::Config` when the url or key is missing or
    /// the url does not parse.
    pub fn new(settings: &SupabaseSettings) -> Result<Self> {
        if !settings.is_configured() {
            return Err(CustomerError::config(
                "Supabase url and anon_key must be set in config.toml or SUPABASE_URL / SUPABASE_ANON_KEY",
            ));
        }
        if settings.table.trim().is_empty() {
            return Err(CustomerError::config("Supabase table name must not be empty"));
        }

        let table_url = Self::table_url(&settings.url, &settings.table)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .default_headers(Self::default_headers(&settings.anon_key)?)
            .build()
            .map_err(|e| CustomerError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, table_url })
    }

    /// Resolves `{base}/rest/v1/{table}`.
    pub fn table_url(base: &str, table: &str) -> Result<Url> {
        let raw = format!("{}/{}/{}", base.trim().trim_end_matches('/'), REST_PATH, table.trim());
        let url = Url::parse(&raw)
            .map_err(|e| CustomerError::config(format!("Invalid Supabase url '{base}': {e}")))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(CustomerError::config(format!(
                "Supabase url must be http(s): '{base}'"
            )));
        }
        Ok(url)
    }

    fn default_headers(api_key: &str) -> Result<HeaderMap> {
        let invalid = |_| CustomerError::config("Supabase anon_key contains invalid header characters");

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).map_err(invalid)?;
        key.set_sensitive(true);
        headers.insert("apikey", key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(invalid)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Builds the insert request without sending it.
    pub fn build_insert_request(&self, customer: &NewCustomer) -> Result<Request> {
        self.client
            .post(self.table_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(customer)
            .build()
            .map_err(CustomerError::from)
    }

    /// Builds the list request without sending it.
    pub fn build_list_request(&self) -> Result<Request> {
        self.client
            .get(self.table_url.clone())
            .query(&[("select", "*"), ("order", ORDER_RECENT_FIRST)])
            .build()
            .map_err(CustomerError::from)
    }

    /// Converts a non-success response into a `Remote` error.
    async fn error_from_response(response: Response) -> CustomerError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());

        let (message, code) = match serde_json::from_str::<PostgrestError>(&body) {
            Ok(parsed) => (parsed.message.unwrap_or_else(|| body.clone()), parsed.code),
            Err(_) => (body, None),
        };

        tracing::warn!(
            status = status.as_u16(),
            code = code.as_deref().unwrap_or("-"),
            "Customer table request rejected: {}",
            message
        );
        CustomerError::remote(status.as_u16(), message)
    }
}

#[async_trait]
impl CustomerRepository for SupabaseCustomerRepository {
    async fn insert(&self, customer: &NewCustomer) -> Result<()> {
        let request = self.build_insert_request(customer)?;
        tracing::debug!(url = %self.table_url, "Inserting customer");

        let response = self.client.execute(request).await.map_err(|e| {
            CustomerError::transport(format!("Customer insert request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        tracing::info!("Customer inserted");
        Ok(())
    }

    async fn list_recent_first(&self) -> Result<Vec<Customer>> {
        let request = self.build_list_request()?;
        tracing::debug!(url = %self.table_url, "Querying customers");

        let response = self.client.execute(request).await.map_err(|e| {
            CustomerError::transport(format!("Customer list request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CustomerError::transport(format!("Failed to read customer list: {e}")))?;
        let customers: Vec<Customer> = serde_json::from_slice(&body)?;

        tracing::debug!(count = customers.len(), "Customers loaded");
        Ok(customers)
    }
}
