//! Thin request layer over the hosted table store
//!
//! Rows live under `{base}/rest/v1/{table}`. Filters use the store's
//! `column=op.value` syntax and writes ask for the stored representation
//! back. Row ownership is enforced server-side from the bearer token.

use std::fmt::Display;

use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use ticktally_domain::{Result, StoreConfig, TickTallyError};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

/// `column=eq.value`
pub fn eq(value: impl Display) -> String {
    format!("eq.{value}")
}

/// `column=in.(a,b,c)`
pub fn in_list(ids: &[Uuid]) -> String {
    let joined: Vec<String> = ids.iter().map(Uuid::to_string).collect();
    format!("in.({})", joined.join(","))
}

pub struct RestClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl RestClient {
    /// Client for `config` with a single-attempt HTTP transport.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout()).build()?;
        Self::with_http(config, http)
    }

    pub fn with_http(config: &StoreConfig, http: HttpClient) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TickTallyError::Config("store.base_url must not be empty".into()));
        }
        if config.api_key.trim().is_empty() {
            return Err(TickTallyError::Config("store.api_key must not be empty".into()));
        }
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            access_token: RwLock::new(config.access_token.clone()),
        })
    }

    /// Swap the owner's session token after sign-in or refresh.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    pub fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{name}", self.base_url)
    }

    /// Rows of `table` matching every `(column, filter)` pair.
    #[instrument(skip(self, filters), fields(table = %table))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let request = self
            .request(Method::GET, &self.table_url(table))
            .query(&[("select", "*")])
            .query(filters);
        let rows: Vec<T> = self.json(request).await?;
        debug!(rows = rows.len(), "select complete");
        Ok(rows)
    }

    /// First row matching `filters`, if any.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<T>> {
        let mut filters = filters.to_vec();
        filters.push(("limit", "1".to_string()));
        Ok(self.select(table, &filters).await?.into_iter().next())
    }

    /// Insert one row and return it as stored.
    #[instrument(skip(self, body), fields(table = %table))]
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body);
        self.single_row(table, request).await
    }

    /// Insert rows, silently skipping ones that already exist.
    #[instrument(skip(self, body), fields(table = %table))]
    pub async fn insert_ignoring_duplicates<B>(&self, table: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", "return=minimal,resolution=ignore-duplicates")
            .json(body);
        self.expect_success(request).await
    }

    /// Patch the row with `id` and return it as stored.
    #[instrument(skip(self, body), fields(table = %table, %id))]
    pub async fn update<B, T>(&self, table: &str, id: Uuid, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::PATCH, &self.table_url(table))
            .query(&[("id", eq(id))])
            .header("Prefer", "return=representation")
            .json(body);
        self.single_row(table, request).await
    }

    /// Delete every row matching `filters`.
    #[instrument(skip(self, filters), fields(table = %table))]
    pub async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<()> {
        if filters.is_empty() {
            return Err(TickTallyError::InvalidInput(format!(
                "refusing unfiltered delete on {table}"
            )));
        }
        let request = self.request(Method::DELETE, &self.table_url(table)).query(filters);
        self.expect_success(request).await
    }

    /// Authorized request against an arbitrary URL of this store.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self.access_token.read().clone().unwrap_or_else(|| self.api_key.clone());
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    /// Send and decode a JSON body, mapping non-success statuses.
    pub async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.checked(request).await?;
        response.json::<T>().await.map_err(|err| TickTallyError::from(InfraError::from(err)))
    }

    async fn single_row<T: DeserializeOwned>(
        &self,
        table: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let rows: Vec<T> = self.json(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| TickTallyError::NotFound(format!("no {table} row was returned")))
    }

    async fn expect_success(&self, request: RequestBuilder) -> Result<()> {
        self.checked(request).await.map(|_| ())
    }

    async fn checked(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.http.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(%status, body = %body, "store request rejected");
        Err(status_error(status, &error_detail(status, &body)))
    }
}

/// Prefer the store's `message` field over the raw body.
fn error_detail(status: StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct StoreErrorBody {
        message: Option<String>,
    }

    match serde_json::from_str::<StoreErrorBody>(body) {
        Ok(StoreErrorBody { message: Some(message) }) => message,
        _ if status.is_server_error() => String::new(),
        _ => body.chars().take(200).collect(),
    }
}
