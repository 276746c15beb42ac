use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use ticktally_domain::constants::DEFAULT_STORE_TIMEOUT_SECS;
use ticktally_domain::TickTallyError;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP transport for the hosted store.
///
/// Every request is sent exactly once; store writes are not idempotent.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout and user agent.
    pub fn new() -> Result<Self, TickTallyError> {
        Self::builder().build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder` once.
    ///
    /// Transport failures become domain errors. Non-success statuses are
    /// returned as responses for the caller to map.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TickTallyError> {
        let request = builder.build().map_err(into_domain)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(into_domain(err))
            }
        }
    }
}

#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            user_agent: concat!("ticktally/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, TickTallyError> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(self.user_agent).no_proxy();
        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }
        let client = builder.build().map_err(into_domain)?;
        Ok(HttpClient { client })
    }
}

fn into_domain(err: reqwest::Error) -> TickTallyError {
    InfraError::from(err).into()
}
