//! HTTP row source

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::ACCEPT;
use url::Url;

use super::PageRequest;
use super::RowSource;
use crate::error::ApiError;
use crate::error::Result;
use crate::model::Row;

/// Default backend the table widgets talk to.
pub const DEFAULT_BASE_URL: &str = "https://course-js.javascript.ru";

/// Row source backed by a JSON HTTP endpoint.
///
/// Each request is a `GET` on `{base_url}/{path}` with the sort, window and
/// filter parameters in the query string. The response body must be a JSON
/// array of row objects.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```
/// use sortable_table::source::HttpRowSource;
///
/// let source = HttpRowSource::builder("api/rest/products")
///     .timeout(std::time::Duration::from_secs(10))
///     .build()
///     .unwrap();
/// assert_eq!(source.endpoint().as_str(), "https://course-js.javascript.ru/api/rest/products");
/// ```
#[derive(Clone)]
pub struct HttpRowSource {
    inner: Arc<HttpRowSourceInner>,
}

struct HttpRowSourceInner {
    endpoint: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpRowSource {
    /// Creates a builder for a resource path on the default backend.
    pub fn builder(path: impl Into<String>) -> HttpRowSourceBuilder {
        HttpRowSourceBuilder::new(path)
    }

    /// Returns the endpoint URL without query parameters.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Builds the full request URL for a page request.
    pub fn request_url(&self, request: &PageRequest) -> Url {
        let mut url = self.inner.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        url
    }
}

#[async_trait]
impl RowSource for HttpRowSource {
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Row>> {
        let url = self.request_url(request);
        debug!("GET {}", url);

        let mut builder = self
            .inner
            .http_client
            .get(url)
            .header(ACCEPT, "application/json");

        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.network_error(e))?;

        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), body).into());
        }

        let rows: Vec<Row> = serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))?;
        Ok(rows)
    }
}

impl HttpRowSource {
    fn network_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

/// Builder for [`HttpRowSource`].
pub struct HttpRowSourceBuilder {
    base_url: String,
    path: String,
    timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpRowSourceBuilder {
    /// Creates a builder for a resource path on the default backend.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: path.into(),
            timeout: None,
            http_client: None,
        }
    }

    /// Sets the backend base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses an existing HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the source.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidUrl`] if the base URL and path do not form a URL.
    pub fn build(self) -> std::result::Result<HttpRowSource, ApiError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        let endpoint = base
            .join(self.path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.path, e)))?;

        Ok(HttpRowSource {
            inner: Arc::new(HttpRowSourceInner {
                endpoint,
                http_client: self.http_client.unwrap_or_default(),
                timeout: self.timeout,
            }),
        })
    }
}
