//! Feed fetching.
//!
//! The supplier exposes one delimited export covering both catalog data and
//! stock levels. The fetcher authenticates with the same Basic-Auth pair as
//! the order API plus the access key embedded as a query parameter, and
//! hands the body to the parser. Feed payloads can be large, so the fetch
//! timeout is much longer than the order-call one.

mod parser;

pub use parser::{Column, FeedRow, ParsedFeed, RowError};

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;

use crate::config::SupplierConfig;
use crate::diag::DiagnosticLog;

/// Timeout for a full-feed fetch.
const FEED_FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors that can occur fetching or validating the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Feed URL or credentials are empty; checked before any network I/O.
    #[error("feed URL or API credentials are missing in settings")]
    Config,

    /// The HTTP call itself could not complete.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 response status.
    #[error("feed fetch failed with HTTP {0}")]
    Http(u16),

    /// Empty body or absent header row.
    #[error("feed response is empty or has no header row")]
    Empty,

    /// Required columns are missing for the requested operation; the whole
    /// run aborts, there is no best-effort mode.
    #[error("feed is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
}

/// Fetches and parses the supplier's product/stock feed.
pub struct FeedClient {
    http: reqwest::Client,
    feed_base_url: String,
    api_key: SecretString,
    password: SecretString,
    diag: DiagnosticLog,
}

impl FeedClient {
    /// Create a feed client from injected configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &SupplierConfig, diag: DiagnosticLog) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(FEED_FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            feed_base_url: config.feed_base_url.clone(),
            api_key: config.api_key.clone(),
            password: config.password.clone(),
            diag,
        })
    }

    /// Fetch the export and parse it. The header mapping is computed once
    /// here and reused for every row of this fetch.
    ///
    /// # Errors
    ///
    /// See [`FeedError`]; schema validation is the consumer's call via
    /// [`ParsedFeed::require_columns`], since import and stock runs require
    /// different columns.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<ParsedFeed, FeedError> {
        let key = self.api_key.expose_secret();
        let password = self.password.expose_secret();
        if self.feed_base_url.is_empty() || key.is_empty() || password.is_empty() {
            self.diag
                .log("API Key or Password is missing. Aborting feed fetch.");
            return Err(FeedError::Config);
        }

        let endpoint = format!("{}/export-products", self.feed_base_url);
        self.diag
            .log(format!("Fetching product feed from URL: {endpoint}"));
        self.diag
            .log_sensitive(|| format!("Feed access key: {key}"));

        let basic = BASE64.encode(format!("{key}:{password}"));
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Basic {basic}"))
                .map_err(|_| FeedError::Config)?,
        );

        let response = self
            .http
            .get(&endpoint)
            .query(&[("key", key), ("data", "all")])
            .headers(headers)
            .send()
            .await
            .inspect_err(|e| self.diag.log(format!("Failed to fetch feed: {e}")))?;

        let status = response.status();
        self.diag
            .log(format!("Received HTTP Status Code: {}", status.as_u16()));
        if status != StatusCode::OK {
            self.diag.log(format!(
                "Failed to fetch feed. HTTP Status Code: {}.",
                status.as_u16()
            ));
            return Err(FeedError::Http(status.as_u16()));
        }

        let body = response.text().await?;
        self.diag
            .log(format!("Feed response size: {} bytes.", body.len()));
        if body.trim().is_empty() {
            self.diag.log("Feed response is empty. Aborting.");
            return Err(FeedError::Empty);
        }

        ParsedFeed::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::testing::test_config;

    async fn client_for(server: &MockServer, diag: DiagnosticLog) -> FeedClient {
        let mut config = test_config();
        config.feed_base_url = server.uri();
        FeedClient::new(&config, diag).unwrap()
    }

    #[tokio::test]
    async fn fetch_parses_feed_and_passes_access_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export-products"))
            .and(query_param("key", "test-key"))
            .and(query_param("data", "all"))
            .and(header_exists("Authorization"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("sku,name,price,stock\nA1,Lamp,10,4\n"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, DiagnosticLog::disabled()).await;
        let feed = client.fetch().await.unwrap();
        assert_eq!(feed.len(), 1);
        assert!(feed.has_column(Column::Stock));
    }

    #[tokio::test]
    async fn non_200_surfaces_status_and_logs_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let diag = DiagnosticLog::in_memory(false);
        let client = client_for(&server, diag.clone()).await;
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Http(403)));
        assert!(diag.contents().unwrap().contains("403"));
    }

    #[tokio::test]
    async fn empty_body_is_an_empty_feed_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("   "))
            .mount(&server)
            .await;

        let client = client_for(&server, DiagnosticLog::disabled()).await;
        assert!(matches!(client.fetch().await, Err(FeedError::Empty)));
    }

    #[tokio::test]
    async fn missing_credentials_never_hit_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = test_config();
        config.feed_base_url = server.uri();
        config.api_key = SecretString::from("");
        let client = FeedClient::new(&config, DiagnosticLog::disabled()).unwrap();
        assert!(matches!(client.fetch().await, Err(FeedError::Config)));
    }
}
