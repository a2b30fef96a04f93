//! Superball order API client.
//!
//! Authentication is Basic-Auth (access key + password) plus the vendor's
//! `X-Access-Key` header. Credentials travel only in headers; the client
//! additionally strips credential-like keys from the request body before
//! sending, in case a payload ever grows them by accident.
//!
//! Every request and response is recorded to the diagnostic log before the
//! outcome is decided.

mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use superball_core::SupplierOrderId;

use crate::config::SupplierConfig;
use crate::diag::DiagnosticLog;

/// Timeout for single-order API calls. Feed fetches use a longer one.
const ORDER_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when calling the order API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Access key or password is empty; checked before any network I/O.
    #[error("access key or password is missing in settings")]
    Config,

    /// The HTTP call itself could not complete (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 status on a read call.
    #[error("supplier API returned HTTP {0}")]
    Http(u16),

    /// The supplier reported a failure (non-200 on create, or a falsy
    /// `is_success` flag), with its message where one was given.
    #[error("supplier API error: {0}")]
    Api(String),

    /// A success response was missing expected fields.
    #[error("invalid supplier response: {0}")]
    Parse(String),
}

/// Client for the supplier's customer-order endpoints.
///
/// Cheap to clone. Holds the injected configuration; nothing is read from
/// ambient state at call time.
#[derive(Clone)]
pub struct SupplierApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    password: SecretString,
    is_testing: bool,
    diag: DiagnosticLog,
}

impl SupplierApiClient {
    /// Create a client from injected configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &SupplierConfig, diag: DiagnosticLog) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(ORDER_CALL_TIMEOUT)
            .build()?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.api_base_url.clone(),
                api_key: config.api_key.clone(),
                password: config.password.clone(),
                is_testing: config.is_testing,
                diag,
            }),
        })
    }

    /// Whether orders should be flagged `use_for_testing`.
    #[must_use]
    pub fn is_testing(&self) -> bool {
        self.inner.is_testing
    }

    /// Send an order-create request.
    ///
    /// Success requires both HTTP 200 and a truthy `is_success` flag;
    /// returns the supplier-assigned order id from the success payload.
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] on empty credentials, [`ApiError::Transport`]
    /// when the call cannot complete, [`ApiError::Api`] when the supplier
    /// rejects the order.
    #[instrument(skip_all, fields(external_id = %payload.id_customer_order_external))]
    pub async fn send_order(
        &self,
        payload: &SupplierOrderPayload,
    ) -> Result<SupplierOrderId, ApiError> {
        let inner = &*self.inner;
        let endpoint = format!("{}/customer-order/create", inner.base_url);
        inner.diag.log(format!(
            "Sending order ID: {}",
            payload.id_customer_order_external
        ));
        inner.diag.log(format!("API Endpoint: {endpoint}"));
        inner.diag.log_sensitive(|| {
            format!(
                "Access Key: {} / Password: {}",
                inner.api_key.expose_secret(),
                inner.password.expose_secret()
            )
        });

        let headers = self.auth_headers()?;

        // Credentials belong only in headers; drop any credential-like keys
        // that might ever leak into the serialized body.
        let mut body = serde_json::to_value(payload)
            .map_err(|e| ApiError::Parse(format!("payload serialization failed: {e}")))?;
        if let Value::Object(map) = &mut body {
            map.remove("access_key");
            map.remove("password");
        }
        inner.diag.log(format!("Request Body: {body}"));

        let response = inner
            .http
            .post(&endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| inner.diag.log(format!("API Request Failed: {e}")))?;

        let status = response.status();
        let text = response.text().await?;
        inner.diag.log(format!("API Response Code: {status}"));
        inner.diag.log(format!("API Response Body: {text}"));

        // Tolerant decode: a non-JSON error page still maps to an API error
        // carrying the fallback message.
        let envelope: ApiEnvelope = serde_json::from_str(&text).unwrap_or(ApiEnvelope {
            is_success: false,
            message: None,
            data: None,
        });

        if status == StatusCode::OK && envelope.is_success {
            envelope
                .supplier_order_id()
                .map(SupplierOrderId::new)
                .ok_or_else(|| {
                    ApiError::Parse("success response is missing data.id_customer_order".into())
                })
        } else {
            Err(ApiError::Api(envelope.message.unwrap_or_else(|| {
                format!("API responded with an error (HTTP {})", status.as_u16())
            })))
        }
    }

    /// Read an order back from the supplier.
    ///
    /// Returns the raw `data` payload; callers render it as needed.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`] carries the status code of a non-200 response;
    /// [`ApiError::Api`] carries the supplier's message when the flag is
    /// falsy on a 200.
    #[instrument(skip(self), fields(supplier_order_id = %id))]
    pub async fn fetch_order(&self, id: &SupplierOrderId) -> Result<Value, ApiError> {
        let inner = &*self.inner;
        let endpoint = format!("{}/customer-order/read", inner.base_url);
        let headers = self.auth_headers()?;

        let response = inner
            .http
            .get(&endpoint)
            .query(&[("id_customer_order", id.as_str())])
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            inner.diag.log(format!(
                "Failed to retrieve Superball Order ID {id}. HTTP Status Code: {}.",
                status.as_u16()
            ));
            return Err(ApiError::Http(status.as_u16()));
        }

        let envelope: ApiEnvelope = response.json().await?;
        if envelope.is_success {
            Ok(envelope.data.unwrap_or(Value::Null))
        } else {
            let message = envelope.message.unwrap_or_else(|| "Unknown error.".into());
            inner
                .diag
                .log(format!("Failed to retrieve Superball Order ID {id}: {message}"));
            Err(ApiError::Api(message))
        }
    }

    /// Basic-Auth plus the vendor access-key header.
    ///
    /// Fails with [`ApiError::Config`] before any network call when either
    /// credential is empty.
    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let inner = &*self.inner;
        let key = inner.api_key.expose_secret();
        let password = inner.password.expose_secret();
        if key.is_empty() || password.is_empty() {
            inner
                .diag
                .log("Access key or password is missing in settings.");
            return Err(ApiError::Config);
        }

        let basic = BASE64.encode(format!("{key}:{password}"));
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Basic {basic}"))
                .map_err(|e| ApiError::Parse(format!("invalid credential bytes: {e}")))?,
        );
        headers.insert(
            "X-Access-Key",
            HeaderValue::from_str(key)
                .map_err(|e| ApiError::Parse(format!("invalid credential bytes: {e}")))?,
        );
        Ok(headers)
    }
}
