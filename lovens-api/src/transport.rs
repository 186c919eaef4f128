//! HTTP transport.
//!
//! The session and the login flow describe requests as plain `HttpRequest`
//! values and hand them to a `Transport`. `HttpTransport` is the reqwest-backed
//! implementation; tests substitute their own.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::trace;

use lovens_core::config::ApiConfig;
use lovens_core::constants;
use lovens_core::error::{LvError, LvResult};

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON with `Content-Type: application/json`.
    Json(Value),
    /// URL-encoded form.
    Form(Vec<(String, String)>),
    /// Pre-serialized body with an explicit content type.
    Raw { content_type: String, body: String },
}

/// A fully described outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL without query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// First query value for `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First header value for `key` (case-insensitive).
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response carrying `value` as JSON.
    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON. An empty body decodes to `null`.
    pub fn parse_json(&self) -> LvResult<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
            .map_err(|e| LvError::Serialization(format!("failed to parse response: {e}")))
    }

    /// Best human-readable message in the body: a JSON `message` or `error`
    /// field, else the raw text.
    pub fn server_message(&self) -> String {
        let from_json = serde_json::from_str::<Value>(&self.body).ok().and_then(|v| {
            ["message", "error_description", "error", "__type"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(String::from))
        });
        match from_json {
            Some(message) => message,
            None if self.body.trim().is_empty() => format!("server returned status {}", self.status),
            None => self.body.trim().to_string(),
        }
    }
}

/// Performs one HTTP exchange. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> LvResult<HttpResponse>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
}

impl HttpTransport {
    /// Create a transport with the timeouts from `config`.
    pub fn new(config: &ApiConfig) -> LvResult<Self> {
        let inner = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(constants::user_agent())
            .build()
            .map_err(|e| LvError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    /// Wrap an existing reqwest client, e.g. one configured with a proxy.
    pub fn from_client(inner: Client) -> Self {
        Self { inner }
    }

    /// Classify a reqwest error into an LvError variant.
    fn classify_error(e: reqwest::Error) -> LvError {
        if e.is_timeout() {
            LvError::Timeout(e.to_string())
        } else if e.is_connect() {
            LvError::Http(format!("connection failed: {e}"))
        } else {
            LvError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> LvResult<HttpResponse> {
        let mut builder = self.inner.request(request.method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(pairs)) => builder.form(&pairs),
            Some(RequestBody::Raw { content_type, body }) => {
                builder.header(CONTENT_TYPE, content_type).body(body)
            }
        };

        let response = builder.send().await.map_err(Self::classify_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::classify_error)?;
        trace!("response status {status}, {} bytes", body.len());

        Ok(HttpResponse { status, body })
    }
}
