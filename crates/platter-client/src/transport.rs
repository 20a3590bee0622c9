//! # HTTP Transport
//!
//! The single request sender every store goes through.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Store action                                                           │
//! │     │  ApiRequest::post("user/login").json(&input)?                     │
//! │     ▼                                                                   │
//! │  Transport::send ─────────────────────────────────────────────────────► │
//! │     │   base_url + escaped path segments                                │
//! │     │   cookie jar attached (credentials on every request)              │
//! │     ▼                                                                   │
//! │  Response                                                               │
//! │     ├── JSON object body (any status) ──► Ok(Value)  → Envelope         │
//! │     ├── non-2xx, no JSON object      ──► Err(Status)                    │
//! │     ├── 2xx, not a JSON object       ──► Err(Decode)                    │
//! │     └── no response at all           ──► Err(Transport)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A non-2xx response that still carries a JSON envelope is handed back so
//! the store can surface the server's message.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Request
// =============================================================================

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
        }
    }
}

/// A request relative to the API base address.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,

    /// Path segments, escaped individually when the URL is built.
    pub segments: Vec<String>,

    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: &str) -> Self {
        ApiRequest {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            body: None,
        }
    }

    /// `GET <path>`.
    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    /// `POST <path>`.
    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    /// `PUT <path>`.
    pub fn put(path: &str) -> Self {
        Self::new(Method::Put, path)
    }

    /// Appends one path segment taken verbatim; `/` and friends are escaped.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Attaches a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// The unescaped path, for logs and test matching.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends API requests and returns the decoded JSON body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ClientResult<Value>;
}

/// Access to the authentication cookie so it can outlive the process.
pub trait SessionJar: Send + Sync {
    /// Cookies the API would receive, as a `Cookie` header value.
    fn session_cookies(&self) -> Option<String>;

    /// Re-installs cookies previously returned by [`session_cookies`](Self::session_cookies).
    fn restore_session(&self, cookies: &str);
}

// =============================================================================
// reqwest Transport
// =============================================================================

/// [`Transport`] over `reqwest` with a shared cookie jar.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Creates a transport for the API rooted at `base_url`.
    pub fn new(base_url: Url) -> ClientResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(HttpTransport {
            client,
            base_url,
            jar,
        })
    }

    /// The API base address.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base address.
    pub fn endpoint(&self, segments: &[String]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<Value> {
        let url = self.endpoint(&request.segments)?;
        debug!(method = %request.method, path = %request.path(), "Sending API request");

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) if body.is_object() => {
                if !status.is_success() {
                    debug!(status = status.as_u16(), path = %request.path(), "Error response with envelope");
                }
                Ok(body)
            }
            _ if !status.is_success() => {
                warn!(status = status.as_u16(), path = %request.path(), "Error response without envelope");
                Err(ClientError::Status {
                    status: status.as_u16(),
                })
            }
            Ok(_) => Err(ClientError::Decode("expected a JSON object".into())),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionJar for HttpTransport {
    fn session_cookies(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        header.to_str().ok().map(str::to_string)
    }

    fn restore_session(&self, cookies: &str) {
        for cookie in cookies.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &self.base_url);
        }
    }
}
