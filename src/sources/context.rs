//! HTTP transport shared by all sources.
//!
//! `ConnectionPool` wraps a blocking reqwest client with connection pooling,
//! retry/backoff, and the synthetic-response convention: transport-level
//! failures never panic and never become typed errors here; they surface as
//! a response with status [`SYNTHETIC_ERROR_CODE`] carrying the error text,
//! which each source turns into its own failure message.
//!
//! One pool is owned by one `Collector` and handed to every source it builds
//! as `Arc<dyn Transport>`. The pool is not thread-safe by policy: callers
//! that need concurrency own independent collectors (and therefore pools).

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, warn};
use url::Url;

use crate::error::Result;
use crate::utils::RateLimiter;

/// Status code of a synthetic response produced when the transport gives up.
pub const SYNTHETIC_ERROR_CODE: u16 = 599;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
const BACKOFF_FACTOR: f64 = 0.5;
const POOL_MAX_IDLE_PER_HOST: usize = 20;

/// Default per-source request budget: 60 calls per minute.
pub const SOURCE_RATE_LIMIT_CALLS: u32 = 60;
pub const SOURCE_RATE_LIMIT_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Declarative request passed to the transport.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub json_body: Option<Value>,
}

impl RequestSpec {
    pub fn get<S: Into<String>>(url: S) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            json_body: None,
        }
    }

    pub fn post<S: Into<String>>(url: S) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    pub fn query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }
}

/// Plain response handed back to sources: status plus body text.
///
/// `reason` is populated only on synthetic responses, carrying the transport
/// error text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub reason: Option<String>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            reason: None,
        }
    }

    /// Response standing in for a request that could not be completed.
    pub fn synthetic(reason: impl Into<String>) -> Self {
        Self {
            status: SYNTHETIC_ERROR_CODE,
            body: String::new(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.status == SYNTHETIC_ERROR_CODE
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> std::result::Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Executes requests. The blocking [`ConnectionPool`] is the real
/// implementation; tests substitute a canned one.
pub trait Transport {
    fn execute(&self, spec: &RequestSpec) -> RawResponse;
}

/// Pooled blocking HTTP client with retry/backoff.
pub struct ConnectionPool {
    client: reqwest::blocking::Client,
}

impl ConnectionPool {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("game-insights/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .build()
            .map_err(|e| crate::error::GameInsightsError::general(format!(
                "Failed to build HTTP client: {e}"
            )))?;
        Ok(Self { client })
    }

    fn send(&self, url: &Url, spec: &RequestSpec) -> reqwest::Result<RawResponse> {
        let mut builder = match spec.method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };
        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        for (key, value) in &spec.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &spec.json_body {
            builder = builder.json(body);
        }
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(RawResponse::new(status, body))
    }
}

impl Transport for ConnectionPool {
    fn execute(&self, spec: &RequestSpec) -> RawResponse {
        let url = match Url::parse(&spec.url) {
            Ok(url) => url,
            Err(e) => {
                error!("Invalid URL '{}': {e}. Abort request.", spec.url);
                return RawResponse::synthetic(format!("invalid url '{}': {e}", spec.url));
            }
        };

        for attempt in 1..=MAX_RETRIES {
            match self.send(&url, spec) {
                Ok(response) => return response,
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < MAX_RETRIES => {
                    let cooldown = BACKOFF_FACTOR * f64::powi(2.0, attempt as i32 - 1);
                    warn!(
                        "Encountered error {e}. Retrying in {cooldown:.1}s. (Attempt {} of {MAX_RETRIES})",
                        attempt + 1
                    );
                    std::thread::sleep(Duration::from_secs_f64(cooldown));
                }
                Err(e) => {
                    error!("Request to {url} failed: {e}. Abort request.");
                    return RawResponse::synthetic(e.to_string());
                }
            }
        }

        RawResponse::synthetic("unexpected request error")
    }
}

/// Per-source handle coupling the shared transport with that source's rate
/// limiter. Every request a source makes goes through here.
pub struct SourceContext {
    transport: Arc<dyn Transport>,
    limiter: RefCell<RateLimiter>,
}

impl SourceContext {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            limiter: RefCell::new(RateLimiter::new(
                SOURCE_RATE_LIMIT_CALLS,
                SOURCE_RATE_LIMIT_PERIOD,
            )),
        }
    }

    pub fn with_rate_limit(transport: Arc<dyn Transport>, calls: u32, period: Duration) -> Self {
        Self {
            transport,
            limiter: RefCell::new(RateLimiter::new(calls, period)),
        }
    }

    /// Acquire a rate-limit slot, then execute the request.
    pub fn request(&self, spec: &RequestSpec) -> RawResponse {
        self.limiter.borrow_mut().acquire();
        self.transport.execute(spec)
    }
}
