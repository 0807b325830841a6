//! HTTP client for the remote server-administration API.
//!
//! This module provides a lightweight client that:
//!
//! - Validates the configured API base URL
//! - Keeps a cookie jar so the `hll_session` credential issued on connect is
//!   attached to every later request
//! - Optionally seeds that jar with a pre-established session identifier
//! - Builds requests with a consistent User-Agent and Accept header
//!
//! The primary entry point is [`ConsoleClient`]. Create an instance via
//! [`ConsoleClient::new`], then build requests with [`ConsoleClient::request`].
//!
//! # Example
//!
//! ```ignore
//! use hllrcon_api::{ClientOptions, ConsoleClient};
//!
//! let client = ConsoleClient::new(&ClientOptions::new("http://localhost:8080"))?;
//! let response = client.request(reqwest::Method::GET, "/api/v2/connection/status").send().await?;
//! println!("status: {}", response.status());
//! ```

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::cookie::Jar;
use reqwest::{Client, RequestBuilder, header};
use tracing::debug;
use url::Url;

/// Name of the cookie that carries the session credential.
pub const SESSION_COOKIE: &str = "hll_session";

/// Hostnames allowed to use plain HTTP without opting in.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];

/// Construction parameters for [`ConsoleClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub base_url: String,
    /// Session identifier to attach before any connect call.
    pub session_id: Option<String>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Permit `http://` for non-local hosts.
    pub allow_insecure: bool,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client`.
///
/// The client is cheap to clone; clones share the connection pool and the
/// cookie jar, so a session established through one clone is visible to all.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    base_url: String,
    pub http: Client,
    pub user_agent: String,
    jar: Arc<Jar>,
}

impl ConsoleClient {
    /// Construct a [`ConsoleClient`] after validating the base URL.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let base = validate_base_url(&options.base_url, options.allow_insecure)?;

        let jar = Arc::new(Jar::default());
        if let Some(session_id) = options.session_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}={session_id}; Path=/"), &base);
            debug!(base_url = %base, "seeded session cookie");
        }

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json, text/plain"));

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build http client")?;

        Ok(Self {
            base_url: options.base_url.trim().trim_end_matches('/').to_string(),
            http,
            user_agent: format!("hllrcon/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    ///
    /// `path` may already carry a query string.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = join_url(&self.base_url, path);
        debug!(%method, %url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Store a session identifier in the jar (used after a connect that
    /// returns the id in its body but not as a cookie, e.g. behind proxies
    /// that strip `Set-Cookie`).
    pub fn remember_session(&self, session_id: &str) {
        if let Ok(url) = Url::parse(&self.base_url) {
            self.jar.add_cookie_str(&format!("{SESSION_COOKIE}={session_id}; Path=/"), &url);
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - the URL must parse and include a host
/// - `localhost`, `127.0.0.1` and `::1`: any scheme is allowed
/// - otherwise the scheme must be `https` unless `allow_insecure` is set
pub fn validate_base_url(base: &str, allow_insecure: bool) -> Result<Url> {
    let parsed = Url::parse(base.trim()).map_err(|error| anyhow!("Invalid API base URL '{}': {}", base, error))?;

    let host_name = parsed
        .host_str()
        .ok_or_else(|| anyhow!("API base URL '{}' must include a host", base))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!("API base URL must use http or https; got '{}://'", parsed.scheme()));
    }

    if LOCALHOST_DOMAINS.iter().any(|&allowed| host_name.eq_ignore_ascii_case(allowed)) {
        return Ok(parsed);
    }

    if parsed.scheme() != "https" && !allow_insecure {
        return Err(anyhow!(
            "API base URL must use https for non-local host '{}'; set allow_insecure to override",
            host_name
        ));
    }

    Ok(parsed)
}
