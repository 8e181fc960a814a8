// src/fetch/http.rs
// =============================================================================
// Fetches Redfish resources over HTTP(S) with reqwest.
//
// Key functionality:
// - GET <origin>/redfish/v1/... with "Accept: application/json"
// - Optional HTTP basic authentication
// - TLS certificate verification stays ON unless explicitly disabled
//   (--insecure); BMCs often ship self-signed certificates
// - Per-request timeout
// - Optional retries for transport errors and 5xx responses
//
// Failure categories:
// - Error::Transport: could not talk to the server (timeout, TLS, refused)
// - Error::Status: the server answered with a non-2xx status
// - Error::Parse: the server answered 2xx but the body is not JSON
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::ResourceFetcher;
use crate::error::{Error, Result, TransportFailure};
use crate::resource::{ResourceIdentifier, ServiceRoot};

/// Username / password pair for HTTP basic auth.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Hand-written so passwords never end up in logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transport settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    pub credentials: Option<Credentials>,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Deadline for a single request
    pub timeout: Duration,
    /// Extra attempts after a transport error or 5xx
    pub retries: u32,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            accept_invalid_certs: false,
            timeout: Duration::from_secs(10),
            retries: 0,
        }
    }
}

/// The real fetcher. One client is reused for every request (connection pooling).
pub struct HttpFetcher {
    client: Client,
    root: ServiceRoot,
    config: HttpFetcherConfig,
}

impl HttpFetcher {
    pub fn new(root: ServiceRoot, config: HttpFetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            root,
            config,
        })
    }

    // One GET, no retries
    async fn fetch_once(&self, url: &str) -> Result<Value> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(creds) = &self.config.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| categorize_error(url, e))?;

        serde_json::from_slice(&body).map_err(|source| Error::Parse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, id: &ResourceIdentifier) -> Result<Value> {
        let url = self.root.url_for(id).to_string();
        let mut attempt = 0;

        loop {
            match self.fetch_once(&url).await {
                Err(err) if attempt < self.config.retries && is_retryable(&err) => {
                    attempt += 1;
                    debug!("Retrying {} (attempt {}): {}", url, attempt + 1, err);
                    tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                }
                result => return result,
            }
        }
    }
}

// Transport errors and server-side statuses may go away on a second try;
// 4xx and bad JSON will not
fn is_retryable(err: &Error) -> bool {
    match err {
        Error::Transport { .. } => true,
        Error::Status { status, .. } => StatusCode::from_u16(*status)
            .map(|s| s.is_server_error())
            .unwrap_or(false),
        _ => false,
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - Connection refused / DNS resolution failure
// - SSL certificate issues (common with BMC self-signed certs)
// - Too many redirects
fn categorize_error(url: &str, error: reqwest::Error) -> Error {
    // Walk the source chain; rustls errors are nested below hyper's
    let mut error_string = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(inner) = source {
        error_string.push_str(": ");
        error_string.push_str(&inner.to_string());
        source = std::error::Error::source(inner);
    }
    let lowered = error_string.to_lowercase();

    let kind = if error.is_timeout() {
        TransportFailure::Timeout
    } else if error.is_redirect() {
        TransportFailure::TooManyRedirects
    } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl")
    {
        TransportFailure::Tls
    } else if error.is_connect() {
        TransportFailure::Connect
    } else {
        TransportFailure::Other
    };

    Error::Transport {
        url: url.to_string(),
        kind,
        message: error_string,
    }
}
