//! Resource Loader
//!
//! Blocking HTTP transport built on `reqwest::blocking`. Used for both screen
//! markup and image bytes.

use std::time::Duration;

use url::Url;

use crate::{Fetcher, NetError, Response};

/// Transport configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// User agent string
    pub user_agent: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("tether/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl NetConfig {
    pub fn with_user_agent(mut self, ua: &str) -> Self {
        self.user_agent = ua.to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Load resources from the network
pub struct ResourceLoader {
    client: reqwest::blocking::Client,
    config: NetConfig,
}

impl ResourceLoader {
    /// Create a loader with default settings
    pub fn new() -> Result<Self, NetError> {
        Self::with_config(NetConfig::default())
    }

    /// Create a loader with custom config
    pub fn with_config(config: NetConfig) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NetError::Network(format!("Client setup failed: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get loader configuration
    pub fn config(&self) -> &NetConfig {
        &self.config
    }
}

/// Parse and check that a URL is something we can GET
fn parse_http_url(url: &str) -> Result<Url, NetError> {
    let parsed = Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(NetError::InvalidUrl(format!("Unsupported scheme: {}", other))),
    }
}

/// Compare the declared length with what actually arrived
fn check_complete(declared: Option<u64>, received: usize) -> Result<(), NetError> {
    match declared {
        Some(expected) if (received as u64) < expected => Err(NetError::Truncated {
            expected,
            received: received as u64,
        }),
        _ => Ok(()),
    }
}

impl Fetcher for ResourceLoader {
    fn fetch(&mut self, url: &str) -> Result<Response, NetError> {
        let parsed = parse_http_url(url)?;
        tracing::info!("HTTP GET {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| NetError::Network(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let declared = response.content_length();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .map_err(|e| NetError::Network(format!("Body read failed: {}", e)))?
            .to_vec();

        check_complete(declared, body.len())?;
        tracing::debug!("HTTP {} {} ({} bytes)", status, url, body.len());

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
