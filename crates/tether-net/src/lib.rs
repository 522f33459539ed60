//! tether Networking
//!
//! Blocking resource fetching and reference resolution for remote screens.

pub mod loader;
pub mod resolver;

pub use loader::{NetConfig, ResourceLoader};
pub use resolver::{is_absolute, resolve, server_base_url};

/// HTTP Response
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Create a response with a status and body, no headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Check if response is successful
    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Get header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Truncated body: {received}/{expected} bytes")]
    Truncated { expected: u64, received: u64 },
}

/// Transport boundary: a blocking GET against a URL.
///
/// Implementations report whatever status the server sent; callers that only
/// care about success use [`Fetcher::get_ok`].
pub trait Fetcher {
    /// Issue a GET request
    fn fetch(&mut self, url: &str) -> Result<Response, NetError>;

    /// Issue a GET request and treat any non-2xx status as an error
    fn get_ok(&mut self, url: &str) -> Result<Vec<u8>, NetError> {
        let response = self.fetch(url)?;
        if !response.is_success() {
            return Err(NetError::HttpError {
                status: response.status,
            });
        }
        Ok(response.body)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&mut self, url: &str) -> Result<Response, NetError> {
        (**self).fetch(url)
    }
}
