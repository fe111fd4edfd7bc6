//! ONG Networking
//!
//! Loads static assets (page templates) relative to a base URL. `file:` URLs
//! are read through smol's async filesystem, `http(s):` URLs through a
//! blocking reqwest client on smol's thread pool.

mod loader;

pub use loader::ResourceLoader;
pub use url::Url;

/// Fetch an absolute URL
pub async fn fetch(url: &str) -> Result<Response, NetError> {
    let url = Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))?;
    ResourceLoader::new(url.clone()).fetch(url.as_str()).await
}

/// Loaded resource
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Response {
    /// Status in the 2xx range
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.clone()).map_err(|e| NetError::InvalidEncoding(e.to_string()))
    }
}

/// Network error
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}
