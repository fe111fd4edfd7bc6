//! Site runtime errors

/// Result type for site operations
pub type SiteResult<T> = Result<T, SiteError>;

/// Site runtime error
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("DOM error: {0}")]
    Dom(#[from] ong_dom::DomError),

    #[error("HTML error: {0}")]
    Html(#[from] ong_html::HtmlError),

    #[error("Network error: {0}")]
    Net(#[from] ong_net::NetError),

    #[error("Accessibility error: {0}")]
    A11y(#[from] ong_a11y::A11yError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Document has no <{0}> element")]
    MissingElement(&'static str),

    #[error("Page initializer for `{route}` failed: {reason}")]
    Initializer { route: String, reason: String },
}
