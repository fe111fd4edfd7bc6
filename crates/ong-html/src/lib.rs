//! ONG HTML
//!
//! HTML5 parsing built on html5ever, fragment insertion (`innerHTML`) and the
//! production HTML minifier.

mod minify;
mod parser;

pub use minify::{HtmlMinifier, InlineHook};
pub use ong_dom::{Document, NodeId};
pub use parser::{HtmlParser, ParseOptions};

/// HTML processing errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOM error: {0}")]
    Dom(#[from] ong_dom::DomError),

    #[error("Failed to minify inline <{element}>: {reason}")]
    InlineContent { element: String, reason: String },
}

/// Parse an HTML document with default options
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Replace the children of `node` with the parsed `html` fragment
/// (`element.innerHTML = html`). Returns the inserted top-level nodes.
pub fn set_inner_html(doc: &mut Document, node: NodeId, html: &str) -> Result<Vec<NodeId>, HtmlError> {
    HtmlParser::new().set_inner_html(doc, node, html)
}
