//! ONG CSS
//!
//! Stylesheet minification on top of lightningcss.

mod minify;

pub use minify::{minify, CssMinifier};

/// CSS processing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error in {file} at line {line}: {message}")]
    ParseError {
        file: String,
        line: u32,
        message: String,
    },

    #[error("Failed to minify {file}: {message}")]
    MinifyError { file: String, message: String },

    #[error("Failed to print {file}: {message}")]
    PrintError { file: String, message: String },
}
