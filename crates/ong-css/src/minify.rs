//! CSS minifier using lightningcss

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

use crate::CssError;

/// Minify a stylesheet
pub fn minify(css: &str) -> Result<String, CssError> {
    CssMinifier::new().minify(css)
}

/// Stylesheet minifier
#[derive(Debug, Clone)]
pub struct CssMinifier {
    filename: String,
}

impl CssMinifier {
    pub fn new() -> Self {
        Self {
            filename: "<inline>".to_string(),
        }
    }

    /// Name reported in errors
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Parse, minify and print `css` compactly
    pub fn minify(&self, css: &str) -> Result<String, CssError> {
        let options = ParserOptions {
            filename: self.filename.clone(),
            ..ParserOptions::default()
        };

        let mut stylesheet = StyleSheet::parse(css, options).map_err(|e| CssError::ParseError {
            file: self.filename.clone(),
            line: e.loc.as_ref().map(|loc| loc.line + 1).unwrap_or(0),
            message: e.kind.to_string(),
        })?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| CssError::MinifyError {
                file: self.filename.clone(),
                message: e.to_string(),
            })?;

        let printed = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| CssError::PrintError {
                file: self.filename.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "Minified {}: {} -> {} bytes",
            self.filename,
            css.len(),
            printed.code.len()
        );
        Ok(printed.code)
    }
}

impl Default for CssMinifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_simple() {
        let out = minify("body {\n  color: #ff0000;\n  margin: 0px;\n}\n").unwrap();
        assert_eq!(out, "body{color:red;margin:0}");
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let err = CssMinifier::new()
            .with_filename("css/style.css")
            .minify("..broken { color: red }")
            .unwrap_err();
        match err {
            CssError::ParseError { file, line, .. } => {
                assert_eq!(file, "css/style.css");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
