//! JavaScript minification with oxc (mangling and compression)

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc_mangler::MangleOptions;
use oxc_minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::{BuildError, BuildResult};

/// JavaScript minifier
#[derive(Debug, Clone)]
pub struct JsMinifier {
    mangle: bool,
    compress: bool,
    drop_console: bool,
}

impl JsMinifier {
    /// Mangling and compression on; `console` calls are kept
    pub fn new() -> Self {
        Self {
            mangle: true,
            compress: true,
            drop_console: false,
        }
    }

    pub fn with_mangle(mut self, enable: bool) -> Self {
        self.mangle = enable;
        self
    }

    pub fn with_compress(mut self, enable: bool) -> Self {
        self.compress = enable;
        self
    }

    pub fn with_drop_console(mut self, enable: bool) -> Self {
        self.drop_console = enable;
        self
    }

    /// Minify `source`; `file` names it in errors
    pub fn minify(&self, source: &str, file: &str) -> BuildResult<String> {
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, source, SourceType::default()).parse();
        if let Some(error) = parsed.errors.first() {
            return Err(BuildError::JsParse {
                file: file.to_string(),
                message: format!("{error:?}"),
            });
        }
        let mut program = parsed.program;

        let compress = self.compress.then(|| {
            let mut options = CompressOptions::smallest();
            options.drop_console = self.drop_console;
            options.drop_debugger = true;
            options
        });
        let options = MinifierOptions {
            mangle: self.mangle.then(MangleOptions::default),
            compress,
        };
        let minified = Minifier::new(options).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(minified.scoping)
            .build(&program)
            .code;
        tracing::debug!("Minified {}: {} -> {} bytes", file, source.len(), code.len());
        Ok(code)
    }
}

impl Default for JsMinifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_shrinks() {
        let source = "function greet(personName) {\n    // say hello\n    var message = 'Olá, ' + personName;\n    return message;\n}\nwindow.greet = greet;\n";
        let out = JsMinifier::new().minify(source, "app.js").unwrap();
        assert!(out.len() < source.len());
        assert!(!out.contains("say hello"));
        assert!(!out.contains("personName"));
    }

    #[test]
    fn test_parse_error() {
        let err = JsMinifier::new().minify("function (", "broken.js").unwrap_err();
        assert!(matches!(err, BuildError::JsParse { ref file, .. } if file == "broken.js"));
    }

    #[test]
    fn test_debugger_dropped() {
        let out = JsMinifier::new()
            .minify("window.f = function () { debugger; return 1; };", "a.js")
            .unwrap();
        assert!(!out.contains("debugger"));
    }
}
