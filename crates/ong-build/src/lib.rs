//! ONG Build
//!
//! Production tooling for the ONG Connect site:
//! - [`Builder`]: minify HTML, CSS and JavaScript into the output directory
//!   and copy static assets
//! - [`ImageOptimizer`]: re-encode JPEG and PNG images, keeping whichever
//!   of original and re-encoded is smaller

pub mod build;
pub mod images;
pub mod js;

pub use build::{BuildReport, Builder};
pub use images::{format_bytes, ImageOptimizer, ImageStat, OptimizeReport};
pub use js::JsMinifier;

use std::io;
use std::path::{Path, PathBuf};

/// Build error
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("HTML error in {file}: {source}")]
    Html {
        file: String,
        #[source]
        source: ong_html::HtmlError,
    },

    #[error("CSS error: {0}")]
    Css(#[from] ong_css::CssError),

    #[error("JavaScript parse error in {file}: {message}")]
    JsParse { file: String, message: String },

    #[error("Image error in {file}: {source}")]
    Image {
        file: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for build steps
pub type BuildResult<T> = Result<T, BuildError>;

/// Attach `path` to an I/O error
pub(crate) fn io_error(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Files directly in `dir` with extension `ext` (case-insensitive), sorted
pub(crate) fn files_with_extension(dir: &Path, exts: &[&str]) -> BuildResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| exts.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Final path component as a string
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
