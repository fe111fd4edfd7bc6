//! Production build
//!
//! `src/` -> `dist/`:
//! - top-level `*.html`: comments removed, whitespace collapsed, inline CSS
//!   and JavaScript minified, safe attribute quotes dropped, short doctype
//! - `css/*.css` through lightningcss
//! - `js/*.js` through oxc
//! - `img/` copied recursively, `favicon.ico` copied

use std::fs;
use std::path::{Path, PathBuf};

use ong_css::CssMinifier;
use ong_html::HtmlMinifier;
use walkdir::WalkDir;

use crate::js::JsMinifier;
use crate::{file_name, files_with_extension, io_error, BuildError, BuildResult};

/// Files produced by a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub html: Vec<PathBuf>,
    pub css: Vec<PathBuf>,
    pub js: Vec<PathBuf>,
    /// Files copied from `img/`
    pub images: usize,
    pub favicon: bool,
}

/// Site builder
#[derive(Debug, Clone)]
pub struct Builder {
    src: PathBuf,
    dist: PathBuf,
    js: JsMinifier,
}

impl Builder {
    pub fn new(src: impl Into<PathBuf>, dist: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dist: dist.into(),
            js: JsMinifier::new(),
        }
    }

    /// Replace the JavaScript minifier settings
    pub fn with_js_minifier(mut self, js: JsMinifier) -> Self {
        self.js = js;
        self
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn dist(&self) -> &Path {
        &self.dist
    }

    /// Run every step; the first failure aborts the build
    pub fn run(&self) -> BuildResult<BuildReport> {
        tracing::info!("🚀 Building {} -> {}", self.src.display(), self.dist.display());
        self.clean_dist()?;

        let report = BuildReport {
            html: self.process_html()?,
            css: self.process_css()?,
            js: self.process_js()?,
            images: self.copy_images()?,
            favicon: self.copy_favicon()?,
        };
        tracing::info!("✅ Build finished");
        Ok(report)
    }

    /// Recreate an empty output directory
    pub fn clean_dist(&self) -> BuildResult<()> {
        if self.dist.exists() {
            fs::remove_dir_all(&self.dist).map_err(io_error(&self.dist))?;
        }
        fs::create_dir_all(&self.dist).map_err(io_error(&self.dist))
    }

    pub fn process_html(&self) -> BuildResult<Vec<PathBuf>> {
        let minifier = HtmlMinifier::new()
            .with_css(|css| CssMinifier::new().minify(css).map_err(|e| e.to_string()))
            .with_js(|js| self.js.minify(js, "<inline>").map_err(|e| e.to_string()));

        let mut written = Vec::new();
        for path in files_with_extension(&self.src, &["html"])? {
            let name = file_name(&path);
            let html = fs::read_to_string(&path).map_err(io_error(&path))?;
            let minified = minifier.minify(&html).map_err(|source| BuildError::Html {
                file: name.clone(),
                source,
            })?;
            let out = self.dist.join(&name);
            fs::write(&out, minified).map_err(io_error(&out))?;
            tracing::info!("📄 HTML minified: {}", name);
            written.push(out);
        }
        Ok(written)
    }

    pub fn process_css(&self) -> BuildResult<Vec<PathBuf>> {
        self.process_dir("css", "css", |name, source| {
            Ok(CssMinifier::new().with_filename(name).minify(source)?)
        })
    }

    pub fn process_js(&self) -> BuildResult<Vec<PathBuf>> {
        self.process_dir("js", "js", |name, source| self.js.minify(source, name))
    }

    fn process_dir(
        &self,
        dir: &str,
        ext: &str,
        minify: impl Fn(&str, &str) -> BuildResult<String>,
    ) -> BuildResult<Vec<PathBuf>> {
        let src_dir = self.src.join(dir);
        if !src_dir.is_dir() {
            tracing::warn!("No {} directory, skipping", src_dir.display());
            return Ok(Vec::new());
        }
        let dist_dir = self.dist.join(dir);
        fs::create_dir_all(&dist_dir).map_err(io_error(&dist_dir))?;

        let mut written = Vec::new();
        for path in files_with_extension(&src_dir, &[ext])? {
            let name = file_name(&path);
            let source = fs::read_to_string(&path).map_err(io_error(&path))?;
            let minified = minify(&name, &source)?;
            let out = dist_dir.join(&name);
            fs::write(&out, minified).map_err(io_error(&out))?;
            tracing::info!("Minified {}/{}", dir, name);
            written.push(out);
        }
        Ok(written)
    }

    /// Copy `img/` recursively; returns the number of files copied
    pub fn copy_images(&self) -> BuildResult<usize> {
        let img = self.src.join("img");
        if !img.is_dir() {
            return Ok(0);
        }
        let mut copied = 0;
        for entry in WalkDir::new(&img) {
            let entry = entry?;
            let Ok(relative) = entry.path().strip_prefix(&self.src) else {
                continue;
            };
            let target = self.dist.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(io_error(&target))?;
            } else {
                fs::copy(entry.path(), &target).map_err(io_error(&target))?;
                copied += 1;
            }
        }
        tracing::info!("🖼️ Copied {} image(s)", copied);
        Ok(copied)
    }

    /// Copy `favicon.ico` when present
    pub fn copy_favicon(&self) -> BuildResult<bool> {
        let favicon = self.src.join("favicon.ico");
        if !favicon.is_file() {
            tracing::warn!("No favicon.ico in {}", self.src.display());
            return Ok(false);
        }
        let target = self.dist.join("favicon.ico");
        fs::copy(&favicon, &target).map_err(io_error(&target))?;
        Ok(true)
    }
}
