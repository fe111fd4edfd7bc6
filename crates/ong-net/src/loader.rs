//! Resource Loader
//!
//! Resolves paths against a base URL and loads them by scheme.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::{NetError, Response};

const USER_AGENT: &str = "ONG-Connect/0.1";
const TIMEOUT: Duration = Duration::from_secs(30);

/// Load resources relative to a base URL
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    base: Url,
}

impl ResourceLoader {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Loader rooted at a local directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, NetError> {
        let dir = dir.as_ref();
        let base = Url::from_directory_path(dir)
            .map_err(|_| NetError::InvalidUrl(dir.display().to_string()))?;
        Ok(Self::new(base))
    }

    /// Parse a base URL string. A trailing `/` is added so relative paths
    /// resolve inside it.
    pub fn parse(base: &str) -> Result<Self, NetError> {
        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base).map_err(|e| NetError::InvalidUrl(format!("{base}: {e}")))?;
        Ok(Self::new(url))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `path` against the base URL
    pub fn resolve(&self, path: &str) -> Result<Url, NetError> {
        self.base
            .join(path)
            .map_err(|e| NetError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Load a resource. Non-2xx statuses are returned, not raised.
    pub async fn fetch(&self, path: &str) -> Result<Response, NetError> {
        let url = self.resolve(path)?;
        tracing::debug!("Loading {}", url);

        match url.scheme() {
            "file" => fetch_file(&url).await,
            "http" | "https" => fetch_http(url).await,
            other => Err(NetError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Load a resource as text, failing on non-2xx statuses
    pub async fn fetch_text(&self, path: &str) -> Result<String, NetError> {
        let response = self.fetch(path).await?;
        if !response.ok() {
            return Err(NetError::HttpError {
                status: response.status,
            });
        }
        response.text()
    }
}

async fn fetch_file(url: &Url) -> Result<Response, NetError> {
    let path = url
        .to_file_path()
        .map_err(|_| NetError::InvalidUrl(url.to_string()))?;

    match smol::fs::read(&path).await {
        Ok(body) => Ok(Response {
            status: 200,
            content_type: content_type_for(&path).to_string(),
            body,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Response {
            status: 404,
            content_type: "text/plain".to_string(),
            body: Vec::new(),
        }),
        Err(e) => Err(NetError::Network(format!("{}: {e}", path.display()))),
    }
}

async fn fetch_http(url: Url) -> Result<Response, NetError> {
    smol::unblock(move || {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;

        let response = client
            .get(url.as_str())
            .send()
            .map_err(|e| NetError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response
            .bytes()
            .map_err(|e| NetError::Network(e.to_string()))?
            .to_vec();

        tracing::debug!("HTTP {} {} ({} bytes)", status, url, body.len());
        Ok(Response {
            status,
            content_type,
            body,
        })
    })
    .await
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adds_trailing_slash() {
        let loader = ResourceLoader::parse("https://ong.example/site").unwrap();
        let url = loader.resolve("templates/sobre.html").unwrap();
        assert_eq!(url.as_str(), "https://ong.example/site/templates/sobre.html");
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            ResourceLoader::parse("not a url"),
            Err(NetError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unsupported_scheme() {
        let loader = ResourceLoader::parse("ftp://ong.example/").unwrap();
        let result = smol::block_on(loader.fetch("a.html"));
        assert!(matches!(result, Err(NetError::UnsupportedScheme(s)) if s == "ftp"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for(Path::new("templates/home.html")), "text/html");
        assert_eq!(content_type_for(Path::new("img/logo.PNG")), "application/octet-stream");
    }
}
