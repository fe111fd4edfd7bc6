//! Site configuration

use serde::Deserialize;

use crate::SiteResult;

/// Site runtime options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Base URL external templates (`templates/<route>.html`) resolve
    /// against. Without one, every non-built-in route renders the 404 page.
    pub template_base: Option<String>,
    /// Routes served only by external template files
    pub extra_routes: Vec<String>,
    /// Location hash at startup (`#sobre`, or empty for home)
    pub initial_hash: String,
    /// Show the welcome toast after startup
    pub welcome_toast: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_base: None,
            extra_routes: Vec::new(),
            initial_hash: String::new(),
            welcome_toast: true,
        }
    }
}

impl SiteConfig {
    /// Parse a JSON configuration; missing keys keep their defaults
    pub fn from_json(json: &str) -> SiteResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
