//! Template registry
//!
//! Built-in fragments ship with the crate. Other routes are fetched from
//! `templates/<route>.html` through a [`TemplateSource`] and cached for the
//! session; any failure degrades to the 404 fragment.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use ong_dom::Document;
use ong_net::{NetError, ResourceLoader};

use crate::router::NOT_FOUND;
use crate::SiteResult;

/// Page shell the fragments are rendered into
pub const SHELL_HTML: &str = include_str!("fragments/index.html");

/// Parse [`SHELL_HTML`] into a fresh document
pub fn shell_document() -> SiteResult<Document> {
    Ok(ong_html::parse(SHELL_HTML)?)
}

const HOME: &str = include_str!("fragments/home.html");
const SOBRE: &str = include_str!("fragments/sobre.html");
const PROJETOS: &str = include_str!("fragments/projetos.html");
const VOLUNTARIOS: &str = include_str!("fragments/voluntarios.html");
const CONTATO: &str = include_str!("fragments/contato.html");
const LOGIN: &str = include_str!("fragments/login.html");
const NOT_FOUND_HTML: &str = include_str!("fragments/404.html");

/// Where external fragments come from
#[allow(async_fn_in_trait)]
pub trait TemplateSource {
    /// Load the text at `path` (relative to the source's base)
    async fn load(&self, path: &str) -> Result<String, NetError>;
}

impl TemplateSource for ResourceLoader {
    async fn load(&self, path: &str) -> Result<String, NetError> {
        self.fetch_text(path).await
    }
}

/// In-memory template source
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    loads: Cell<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&mut self, path: &str, body: &str) {
        self.files.insert(path.to_string(), body.to_string());
    }

    /// Number of load attempts so far
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl TemplateSource for MemorySource {
    async fn load(&self, path: &str) -> Result<String, NetError> {
        self.loads.set(self.loads.get() + 1);
        self.files
            .get(path)
            .cloned()
            .ok_or(NetError::HttpError { status: 404 })
    }
}

/// Template registry
#[derive(Debug)]
pub struct Templates<S = ResourceLoader> {
    builtins: HashMap<&'static str, &'static str>,
    cache: RefCell<HashMap<String, String>>,
    source: Option<S>,
}

impl<S: TemplateSource> Templates<S> {
    /// Registry with the built-in fragments and an optional external source
    pub fn new(source: Option<S>) -> Self {
        let builtins = HashMap::from([
            ("home", HOME),
            ("sobre", SOBRE),
            ("projetos", PROJETOS),
            ("voluntarios", VOLUNTARIOS),
            ("contato", CONTATO),
            ("login", LOGIN),
            (NOT_FOUND, NOT_FOUND_HTML),
        ]);
        Self {
            builtins,
            cache: RefCell::new(HashMap::new()),
            source,
        }
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Built-in fragment for `name`
    pub fn builtin(&self, name: &str) -> Option<&'static str> {
        self.builtins.get(name).copied()
    }

    /// Whether an external fragment for `name` is cached
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name)
    }

    /// Fragment for `name`: built-in, cached, fetched, or the 404 fragment
    pub async fn get_template(&self, name: &str) -> String {
        if let Some(html) = self.builtin(name) {
            return html.to_string();
        }
        if let Some(html) = self.cache.borrow().get(name) {
            tracing::debug!("Template {} served from cache", name);
            return html.clone();
        }

        let Some(source) = &self.source else {
            tracing::warn!("Template {} not found, using fallback", name);
            return self.get_404_template().to_string();
        };

        let path = format!("templates/{name}.html");
        match source.load(&path).await {
            Ok(html) => {
                tracing::debug!("Fetched template {} ({} bytes)", path, html.len());
                self.cache.borrow_mut().insert(name.to_string(), html.clone());
                html
            }
            Err(e) => {
                tracing::warn!("Template {} not found, using fallback: {}", name, e);
                self.get_404_template().to_string()
            }
        }
    }

    /// The built-in 404 fragment
    pub fn get_404_template(&self) -> &'static str {
        NOT_FOUND_HTML
    }
}

impl<S: TemplateSource> Default for Templates<S> {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_skips_source() {
        let templates = Templates::new(Some(MemorySource::new()));
        let html = smol::block_on(templates.get_template("home"));
        assert!(html.contains("Conectando ONGs a Recursos e Voluntários"));
        assert_eq!(templates.source().unwrap().load_count(), 0);
    }

    #[test]
    fn test_unknown_falls_back_to_404() {
        let templates = Templates::new(Some(MemorySource::new()));
        let html = smol::block_on(templates.get_template("nonexistent-route"));
        assert_eq!(html, templates.get_404_template());
        assert!(!templates.is_cached("nonexistent-route"));
    }

    #[test]
    fn test_external_fetched_once() {
        let source = MemorySource::new().with("templates/eventos.html", "<h1>Eventos</h1>");
        let templates = Templates::new(Some(source));

        for _ in 0..3 {
            let html = smol::block_on(templates.get_template("eventos"));
            assert_eq!(html, "<h1>Eventos</h1>");
        }
        assert!(templates.is_cached("eventos"));
        assert_eq!(templates.source().unwrap().load_count(), 1);
    }

    #[test]
    fn test_no_source() {
        let templates: Templates<MemorySource> = Templates::default();
        let html = smol::block_on(templates.get_template("eventos"));
        assert!(html.contains("Página Não Encontrada"));
    }

    #[test]
    fn test_every_builtin_route_has_a_fragment() {
        let templates: Templates<MemorySource> = Templates::default();
        for route in crate::router::BUILTIN_ROUTES {
            assert!(templates.builtin(route).is_some(), "{route}");
        }
    }
}
