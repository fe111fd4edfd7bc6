//! Single-page controller
//!
//! Owns the page lifecycle: resolve the route, fetch its fragment, swap it
//! into `<main>` and run the route's initializer.
//!
//! Every navigation takes a [`Ticket`]. A fetched fragment is committed only
//! while its ticket is the latest one issued, so when navigations overlap
//! the last one wins regardless of which fetch finishes first.

use ong_dom::{Document, NodeId};

use crate::history::History;
use crate::page::Page;
use crate::pages::{Initializers, PageBindings};
use crate::router::{RouteTable, HOME, NOT_FOUND};
use crate::templates::{TemplateSource, Templates};
use crate::SiteResult;

const LOADER_ID: &str = "global-loader";

/// Page lifecycle state
///
/// `Idle -> Loading -> Rendered -> Idle` for a completed navigation.
/// `Error` is held between a failed render and the 404 retry, and remains
/// when the 404 page itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Idle,
    Loading,
    Rendered,
    Error,
}

/// Handle of one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    route: String,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Resolved route
    pub fn route(&self) -> &str {
        &self.route
    }
}

/// Result of committing a fetched fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Rendered; the new page's bindings
    Applied(PageBindings),
    /// A newer navigation was issued; nothing changed
    Stale,
}

impl Commit {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Page controller
#[derive(Debug, Clone)]
pub struct Spa {
    routes: RouteTable,
    initializers: Initializers,
    history: History,
    current_page: String,
    state: PageState,
    latest: u64,
}

impl Spa {
    pub fn new(routes: RouteTable, history: History) -> Self {
        Self {
            routes,
            initializers: Initializers::new(),
            history,
            current_page: String::new(),
            state: PageState::Idle,
            latest: 0,
        }
    }

    /// Replace the initializer table
    pub fn with_initializers(mut self, initializers: Initializers) -> Self {
        self.initializers = initializers;
        self
    }

    pub fn initializers_mut(&mut self) -> &mut Initializers {
        &mut self.initializers
    }

    /// Route of the rendered page (empty before the first render)
    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Sequence number of the latest ticket
    pub fn latest_seq(&self) -> u64 {
        self.latest
    }

    /// Start a navigation to `name`: issue a ticket and show the loader
    pub fn begin(&mut self, page: &mut Page, name: &str) -> SiteResult<Ticket> {
        self.latest += 1;
        self.state = PageState::Loading;
        show_loading(&mut page.document)?;

        let route = self.routes.resolve(name).to_string();
        if route != name {
            tracing::debug!("Unknown route {:?}, rendering {}", name, route);
        }
        tracing::info!("Loading page {} (navigation #{})", route, self.latest);
        Ok(Ticket {
            seq: self.latest,
            route,
        })
    }

    /// Fetch the fragment for a ticket
    pub async fn fetch<S: TemplateSource>(&self, templates: &Templates<S>, ticket: &Ticket) -> String {
        templates.get_template(&ticket.route).await
    }

    /// Render a fetched fragment unless a newer navigation superseded it
    pub fn commit(&mut self, page: &mut Page, ticket: &Ticket, html: &str) -> SiteResult<Commit> {
        if ticket.seq != self.latest {
            tracing::debug!(
                "Discarding stale {} (navigation #{}, latest #{})",
                ticket.route,
                ticket.seq,
                self.latest
            );
            return Ok(Commit::Stale);
        }

        match self.render(page, ticket, html) {
            Ok(bindings) => {
                self.state = PageState::Idle;
                Ok(Commit::Applied(bindings))
            }
            Err(e) => {
                self.state = PageState::Error;
                Err(e)
            }
        }
    }

    fn render(&mut self, page: &mut Page, ticket: &Ticket, html: &str) -> SiteResult<PageBindings> {
        let main = page.document.query("main")?;
        let bindings = match main {
            Some(main) => {
                ong_html::set_inner_html(&mut page.document, main, html)?;
                self.current_page = ticket.route.clone();
                self.initializers.run(&ticket.route, &mut page.document, main)?
            }
            None => {
                tracing::warn!("Page has no <main>; {} not rendered", ticket.route);
                self.current_page = ticket.route.clone();
                PageBindings::new(&ticket.route)
            }
        };

        self.state = PageState::Rendered;
        page.viewport.scroll_to_top();
        hide_loading(&mut page.document)?;
        Ok(bindings)
    }

    /// Fetch and render `name`, falling back to the 404 page on failure
    pub async fn load_page<S: TemplateSource>(
        &mut self,
        page: &mut Page,
        templates: &Templates<S>,
        name: &str,
    ) -> SiteResult<Commit> {
        let ticket = self.begin(page, name)?;
        let html = self.fetch(templates, &ticket).await;
        match self.commit(page, &ticket, &html) {
            Err(e) if ticket.route != NOT_FOUND => {
                tracing::error!("Failed to load page {}: {}", ticket.route, e);
                Box::pin(self.load_page(page, templates, NOT_FOUND)).await
            }
            result => result,
        }
    }

    /// Navigate to `name`, pushing a history entry
    pub async fn navigate_to<S: TemplateSource>(
        &mut self,
        page: &mut Page,
        templates: &Templates<S>,
        name: &str,
    ) -> SiteResult<Commit> {
        self.history.push_state(&format!("#{name}"));
        self.load_page(page, templates, name).await
    }

    /// Render the page for the current history entry
    pub async fn start<S: TemplateSource>(&mut self, page: &mut Page, templates: &Templates<S>) -> SiteResult<Commit> {
        let route = RouteTable::current_route(self.history.current());
        self.load_page(page, templates, &route).await
    }

    /// The location hash changed through history traversal
    pub async fn pop_state<S: TemplateSource>(
        &mut self,
        page: &mut Page,
        templates: &Templates<S>,
        hash: &str,
    ) -> SiteResult<Commit> {
        self.load_page(page, templates, &RouteTable::current_route(hash)).await
    }

    /// History back; `None` at the start of history
    pub async fn back<S: TemplateSource>(
        &mut self,
        page: &mut Page,
        templates: &Templates<S>,
    ) -> SiteResult<Option<Commit>> {
        let Some(hash) = self.history.go_back() else {
            return Ok(None);
        };
        self.pop_state(page, templates, &hash).await.map(Some)
    }

    /// History forward; `None` at the end of history
    pub async fn forward<S: TemplateSource>(
        &mut self,
        page: &mut Page,
        templates: &Templates<S>,
    ) -> SiteResult<Option<Commit>> {
        let Some(hash) = self.history.go_forward() else {
            return Ok(None);
        };
        self.pop_state(page, templates, &hash).await.map(Some)
    }
}

/// Route a click on `target` navigates to, if it is on a `[data-link]`
pub fn link_route(doc: &Document, target: NodeId) -> SiteResult<Option<String>> {
    let Some(link) = doc.closest(target, "[data-link]")? else {
        return Ok(None);
    };
    let href = doc.attr(link, "href").unwrap_or("");
    let route = match href.strip_prefix('#').unwrap_or(href) {
        "" => HOME,
        route => route,
    };
    Ok(Some(route.to_string()))
}

/// Show `#global-loader`, creating it on first use
pub fn show_loading(doc: &mut Document) -> SiteResult<()> {
    let loader = match doc.get_element_by_id(LOADER_ID) {
        Some(loader) => loader,
        None => {
            let Some(body) = doc.body() else {
                return Ok(());
            };
            let loader = doc.create_element("div");
            doc.set_attr(loader, "id", LOADER_ID)?;
            let wrap = doc.create_element("div");
            doc.set_attr(wrap, "class", "loading-spinner")?;
            let spinner = doc.create_element("div");
            doc.set_attr(spinner, "class", "spinner")?;
            let text = doc.create_element("p");
            doc.set_text_content(text, "Carregando...")?;
            doc.append_child(wrap, spinner)?;
            doc.append_child(wrap, text)?;
            doc.append_child(loader, wrap)?;
            doc.append_child(body, loader)?
        }
    };
    doc.set_style(loader, "display", "flex")?;
    Ok(())
}

pub fn hide_loading(doc: &mut Document) -> SiteResult<()> {
    if let Some(loader) = doc.get_element_by_id(LOADER_ID) {
        doc.set_style(loader, "display", "none")?;
    }
    Ok(())
}

/// Whether the loader is currently shown
pub fn is_loading(doc: &Document) -> bool {
    doc.get_element_by_id(LOADER_ID)
        .is_some_and(|l| doc.style(l, "display").as_deref() == Some("flex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::MemorySource;

    fn setup() -> (Spa, Page, Templates<MemorySource>) {
        let doc = ong_html::parse(crate::templates::SHELL_HTML).unwrap();
        let spa = Spa::new(RouteTable::new(), History::new(""));
        (spa, Page::new(doc), Templates::new(None))
    }

    #[test]
    fn test_link_route() {
        let doc = ong_html::parse(
            r##"<a id="a" href="#sobre" data-link><span id="s">x</span></a>
                <a id="b" href="#" data-link>y</a><a id="c" href="#x">z</a>"##,
        )
        .unwrap();
        let s = doc.get_element_by_id("s").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        let c = doc.get_element_by_id("c").unwrap();
        assert_eq!(link_route(&doc, s).unwrap().as_deref(), Some("sobre"));
        assert_eq!(link_route(&doc, b).unwrap().as_deref(), Some("home"));
        assert_eq!(link_route(&doc, c).unwrap(), None);
    }

    #[test]
    fn test_loader_lifecycle() {
        let (mut spa, mut page, templates) = setup();
        let ticket = spa.begin(&mut page, "sobre").unwrap();
        assert!(is_loading(&page.document));
        assert_eq!(spa.state(), PageState::Loading);

        let html = smol::block_on(spa.fetch(&templates, &ticket));
        assert!(spa.commit(&mut page, &ticket, &html).unwrap().is_applied());
        assert!(!is_loading(&page.document));
        assert_eq!(spa.state(), PageState::Idle);
        assert_eq!(page.document.query_all("#global-loader").unwrap().len(), 1);
    }

    #[test]
    fn test_stale_ticket_discarded() {
        let (mut spa, mut page, templates) = setup();
        let first = spa.begin(&mut page, "sobre").unwrap();
        let second = spa.begin(&mut page, "contato").unwrap();
        assert!(second.seq() > first.seq());

        let contato = smol::block_on(spa.fetch(&templates, &second));
        let sobre = smol::block_on(spa.fetch(&templates, &first));
        assert!(spa.commit(&mut page, &second, &contato).unwrap().is_applied());
        assert_eq!(spa.commit(&mut page, &first, &sobre).unwrap(), Commit::Stale);
        assert_eq!(spa.current_page(), "contato");
        assert_eq!(spa.state(), PageState::Idle);
    }

    #[test]
    fn test_no_main_skips_render() {
        let doc = ong_html::parse("<body><p>sem main</p></body>").unwrap();
        let mut page = Page::new(doc);
        let mut spa = Spa::new(RouteTable::new(), History::new(""));
        let templates: Templates<MemorySource> = Templates::new(None);

        let commit = smol::block_on(spa.load_page(&mut page, &templates, "sobre")).unwrap();
        assert!(commit.is_applied());
        assert_eq!(spa.current_page(), "sobre");
        assert!(page.document.to_html().contains("sem main"));
    }
}
