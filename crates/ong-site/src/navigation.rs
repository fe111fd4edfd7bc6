//! Mobile navigation drawer, dropdowns and in-page anchors

use ong_dom::{Document, NodeId};

use crate::page::Page;
use crate::SiteResult;

/// Header navigation behavior
#[derive(Debug, Clone, Default)]
pub struct Navigation;

impl Navigation {
    pub fn new() -> Self {
        Self
    }

    /// Whether the drawer is open
    pub fn is_open(&self, doc: &Document) -> SiteResult<bool> {
        Ok(doc
            .query(".nav-menu")?
            .is_some_and(|menu| doc.has_class(menu, "active")))
    }

    /// Handle a click. Returns whether the default action is prevented.
    pub fn handle_click(&self, page: &mut Page, target: NodeId) -> SiteResult<bool> {
        let doc = &mut page.document;
        if let (Some(hamburger), Some(menu)) = (doc.query(".hamburger")?, doc.query(".nav-menu")?) {
            if doc.tree().contains(hamburger, target) {
                let open = doc.toggle_class(hamburger, "active")?;
                if open {
                    doc.add_class(menu, "active")?;
                } else {
                    doc.remove_class(menu, "active")?;
                }
                set_scroll_lock(doc, open)?;
            } else if doc.closest(target, ".nav-link")?.is_some() || !doc.tree().contains(menu, target) {
                self.close(doc)?;
            }
        }

        if !doc.matches(target, ".nav-link")? {
            for dropdown in doc.query_all(".dropdown-menu")? {
                doc.set_style(dropdown, "opacity", "0")?;
                doc.set_style(dropdown, "visibility", "hidden")?;
            }
        }

        let Some(anchor) = doc.closest(target, "a[href^=\"#\"]")? else {
            return Ok(false);
        };
        if doc.has_attr(anchor, "data-link") {
            return Ok(false);
        }
        let id = doc.attr(anchor, "href").unwrap_or("#").trim_start_matches('#').to_string();
        if let Some(section) = (!id.is_empty()).then(|| doc.get_element_by_id(&id)).flatten() {
            page.viewport.scroll_into_view(section);
        }
        Ok(true)
    }

    /// Close the drawer
    pub fn close(&self, doc: &mut Document) -> SiteResult<()> {
        for selector in [".hamburger", ".nav-menu"] {
            if let Some(node) = doc.query(selector)? {
                doc.remove_class(node, "active")?;
            }
        }
        set_scroll_lock(doc, false)
    }
}

fn set_scroll_lock(doc: &mut Document, locked: bool) -> SiteResult<()> {
    if let Some(body) = doc.body() {
        doc.set_style(body, "overflow", if locked { "hidden" } else { "" })?;
    }
    Ok(())
}
