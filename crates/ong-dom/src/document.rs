//! Document - High-level document API

use crate::{DomError, DomResult, DomTree, NodeId, SelectorList};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Focused element
    active_element: Option<NodeId>,
}

impl Document {
    /// Create a document with the `<!DOCTYPE html><html><head><body>` skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let root = doc.tree.root();
        let doctype = doc.tree.create_doctype("html");
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Fresh nodes under a fresh root cannot violate the hierarchy
        let _ = doc.tree.append_child(root, doctype);
        let _ = doc.tree.append_child(root, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.finalize();
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            active_element: None,
        }
    }

    /// Re-locate `<html>`, `<head>` and `<body>` after the tree was built
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .element_children(root)
            .find(|&c| self.tree.tag_name(c) == Some("html"))
            .unwrap_or(NodeId::NONE);

        let find = |tag: &str| {
            self.html_element
                .get()
                .and_then(|html| {
                    self.tree
                        .element_children(html)
                        .find(|&c| self.tree.tag_name(c) == Some(tag))
                })
                .unwrap_or(NodeId::NONE)
        };
        let head = find("head");
        let body = find("body");
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.head()
            .and_then(|head| {
                self.tree
                    .element_children(head)
                    .find(|&c| self.tree.tag_name(c) == Some("title"))
            })
            .map(|t| self.tree.text_content(t).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.get()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.get()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.get()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ---- construction shortcuts ----

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.tree.create_element(name)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.append_child(parent, child)
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.prepend_child(parent, child)
    }

    /// Detach a node from wherever it is attached (`element.remove()`)
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        if self.active_element.is_some_and(|f| self.tree.contains(node, f)) {
            self.active_element = None;
        }
        self.tree.detach(node)
    }

    /// Whether a node is attached to the document
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.contains(self.tree.root(), node)
    }

    // ---- queries ----

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    /// First element under `root` matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .tree
            .descendants(root)
            .find(|&n| list.matches(&self.tree, n)))
    }

    /// All elements under `root` matching `selector`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .tree
            .descendants(root)
            .filter(|&n| list.matches(&self.tree, n))
            .collect())
    }

    /// Query the whole document
    pub fn query(&self, selector: &str) -> DomResult<Option<NodeId>> {
        self.query_selector(self.tree.root(), selector)
    }

    /// Query the whole document for all matches
    pub fn query_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        self.query_selector_all(self.tree.root(), selector)
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        let list = SelectorList::parse(selector)?;
        Ok(list.matches(&self.tree, node))
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, node: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .find(|&n| list.matches(&self.tree, n)))
    }

    // ---- element helpers ----

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tree.tag_name(node)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.element(node)?.get_attr(name)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.element_mut(node)?.remove_attr(name))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        self.element_mut(node)?.add_class(class);
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        self.element_mut(node)?.remove_class(class);
        Ok(())
    }

    /// Toggle a class; returns whether it is present afterwards
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        Ok(self.element_mut(node)?.toggle_class(class))
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree.element(node)?.style(property)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> DomResult<()> {
        self.element_mut(node)?.set_style(property, value);
        Ok(())
    }

    fn element_mut(&mut self, node: NodeId) -> DomResult<&mut crate::ElementData> {
        self.tree.element_mut(node).ok_or(DomError::InvalidNodeType)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        self.tree.set_text_content(node, text)
    }

    // ---- focus ----

    /// Focus an element
    pub fn focus(&mut self, node: NodeId) {
        if self.tree.is_element(node) {
            self.active_element = Some(node);
        }
    }

    pub fn blur(&mut self) {
        self.active_element = None;
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    // ---- serialization ----

    pub fn inner_html(&self, node: NodeId) -> String {
        self.tree.inner_html(node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        self.tree.outer_html(node)
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        self.tree.outer_html(self.tree.root())
    }

    // ---- form controls ----

    /// Current value of a form control
    pub fn value(&self, node: NodeId) -> String {
        match self.tag_name(node) {
            Some("textarea") => self.text_content(node),
            Some("select") => self
                .selected_option(node)
                .map(|opt| self.option_value(opt))
                .unwrap_or_default(),
            _ => self.attr(node, "value").unwrap_or("").to_string(),
        }
    }

    /// Set the value of a form control
    pub fn set_value(&mut self, node: NodeId, value: &str) -> DomResult<()> {
        match self.tag_name(node) {
            Some("textarea") => self.set_text_content(node, value),
            Some("select") => {
                let options: Vec<_> = self
                    .tree
                    .descendants(node)
                    .filter(|&n| self.tag_name(n) == Some("option"))
                    .collect();
                let mut chosen = false;
                for opt in options {
                    if !chosen && self.option_value(opt) == value {
                        self.set_attr(opt, "selected", "")?;
                        chosen = true;
                    } else {
                        self.remove_attr(opt, "selected")?;
                    }
                }
                Ok(())
            }
            Some(_) => self.set_attr(node, "value", value),
            None => Err(DomError::InvalidNodeType),
        }
    }

    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let mut options = self
            .tree
            .descendants(select)
            .filter(|&n| self.tag_name(n) == Some("option"));
        let first = options.next()?;
        std::iter::once(first)
            .chain(options)
            .find(|&o| self.has_attr(o, "selected"))
            .or(Some(first))
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => self.text_content(option).trim().to_string(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("file:///index.html");
        assert!(doc.document_element().is_some());
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.to_html(), "<!DOCTYPE html><html><head></head><body></body></html>");
    }

    #[test]
    fn test_closest_includes_self() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let a = doc.create_element("a");
        doc.set_attr(a, "data-link", "").unwrap();
        let span = doc.create_element("span");
        doc.append_child(body, a).unwrap();
        doc.append_child(a, span).unwrap();

        assert_eq!(doc.closest(a, "[data-link]").unwrap(), Some(a));
        assert_eq!(doc.closest(span, "[data-link]").unwrap(), Some(a));
        assert_eq!(doc.closest(body, "[data-link]").unwrap(), None);
    }

    #[test]
    fn test_select_value() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let select = doc.create_element("select");
        doc.append_child(body, select).unwrap();
        for v in ["", "educacao", "saude"] {
            let opt = doc.create_element("option");
            doc.set_attr(opt, "value", v).unwrap();
            doc.append_child(select, opt).unwrap();
        }
        assert_eq!(doc.value(select), "");
        doc.set_value(select, "saude").unwrap();
        assert_eq!(doc.value(select), "saude");
    }

    #[test]
    fn test_remove_clears_focus() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let input = doc.create_element("input");
        doc.append_child(body, input).unwrap();
        doc.focus(input);
        assert_eq!(doc.active_element(), Some(input));
        doc.remove(input).unwrap();
        assert_eq!(doc.active_element(), None);
        assert!(!doc.is_connected(input));
    }
}
