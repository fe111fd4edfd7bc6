//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use ong_dom::{Document, DomTree, NodeId};

use crate::HtmlError;

/// Tree-building options
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Keep whitespace-only text nodes outside `<pre>`/`<textarea>`
    pub keep_whitespace: bool,
    /// Keep comment nodes
    pub keep_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_whitespace: false,
            keep_comments: true,
        }
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        let root = document.tree.root();
        self.convert_node(&dom.document, &mut document.tree, root, false)?;
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree.len());
        Ok(document)
    }

    /// Parse a body fragment into a standalone document; the fragment's
    /// top-level nodes are the children of the returned document's `<body>`.
    pub fn parse_fragment(&self, html: &str) -> Result<Document, HtmlError> {
        let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
        self.parse(&wrapped)
    }

    /// Replace the children of `node` with the parsed fragment
    pub fn set_inner_html(
        &self,
        doc: &mut Document,
        node: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, HtmlError> {
        let fragment = self.parse_fragment(html)?;

        let old: Vec<NodeId> = doc.tree.children(node).collect();
        for child in old {
            doc.remove(child)?;
        }

        let Some(body) = fragment.body() else {
            return Ok(Vec::new());
        };
        let mut inserted = Vec::new();
        for child in fragment.tree.children(body) {
            let copy = doc.tree.import(&fragment.tree, child)?;
            doc.append_child(node, copy)?;
            inserted.push(copy);
        }
        tracing::debug!("Inserted {} nodes into {:?}", inserted.len(), node);
        Ok(inserted)
    }

    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
        preformatted: bool,
    ) -> Result<(), HtmlError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent, preformatted)?;
                }
            }
            RcNodeData::Doctype { name, .. } => {
                let id = tree.create_doctype(name);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if preformatted || self.options.keep_whitespace || !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                if self.options.keep_comments {
                    let id = tree.create_comment(contents);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Element { name, attrs, .. } => {
                let local: &str = &name.local;
                let id = tree.create_element(local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                tree.append_child(parent, id)?;

                let pre = preformatted || matches!(local, "pre" | "textarea");
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id, pre)?;
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();
        assert_eq!(doc.title(), "Test");
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_whitespace_dropped_by_default() {
        let doc = HtmlParser::new().parse("<ul>\n  <li>a</li>\n</ul>").unwrap();
        let ul = doc.query("ul").unwrap().unwrap();
        assert_eq!(doc.inner_html(ul), "<li>a</li>");
    }

    #[test]
    fn test_whitespace_kept_in_pre() {
        let doc = HtmlParser::new().parse("<pre>\n  </pre>").unwrap();
        let pre = doc.query("pre").unwrap().unwrap();
        assert_eq!(doc.text_content(pre), "  ");
    }

    #[test]
    fn test_keep_whitespace_option() {
        let parser = HtmlParser::with_options(ParseOptions {
            keep_whitespace: true,
            keep_comments: false,
        });
        let doc = parser.parse("<p><b>a</b> <i>b</i><!-- x --></p>").unwrap();
        let p = doc.query("p").unwrap().unwrap();
        assert_eq!(doc.inner_html(p), "<b>a</b> <i>b</i>");
    }
}
