//! HTML minifier
//!
//! Parses the page, then re-serializes it compactly: comments are dropped,
//! whitespace runs collapse to one space (and disappear next to block
//! boundaries), safe attribute values lose their quotes and the doctype is
//! shortened. `<pre>`/`<textarea>` content is left untouched; inline
//! `<style>` and `<script>` bodies go through the configured hooks.

use ong_dom::{escape_attr, escape_text, is_void_element, Document, DomTree, NodeData, NodeId};

use crate::{HtmlError, HtmlParser, ParseOptions};

/// Transform applied to inline CSS or JS; the error string is reported as
/// [`HtmlError::InlineContent`].
pub type InlineHook<'a> = Box<dyn Fn(&str) -> Result<String, String> + 'a>;

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hr", "html", "legend", "li", "link", "main", "meta", "nav", "noscript",
    "ol", "option", "p", "pre", "script", "section", "style", "table", "tbody", "td", "tfoot",
    "th", "thead", "title", "tr", "ul",
];

const JS_TYPES: &[&str] = &["", "text/javascript", "application/javascript", "module"];

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

/// HTML minifier with optional inline CSS/JS hooks
#[derive(Default)]
pub struct HtmlMinifier<'a> {
    css: Option<InlineHook<'a>>,
    js: Option<InlineHook<'a>>,
}

impl<'a> HtmlMinifier<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minify `<style>` bodies with `hook`
    pub fn with_css(mut self, hook: impl Fn(&str) -> Result<String, String> + 'a) -> Self {
        self.css = Some(Box::new(hook));
        self
    }

    /// Minify `<script>` bodies with `hook`
    pub fn with_js(mut self, hook: impl Fn(&str) -> Result<String, String> + 'a) -> Self {
        self.js = Some(Box::new(hook));
        self
    }

    /// Minify a full HTML document
    pub fn minify(&self, html: &str) -> Result<String, HtmlError> {
        let parser = HtmlParser::with_options(ParseOptions {
            keep_whitespace: true,
            keep_comments: false,
        });
        let doc: Document = parser.parse(html)?;

        let mut out = String::with_capacity(html.len());
        let root = doc.tree.root();
        for child in doc.tree.children(root) {
            self.write_node(&doc.tree, child, &mut out)?;
        }

        tracing::debug!("Minified HTML {} -> {} bytes", html.len(), out.len());
        Ok(out)
    }

    fn write_node(&self, tree: &DomTree, id: NodeId, out: &mut String) -> Result<(), HtmlError> {
        let Some(node) = tree.get(id) else {
            return Ok(());
        };
        match &node.data {
            NodeData::Document | NodeData::Comment(_) => {}
            NodeData::Doctype { .. } => out.push_str("<!doctype html>"),
            NodeData::Text(text) => self.write_text(tree, id, text, out)?,
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.name);
                for attr in &elem.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if attr.value.is_empty() {
                        continue;
                    }
                    out.push('=');
                    let value = escape_attr(&attr.value);
                    if needs_quotes(&value) {
                        out.push('"');
                        out.push_str(&value);
                        out.push('"');
                    } else {
                        out.push_str(&value);
                    }
                }
                out.push('>');
                if is_void_element(&elem.name) {
                    return Ok(());
                }
                for child in tree.children(id) {
                    self.write_node(tree, child, out)?;
                }
                out.push_str("</");
                out.push_str(&elem.name);
                out.push('>');
            }
        }
        Ok(())
    }

    fn write_text(
        &self,
        tree: &DomTree,
        id: NodeId,
        text: &str,
        out: &mut String,
    ) -> Result<(), HtmlError> {
        let parent = tree.parent(id);
        let parent_tag = parent.and_then(|p| tree.tag_name(p)).unwrap_or("");

        match parent_tag {
            "style" => {
                out.push_str(&run_hook(self.css.as_ref(), "style", text)?);
                return Ok(());
            }
            "script" => {
                let kind = parent
                    .and_then(|p| tree.element(p))
                    .and_then(|e| e.get_attr("type"))
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if JS_TYPES.contains(&kind.as_str()) {
                    out.push_str(&run_hook(self.js.as_ref(), "script", text)?);
                } else {
                    out.push_str(text);
                }
                return Ok(());
            }
            _ => {}
        }

        if std::iter::once(id)
            .chain(tree.ancestors(id))
            .any(|n| matches!(tree.tag_name(n), Some("pre" | "textarea")))
        {
            out.push_str(&escape_text(text));
            return Ok(());
        }

        let block_before = match tree.prev_sibling(id) {
            Some(prev) => tree.tag_name(prev).is_some_and(is_block),
            None => parent_tag.is_empty() || is_block(parent_tag),
        };
        let block_after = match tree.next_sibling(id) {
            Some(next) => tree.tag_name(next).is_some_and(is_block),
            None => parent_tag.is_empty() || is_block(parent_tag),
        };

        let mut collapsed = collapse_whitespace(text);
        if block_before && collapsed.starts_with(' ') {
            collapsed.remove(0);
        }
        if block_after && collapsed.ends_with(' ') {
            collapsed.pop();
        }
        out.push_str(&escape_text(&collapsed));
        Ok(())
    }
}

fn run_hook(hook: Option<&InlineHook<'_>>, element: &str, content: &str) -> Result<String, HtmlError> {
    match hook {
        Some(hook) if !content.trim().is_empty() => {
            hook(content).map_err(|reason| HtmlError::InlineContent {
                element: element.to_string(),
                reason,
            })
        }
        _ => Ok(content.to_string()),
    }
}

/// Collapse every whitespace run into a single space
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

/// Whether an (already escaped) attribute value must stay quoted
fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '`'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("\n  "), " ");
    }

    #[test]
    fn test_needs_quotes() {
        assert!(!needs_quotes("btn-primary"));
        assert!(!needs_quotes("#home"));
        assert!(needs_quotes("btn btn-primary"));
        assert!(needs_quotes("a=b"));
    }
}
