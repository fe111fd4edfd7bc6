//! CSS selector subset
//!
//! Supports what the site scripts query with: type, universal, `#id`,
//! `.class`, attribute tests (`[a]`, `=`, `^=`, `$=`, `*=`, `~=`), `:not()`,
//! descendant and child combinators, and comma-separated lists.

use crate::{DomError, DomResult, DomTree, ElementData, NodeId};

/// Attribute comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Exists,
    Equals,
    Prefix,
    Suffix,
    Substring,
    Includes,
}

/// `[name op value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
}

impl AttrMatch {
    fn matches(&self, elem: &ElementData) -> bool {
        let Some(actual) = elem.get_attr(&self.name) else {
            return false;
        };
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == self.value,
            AttrOp::Prefix => !self.value.is_empty() && actual.starts_with(&self.value),
            AttrOp::Suffix => !self.value.is_empty() && actual.ends_with(&self.value),
            AttrOp::Substring => !self.value.is_empty() && actual.contains(&self.value),
            AttrOp::Includes => actual.split_whitespace().any(|w| w == self.value),
        }
    }
}

/// Compound selector (no combinators)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    /// Lowercase tag, `None` for `*` or omitted
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
    pub not: Vec<Compound>,
}

impl Compound {
    pub fn matches(&self, elem: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if elem.name != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| elem.has_class(c))
            && self.attrs.iter().all(|a| a.matches(elem))
            && !self.not.iter().any(|n| n.matches(elem))
    }
}

/// Relationship between a compound and the one to its left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// Complex selector, stored left to right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// First compound
    pub head: Compound,
    /// Following `(combinator, compound)` pairs
    pub tail: Vec<(Combinator, Compound)>,
}

impl Selector {
    /// Match against an element node
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let mut parts: Vec<&Compound> = vec![&self.head];
        let mut combs: Vec<Combinator> = Vec::new();
        for (c, comp) in &self.tail {
            combs.push(*c);
            parts.push(comp);
        }
        match_from(tree, node, &parts, &combs)
    }
}

// Right-to-left match of parts[..=n] ending at `node`
fn match_from(tree: &DomTree, node: NodeId, parts: &[&Compound], combs: &[Combinator]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return true;
    };
    let Some(elem) = tree.element(node) else {
        return false;
    };
    if !last.matches(elem) {
        return false;
    }
    let Some((comb, rest_combs)) = combs.split_last() else {
        return true;
    };

    match comb {
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|p| match_from(tree, p, rest, rest_combs)),
        Combinator::Descendant => tree
            .ancestors(node)
            .any(|a| match_from(tree, a, rest, rest_combs)),
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Selector>);

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> DomResult<Self> {
        let mut parser = Parser {
            src: input,
            chars: input.char_indices().collect(),
            pos: 0,
        };
        let list = parser.list().inspect_err(|e| tracing::debug!("Selector rejected: {}", e))?;
        Ok(Self(list))
    }

    /// True if any selector in the list matches
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(tree, node))
    }
}

struct Parser<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> DomError {
        DomError::InvalidSelector {
            selector: self.src.to_string(),
            reason: reason.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> DomResult<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(out)
    }

    fn list(&mut self) -> DomResult<Vec<Selector>> {
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            out.push(self.complex()?);
            self.skip_ws();
            match self.bump() {
                None => return Ok(out),
                Some(',') => continue,
                Some(_) => return Err(self.error("unexpected character")),
            }
        }
    }

    fn complex(&mut self) -> DomResult<Selector> {
        let head = self.compound()?;
        let mut tail = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let comb = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            };
            tail.push((comb, self.compound()?));
        }
        Ok(Selector { head, tail })
    }

    fn compound(&mut self) -> DomResult<Compound> {
        let mut comp = Compound::default();
        let mut any = false;

        if self.eat('*') {
            any = true;
        } else if self.peek().is_some_and(|c| c.is_alphabetic()) {
            comp.tag = Some(self.ident()?.to_ascii_lowercase());
            any = true;
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    comp.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    comp.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    comp.attrs.push(self.attr()?);
                }
                Some(':') => {
                    self.pos += 1;
                    let name = self.ident()?;
                    if !name.eq_ignore_ascii_case("not") || !self.eat('(') {
                        return Err(self.error("unsupported pseudo-class"));
                    }
                    self.skip_ws();
                    comp.not.push(self.compound()?);
                    self.skip_ws();
                    if !self.eat(')') {
                        return Err(self.error("expected `)`"));
                    }
                }
                _ => break,
            }
            any = true;
        }

        if !any {
            return Err(self.error("empty selector"));
        }
        Ok(comp)
    }

    fn attr(&mut self) -> DomResult<AttrMatch> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrMatch {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                });
            }
            Some('=') => AttrOp::Equals,
            Some('^') => AttrOp::Prefix,
            Some('$') => AttrOp::Suffix,
            Some('*') => AttrOp::Substring,
            Some('~') => AttrOp::Includes,
            _ => return Err(self.error("bad attribute operator")),
        };
        self.pos += 1;
        if op != AttrOp::Equals && !self.eat('=') {
            return Err(self.error("bad attribute operator"));
        }
        self.skip_ws();

        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let mut v = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == q => break,
                        Some(c) => v.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                v
            }
            _ => self.ident()?,
        };
        self.skip_ws();
        if !self.eat(']') {
            return Err(self.error("expected `]`"));
        }
        Ok(AttrMatch { name, op, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let list = SelectorList::parse("button.filter-btn.active[data-filter=\"all\"]").unwrap();
        let sel = &list.0[0];
        assert_eq!(sel.head.tag.as_deref(), Some("button"));
        assert_eq!(sel.head.classes, vec!["filter-btn", "active"]);
        assert_eq!(sel.head.attrs[0].op, AttrOp::Equals);
        assert_eq!(sel.head.attrs[0].value, "all");
        assert!(sel.tail.is_empty());
    }

    #[test]
    fn test_parse_list_and_combinators() {
        let list = SelectorList::parse("a[href^=\"#\"], .nav-menu > .nav-item a").unwrap();
        assert_eq!(list.0.len(), 2);
        assert_eq!(list.0[0].head.attrs[0].op, AttrOp::Prefix);
        let second = &list.0[1];
        assert_eq!(second.tail.len(), 2);
        assert_eq!(second.tail[0].0, Combinator::Child);
        assert_eq!(second.tail[1].0, Combinator::Descendant);
    }

    #[test]
    fn test_parse_not() {
        let list = SelectorList::parse("[tabindex]:not([tabindex=\"-1\"])").unwrap();
        let head = &list.0[0].head;
        assert_eq!(head.attrs[0].op, AttrOp::Exists);
        assert_eq!(head.not.len(), 1);
        assert_eq!(head.not[0].attrs[0].value, "-1");
    }

    #[test]
    fn test_parse_errors() {
        assert!(SelectorList::parse("").is_err());
        assert!(SelectorList::parse("div,").is_err());
        assert!(SelectorList::parse("a:hover").is_err());
        assert!(SelectorList::parse("[href").is_err());
        assert!(matches!(
            SelectorList::parse("div >"),
            Err(DomError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_match_tree() {
        let mut tree = DomTree::new();
        let nav = tree.create_element("nav");
        tree.element_mut(nav).unwrap().add_class("nav-menu");
        let li = tree.create_element("li");
        tree.element_mut(li).unwrap().add_class("nav-item");
        let a = tree.create_element("a");
        tree.element_mut(a).unwrap().set_attr("href", "#sobre");
        tree.append_child(tree.root(), nav).unwrap();
        tree.append_child(nav, li).unwrap();
        tree.append_child(li, a).unwrap();

        let desc = SelectorList::parse(".nav-menu a").unwrap();
        assert!(desc.matches(&tree, a));
        let child = SelectorList::parse(".nav-menu > a").unwrap();
        assert!(!child.matches(&tree, a));
        let attr = SelectorList::parse("a[href$=bre]").unwrap();
        assert!(attr.matches(&tree, a));
        let not = SelectorList::parse("a:not([href])").unwrap();
        assert!(!not.matches(&tree, a));
    }
}
