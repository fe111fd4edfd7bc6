//! ONG DOM - Document Object Model
//!
//! Arena-based DOM tree for the site runtime. Nodes live in a single `Vec`
//! and refer to each other through [`NodeId`] indices, so a rendered page can
//! be swapped, queried and annotated without reference counting.

mod document;
mod error;
mod node;
mod selector;
mod serialize;
mod tree;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use selector::{AttrMatch, AttrOp, Combinator, Compound, Selector, SelectorList};
pub use serialize::{escape_attr, escape_text, is_raw_text_element, is_void_element};
pub use tree::{Ancestors, Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" in tree links
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Position in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert a sentinel link into an `Option`
    #[inline]
    pub(crate) fn get(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
