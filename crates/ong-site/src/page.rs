//! Page - the document plus its viewport

use std::collections::HashMap;

use ong_dom::{Document, NodeId};

/// Element box in client coordinates, as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Scroll state and host-reported layout
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Last element brought into view
    pub scrolled_into_view: Option<NodeId>,
    rects: HashMap<NodeId, Rect>,
}

impl Viewport {
    /// `window.scrollTo(0, 0)`
    pub fn scroll_to_top(&mut self) {
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
        self.scrolled_into_view = None;
    }

    /// `element.scrollIntoView()`
    pub fn scroll_into_view(&mut self, node: NodeId) {
        if let Some(rect) = self.rects.get(&node) {
            self.scroll_y += rect.y;
        }
        self.scrolled_into_view = Some(node);
    }

    /// Record an element's bounding box
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.rects.insert(node, rect);
    }

    /// `element.getBoundingClientRect()`; unknown elements have an empty box
    pub fn rect(&self, node: NodeId) -> Rect {
        self.rects.get(&node).copied().unwrap_or_default()
    }
}

/// A loaded page
#[derive(Debug, Clone)]
pub struct Page {
    pub document: Document,
    pub viewport: Viewport,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            viewport: Viewport::default(),
        }
    }

    /// Page URL
    pub fn url(&self) -> &str {
        self.document.url()
    }

    /// Get the page title
    pub fn title(&self) -> String {
        self.document.title()
    }
}
