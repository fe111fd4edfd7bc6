//! Focus Management
//!
//! Skip link, focus wrapping and keyboard navigation in the main menu.

use ong_dom::{Document, NodeId};

use crate::{A11yError, Key, KeyEvent};

/// Elements reachable with Tab
pub const FOCUSABLE_SELECTOR: &str = "a[href], button:not([disabled]), input:not([disabled]), \
     select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

pub const MAIN_CONTENT_ID: &str = "main-content";

/// Result of keyboard handling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The host must not run the key's default action
    pub prevent_default: bool,
    /// Element to activate as if clicked
    pub activate: Option<NodeId>,
}

/// Prepend `a.skip-link` to `<body>` and give `<main>` its target id
pub fn install_skip_link(doc: &mut Document) -> Result<(), A11yError> {
    if doc.query(".skip-link")?.is_none() {
        let body = doc.body().ok_or(A11yError::MissingElement("body"))?;
        let link = doc.create_element("a");
        doc.set_attr(link, "href", &format!("#{MAIN_CONTENT_ID}"))?;
        doc.set_attr(link, "class", "skip-link")?;
        doc.set_text_content(link, "Pular para conteúdo principal")?;
        doc.prepend_child(body, link)?;
    }

    if let Some(main) = doc.query("main")? {
        if doc.attr(main, "id").is_none_or(str::is_empty) {
            doc.set_attr(main, "id", MAIN_CONTENT_ID)?;
        }
    }
    Ok(())
}

/// Focusable elements under `root`, in document order
pub fn focusable_elements(doc: &Document, root: NodeId) -> Result<Vec<NodeId>, A11yError> {
    Ok(doc.query_selector_all(root, FOCUSABLE_SELECTOR)?)
}

/// Keyboard handling: the menu item handler runs first, then the document one
pub fn handle_keydown(doc: &mut Document, event: &KeyEvent, target: NodeId) -> Result<KeyOutcome, A11yError> {
    let mut outcome = KeyOutcome::default();

    if let Some(item) = doc.closest(target, ".nav-item")? {
        outcome = menu_key(doc, event, item)?;
    }

    match event.key {
        Key::Escape => close_dropdowns(doc)?,
        Key::Tab => {
            if wrap_focus(doc, event.shift)? {
                outcome.prevent_default = true;
            }
        }
        _ => {}
    }
    Ok(outcome)
}

/// Hide every `.dropdown-menu`
pub fn close_dropdowns(doc: &mut Document) -> Result<(), A11yError> {
    for dropdown in doc.query_all(".dropdown-menu")? {
        doc.set_style(dropdown, "display", "none")?;
    }
    Ok(())
}

/// Wrap Tab focus at the ends of the focusable list, scoped to the open
/// modal when there is one. Returns whether focus was moved.
pub fn wrap_focus(doc: &mut Document, backwards: bool) -> Result<bool, A11yError> {
    let scope = match doc.query(".modal.show")? {
        Some(modal) => modal,
        None => doc.tree.root(),
    };
    let focusable = focusable_elements(doc, scope)?;
    let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
        return Ok(false);
    };

    let active = doc.active_element();
    if backwards && active == Some(first) {
        doc.focus(last);
        Ok(true)
    } else if !backwards && active == Some(last) {
        doc.focus(first);
        Ok(true)
    } else {
        Ok(false)
    }
}

fn menu_key(doc: &mut Document, event: &KeyEvent, item: NodeId) -> Result<KeyOutcome, A11yError> {
    let items = doc.query_all(".nav-item")?;
    let Some(index) = items.iter().position(|&i| i == item) else {
        return Ok(KeyOutcome::default());
    };
    let count = items.len();

    let target = match event.key {
        Key::ArrowDown | Key::ArrowRight => items[(index + 1) % count],
        Key::ArrowUp | Key::ArrowLeft => items[(index + count - 1) % count],
        Key::Enter | Key::Space => {
            let link = doc.query_selector(item, "a")?;
            return Ok(KeyOutcome {
                prevent_default: true,
                activate: link,
            });
        }
        _ => return Ok(KeyOutcome::default()),
    };

    if let Some(link) = doc.query_selector(target, "a")? {
        doc.focus(link);
    }
    Ok(KeyOutcome {
        prevent_default: true,
        activate: None,
    })
}
