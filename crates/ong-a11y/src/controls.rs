//! Header controls: high contrast and font size

use ong_dom::{Document, NodeId};

use crate::A11yError;

pub const CONTRAST_TOGGLE_ID: &str = "contrast-toggle";
pub const CONTRAST_CLASS: &str = "contrast-enhanced";

/// Root font size the controls step from
pub const BASE_FONT_PX: f32 = 16.0;
/// Size change per click
pub const FONT_STEP_PX: f32 = 2.0;

fn header(doc: &Document) -> Result<Option<NodeId>, A11yError> {
    Ok(doc.query("header")?)
}

fn button(doc: &mut Document, id: &str, label: &str, aria_label: Option<&str>) -> Result<NodeId, A11yError> {
    let btn = doc.create_element("button");
    doc.set_attr(btn, "id", id)?;
    doc.set_attr(btn, "class", "btn btn-ghost btn-sm")?;
    if let Some(aria) = aria_label {
        doc.set_attr(btn, "aria-label", aria)?;
    }
    doc.set_text_content(btn, label)?;
    Ok(btn)
}

/// `#contrast-toggle`, an `aria-pressed` button in the header
#[derive(Debug, Clone, Default)]
pub struct ContrastToggle;

impl ContrastToggle {
    /// Add the toggle to `<header>` unless present. Pages without a header
    /// get no toggle.
    pub fn install(doc: &mut Document) -> Result<Self, A11yError> {
        if doc.get_element_by_id(CONTRAST_TOGGLE_ID).is_some() {
            return Ok(Self);
        }
        if let Some(header) = header(doc)? {
            let btn = button(doc, CONTRAST_TOGGLE_ID, "🌗 Alto Contraste", None)?;
            doc.set_attr(btn, "aria-pressed", "false")?;
            doc.append_child(header, btn)?;
        }
        Ok(Self)
    }

    /// Whether high contrast is on
    pub fn is_enabled(doc: &Document) -> bool {
        doc.document_element()
            .is_some_and(|html| doc.has_class(html, CONTRAST_CLASS))
    }

    /// Handle a click; returns the message to announce
    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> Result<Option<&'static str>, A11yError> {
        let Some(toggle) = doc.closest(target, "#contrast-toggle")? else {
            return Ok(None);
        };
        let pressed = doc.attr(toggle, "aria-pressed") == Some("true");
        let message = self.set_enabled(doc, !pressed)?;
        doc.set_attr(toggle, "aria-pressed", if pressed { "false" } else { "true" })?;
        Ok(Some(message))
    }

    /// Switch high contrast on or off
    pub fn set_enabled(&self, doc: &mut Document, enable: bool) -> Result<&'static str, A11yError> {
        let html = doc.document_element().ok_or(A11yError::MissingElement("html"))?;
        if enable {
            doc.add_class(html, CONTRAST_CLASS)?;
            Ok("Modo de alto contraste ativado")
        } else {
            doc.remove_class(html, CONTRAST_CLASS)?;
            Ok("Modo de alto contraste desativado")
        }
    }
}

/// `A-` / `A` / `A+` buttons in the header
#[derive(Debug, Clone, Default)]
pub struct FontSizeControls;

impl FontSizeControls {
    pub fn install(doc: &mut Document) -> Result<Self, A11yError> {
        if doc.get_element_by_id("font-increase").is_some() {
            return Ok(Self);
        }
        let Some(header) = header(doc)? else {
            return Ok(Self);
        };

        let group = doc.create_element("div");
        doc.set_attr(group, "class", "font-size-controls")?;
        for (id, label, aria) in [
            ("font-decrease", "A-", "Diminuir tamanho da fonte"),
            ("font-reset", "A", "Tamanho normal da fonte"),
            ("font-increase", "A+", "Aumentar tamanho da fonte"),
        ] {
            let btn = button(doc, id, label, Some(aria))?;
            doc.append_child(group, btn)?;
        }
        doc.append_child(header, group)?;
        Ok(Self)
    }

    /// Current root font size in px
    pub fn current_size(doc: &Document) -> f32 {
        doc.document_element()
            .and_then(|html| doc.style(html, "font-size"))
            .and_then(|v| v.trim().trim_end_matches("px").trim().parse::<f32>().ok())
            .unwrap_or(BASE_FONT_PX)
    }

    /// Step the root font size by `direction` steps
    pub fn adjust(&self, doc: &mut Document, direction: i32) -> Result<&'static str, A11yError> {
        let html = doc.document_element().ok_or(A11yError::MissingElement("html"))?;
        let size = Self::current_size(doc) + direction as f32 * FONT_STEP_PX;
        doc.set_style(html, "font-size", &format!("{size}px"))?;
        Ok(if direction > 0 {
            "Tamanho da fonte aumentado"
        } else {
            "Tamanho da fonte diminuído"
        })
    }

    /// Drop the inline font size
    pub fn reset(&self, doc: &mut Document) -> Result<&'static str, A11yError> {
        let html = doc.document_element().ok_or(A11yError::MissingElement("html"))?;
        doc.set_style(html, "font-size", "")?;
        Ok("Tamanho da fonte resetado para padrão")
    }

    /// Handle a click; returns the message to announce
    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> Result<Option<&'static str>, A11yError> {
        let Some(btn) = doc.closest(target, "#font-decrease, #font-reset, #font-increase")? else {
            return Ok(None);
        };
        let message = match doc.attr(btn, "id") {
            Some("font-decrease") => self.adjust(doc, -1)?,
            Some("font-increase") => self.adjust(doc, 1)?,
            _ => self.reset(doc)?,
        };
        Ok(Some(message))
    }
}
