//! ONG Accessibility
//!
//! Accessibility affordances installed on every page:
//! - skip link to the main content
//! - ARIA live region for screen-reader announcements
//! - high-contrast toggle and font-size controls
//! - keyboard handling (dropdown escape, focus wrap, menu arrows)

pub mod aria;
pub mod controls;
pub mod focus;
pub mod keys;

pub use aria::{Announcement, LiveRegion, LiveRegionMode, ANNOUNCE_CLEAR_DELAY_MS};
pub use controls::{ContrastToggle, FontSizeControls, BASE_FONT_PX, FONT_STEP_PX};
pub use focus::{focusable_elements, install_skip_link, KeyOutcome, FOCUSABLE_SELECTOR};
pub use keys::{Key, KeyEvent};

use ong_dom::{Document, DomError, NodeId};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Document has no <{0}> element")]
    MissingElement(&'static str),
}

/// Accessibility layer for one document
#[derive(Debug, Clone, Default)]
pub struct Accessibility {
    live: LiveRegion,
    contrast: ContrastToggle,
    font: FontSizeControls,
}

impl Accessibility {
    /// Install skip link, live region and header controls
    pub fn install(doc: &mut Document) -> Result<Self, A11yError> {
        install_skip_link(doc)?;
        let a11y = Self {
            live: LiveRegion::install(doc)?,
            contrast: ContrastToggle::install(doc)?,
            font: FontSizeControls::install(doc)?,
        };
        tracing::debug!("Accessibility layer installed");
        Ok(a11y)
    }

    pub fn live_region(&self) -> &LiveRegion {
        &self.live
    }

    /// Announce a message to screen readers
    pub fn announce(&self, doc: &mut Document, message: &str) -> Result<Option<Announcement>, A11yError> {
        self.live.announce(doc, message)
    }

    /// Clear an announcement once its delay elapsed
    pub fn clear(&self, doc: &mut Document, announcement: &Announcement) -> Result<(), A11yError> {
        self.live.clear_if_current(doc, announcement)
    }

    /// Handle a click; returns the announcement made, if any
    pub fn handle_click(
        &self,
        doc: &mut Document,
        target: NodeId,
    ) -> Result<Option<Announcement>, A11yError> {
        if let Some(message) = self.contrast.handle_click(doc, target)? {
            return self.announce(doc, message);
        }
        if let Some(message) = self.font.handle_click(doc, target)? {
            return self.announce(doc, message);
        }
        Ok(None)
    }

    /// Handle a keydown dispatched at `target`
    pub fn handle_keydown(
        &self,
        doc: &mut Document,
        event: &KeyEvent,
        target: NodeId,
    ) -> Result<KeyOutcome, A11yError> {
        focus::handle_keydown(doc, event, target)
    }
}
