//! ARIA live region
//!
//! Announcements are written into a polite, atomic live region and cleared
//! after [`ANNOUNCE_CLEAR_DELAY_MS`]. The caller owns the timer: it keeps the
//! returned [`Announcement`] and hands it back when the delay elapsed.

use ong_dom::Document;

use crate::A11yError;

pub const LIVE_REGION_ID: &str = "aria-live-region";

/// Delay before an announcement is cleared
pub const ANNOUNCE_CLEAR_DELAY_MS: u64 = 1000;

/// Live region mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveRegionMode {
    Off,
    #[default]
    Polite,
    Assertive,
}

impl LiveRegionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// Pending clear of an announced message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
}

/// The document's live region
#[derive(Debug, Clone, Default)]
pub struct LiveRegion {
    mode: LiveRegionMode,
}

impl LiveRegion {
    /// Create `#aria-live-region` at the end of `<body>` unless present
    pub fn install(doc: &mut Document) -> Result<Self, A11yError> {
        let region = Self::default();
        if doc.get_element_by_id(LIVE_REGION_ID).is_some() {
            return Ok(region);
        }
        let body = doc.body().ok_or(A11yError::MissingElement("body"))?;

        let div = doc.create_element("div");
        doc.set_attr(div, "id", LIVE_REGION_ID)?;
        doc.set_attr(div, "class", "aria-live")?;
        doc.set_attr(div, "aria-live", region.mode.as_str())?;
        doc.set_attr(div, "aria-atomic", "true")?;
        doc.append_child(body, div)?;
        Ok(region)
    }

    pub fn mode(&self) -> LiveRegionMode {
        self.mode
    }

    /// Write `message` into the region. Returns `None` when the region is
    /// missing from the document.
    pub fn announce(&self, doc: &mut Document, message: &str) -> Result<Option<Announcement>, A11yError> {
        let Some(region) = doc.get_element_by_id(LIVE_REGION_ID) else {
            tracing::debug!("No live region for announcement: {}", message);
            return Ok(None);
        };
        doc.set_text_content(region, message)?;
        tracing::debug!("Announced: {}", message);
        Ok(Some(Announcement {
            message: message.to_string(),
        }))
    }

    /// Clear the region if it still shows the announced message
    pub fn clear_if_current(&self, doc: &mut Document, announcement: &Announcement) -> Result<(), A11yError> {
        let Some(region) = doc.get_element_by_id(LIVE_REGION_ID) else {
            return Ok(());
        };
        if doc.text_content(region) == announcement.message {
            doc.set_text_content(region, "")?;
        }
        Ok(())
    }

    /// Current region text
    pub fn text(&self, doc: &Document) -> String {
        doc.get_element_by_id(LIVE_REGION_ID)
            .map(|r| doc.text_content(r))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_once() {
        let mut doc = Document::default();
        LiveRegion::install(&mut doc).unwrap();
        LiveRegion::install(&mut doc).unwrap();
        assert_eq!(doc.query_all("#aria-live-region").unwrap().len(), 1);

        let region = doc.get_element_by_id(LIVE_REGION_ID).unwrap();
        assert_eq!(doc.attr(region, "aria-live"), Some("polite"));
        assert_eq!(doc.attr(region, "aria-atomic"), Some("true"));
    }

    #[test]
    fn test_newer_message_survives_old_clear() {
        let mut doc = Document::default();
        let live = LiveRegion::install(&mut doc).unwrap();

        let first = live.announce(&mut doc, "primeira").unwrap().unwrap();
        let second = live.announce(&mut doc, "segunda").unwrap().unwrap();

        live.clear_if_current(&mut doc, &first).unwrap();
        assert_eq!(live.text(&doc), "segunda");
        live.clear_if_current(&mut doc, &second).unwrap();
        assert_eq!(live.text(&doc), "");
    }

    #[test]
    fn test_announce_without_region() {
        let mut doc = Document::default();
        let live = LiveRegion::default();
        assert_eq!(live.announce(&mut doc, "oi").unwrap(), None);
    }
}
