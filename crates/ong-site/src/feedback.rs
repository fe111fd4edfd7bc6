//! Toasts and modals

use ong_a11y::Key;
use ong_dom::{Document, NodeId};

use crate::error::SiteError;
use crate::timers::{Task, TimerQueue};
use crate::SiteResult;

/// Delay before a new toast slides in
pub const TOAST_SHOW_DELAY_MS: u64 = 100;
/// How long a toast stays up
pub const TOAST_HIDE_DELAY_MS: u64 = 5000;
/// Exit transition before the toast is removed
pub const TOAST_REMOVE_DELAY_MS: u64 = 300;
/// Delay of the welcome toast after start
pub const WELCOME_DELAY_MS: u64 = 1000;

pub const WELCOME_MESSAGE: &str = "✨ Bem-vindo à ONG Connect!";
pub const SUPPORT_MESSAGE: &str = "❤️ Obrigado pelo seu apoio!";

/// Toast flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Toast and modal behavior
#[derive(Debug, Clone, Default)]
pub struct Feedback;

impl Feedback {
    pub fn new() -> Self {
        Self
    }

    /// Append a toast to `<body>` and schedule its lifecycle
    pub fn show_toast(
        &self,
        doc: &mut Document,
        timers: &mut TimerQueue<Task>,
        message: &str,
        kind: ToastKind,
    ) -> SiteResult<NodeId> {
        let body = doc.body().ok_or(SiteError::MissingElement("body"))?;

        let toast = doc.create_element("div");
        doc.set_attr(toast, "class", &format!("toast toast-{}", kind.as_str()))?;
        let alert = doc.create_element("div");
        doc.set_attr(alert, "class", &format!("alert alert-{}", kind.as_str()))?;
        doc.set_text_content(alert, message)?;
        doc.append_child(toast, alert)?;
        doc.append_child(body, toast)?;

        timers.schedule(TOAST_SHOW_DELAY_MS, Task::ShowToast(toast));
        timers.schedule(TOAST_HIDE_DELAY_MS, Task::HideToast(toast));
        tracing::debug!("Toast ({}): {}", kind.as_str(), message);
        Ok(toast)
    }

    /// Slide a toast in
    pub fn show(&self, doc: &mut Document, toast: NodeId) -> SiteResult<()> {
        if doc.is_connected(toast) {
            doc.add_class(toast, "show")?;
        }
        Ok(())
    }

    /// Slide a toast out and schedule its removal
    pub fn hide(&self, doc: &mut Document, timers: &mut TimerQueue<Task>, toast: NodeId) -> SiteResult<()> {
        if doc.is_connected(toast) {
            doc.remove_class(toast, "show")?;
            timers.schedule(TOAST_REMOVE_DELAY_MS, Task::RemoveNode(toast));
        }
        Ok(())
    }

    /// Modal backdrops and support buttons. Returns whether the click was
    /// handled.
    pub fn handle_click(
        &self,
        doc: &mut Document,
        timers: &mut TimerQueue<Task>,
        target: NodeId,
    ) -> SiteResult<bool> {
        if doc.matches(target, ".modal")? {
            doc.remove_class(target, "show")?;
            return Ok(true);
        }
        if doc.closest(target, ".btn[class*=\"apoiar\"]")?.is_some() {
            self.show_toast(doc, timers, SUPPORT_MESSAGE, ToastKind::Success)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Escape closes every open modal
    pub fn handle_keydown(&self, doc: &mut Document, key: &Key) -> SiteResult<()> {
        if *key == Key::Escape {
            for modal in doc.query_all(".modal.show")? {
                doc.remove_class(modal, "show")?;
            }
        }
        Ok(())
    }

    pub fn open_modal(&self, doc: &mut Document, modal: NodeId) -> SiteResult<()> {
        Ok(doc.add_class(modal, "show")?)
    }

    /// Schedule the welcome toast
    pub fn schedule_welcome(&self, timers: &mut TimerQueue<Task>) {
        timers.schedule(WELCOME_DELAY_MS, Task::WelcomeToast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_markup_is_escaped() {
        let mut doc = Document::default();
        let mut timers = TimerQueue::new();
        let toast = Feedback::new()
            .show_toast(&mut doc, &mut timers, "<b>oi</b>", ToastKind::Warning)
            .unwrap();

        assert_eq!(
            doc.outer_html(toast),
            "<div class=\"toast toast-warning\"><div class=\"alert alert-warning\">&lt;b&gt;oi&lt;/b&gt;</div></div>"
        );
        assert_eq!(timers.pop_due(100), Some(Task::ShowToast(toast)));
        assert_eq!(timers.pop_due(4999), None);
        assert_eq!(timers.pop_due(5000), Some(Task::HideToast(toast)));
    }

    #[test]
    fn test_backdrop_click_closes_modal() {
        let mut doc = ong_html::parse(
            r#"<div class="modal show" id="m"><div class="modal-content" id="c">x</div></div>"#,
        )
        .unwrap();
        let mut timers = TimerQueue::new();
        let feedback = Feedback::new();
        let modal = doc.get_element_by_id("m").unwrap();
        let content = doc.get_element_by_id("c").unwrap();

        assert!(!feedback.handle_click(&mut doc, &mut timers, content).unwrap());
        assert!(doc.has_class(modal, "show"));
        assert!(feedback.handle_click(&mut doc, &mut timers, modal).unwrap());
        assert!(!doc.has_class(modal, "show"));
    }

    #[test]
    fn test_escape_closes_modals() {
        let mut doc = ong_html::parse(
            r#"<div class="modal show"></div><div class="modal show"></div>"#,
        )
        .unwrap();
        Feedback::new().handle_keydown(&mut doc, &Key::Escape).unwrap();
        assert!(doc.query(".modal.show").unwrap().is_none());
    }

    #[test]
    fn test_support_button_inside() {
        let mut doc = ong_html::parse(
            r#"<button class="btn apoiar-btn"><span id="icon">❤</span></button>"#,
        )
        .unwrap();
        let mut timers = TimerQueue::new();
        let icon = doc.get_element_by_id("icon").unwrap();
        assert!(Feedback::new().handle_click(&mut doc, &mut timers, icon).unwrap());
        let toast = doc.query(".toast-success .alert").unwrap().unwrap();
        assert_eq!(doc.text_content(toast), SUPPORT_MESSAGE);
    }
}
