//! Application
//!
//! [`App`] owns the page and every collaborator. Hosts deliver user events
//! (`click`, `keydown`, `blur`, `input`, `submit`, `scroll`), history
//! traversal and the passage of time (`advance`).

use ong_a11y::{Accessibility, KeyEvent, KeyOutcome, ANNOUNCE_CLEAR_DELAY_MS};
use ong_dom::{Document, NodeId};
use ong_net::ResourceLoader;
use serde_json::{Map, Value};

use crate::animations::{ensure_ripple_styles, Animations};
use crate::feedback::{Feedback, ToastKind};
use crate::history::History;
use crate::navigation::Navigation;
use crate::page::Page;
use crate::pages::{activate_filter, toggle_faq, PageBindings};
use crate::router::RouteTable;
use crate::spa::{link_route, Commit, Spa};
use crate::templates::{TemplateSource, Templates};
use crate::timers::{Task, TimerQueue};
use crate::validator::{form_values, reset_form, FormReport, FormValidator};
use crate::{SiteConfig, SiteResult};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Formulário enviado com sucesso!";

/// A click delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub target: NodeId,
    pub client_x: f64,
    pub client_y: f64,
}

impl ClickEvent {
    /// Click without coordinates (keyboard activation, scripted clicks)
    pub fn on(target: NodeId) -> Self {
        Self {
            target,
            client_x: 0.0,
            client_y: 0.0,
        }
    }

    pub fn at(target: NodeId, client_x: f64, client_y: f64) -> Self {
        Self {
            target,
            client_x,
            client_y,
        }
    }
}

/// What a click did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    /// The host must not follow the link
    pub prevent_default: bool,
    /// Navigation triggered by the click
    pub navigation: Option<Commit>,
}

/// The ONG Connect site
#[derive(Debug)]
pub struct App<S = ResourceLoader> {
    page: Page,
    spa: Spa,
    templates: Templates<S>,
    a11y: Accessibility,
    validator: FormValidator,
    feedback: Feedback,
    navigation: Navigation,
    animations: Animations,
    timers: TimerQueue<Task>,
    bindings: PageBindings,
    config: SiteConfig,
    last_submission: Option<Value>,
}

impl App<ResourceLoader> {
    /// App over `document`; external templates load from the configured base
    pub fn new(document: Document, config: SiteConfig) -> SiteResult<Self> {
        let source = config
            .template_base
            .as_deref()
            .map(ResourceLoader::parse)
            .transpose()?;
        Ok(Self::with_source(document, config, source))
    }
}

impl<S: TemplateSource> App<S> {
    /// App over `document` with an explicit template source
    pub fn with_source(document: Document, config: SiteConfig, source: Option<S>) -> Self {
        let routes = RouteTable::with_extra(config.extra_routes.iter().cloned());
        let history = History::new(&config.initial_hash);
        Self {
            page: Page::new(document),
            spa: Spa::new(routes, history),
            templates: Templates::new(source),
            a11y: Accessibility::default(),
            validator: FormValidator::new(),
            feedback: Feedback::new(),
            navigation: Navigation::new(),
            animations: Animations::new(),
            timers: TimerQueue::new(),
            bindings: PageBindings::default(),
            config,
            last_submission: None,
        }
    }

    /// Install the page-wide behavior and render the initial route
    pub async fn start(&mut self) -> SiteResult<Commit> {
        self.a11y = Accessibility::install(&mut self.page.document)?;
        ensure_ripple_styles(&mut self.page.document)?;
        if self.config.welcome_toast {
            self.feedback.schedule_welcome(&mut self.timers);
        }
        tracing::info!("🎨 ONG Connect started");

        let commit = self.spa.start(&mut self.page, &self.templates).await?;
        self.apply(&commit);
        Ok(commit)
    }

    fn apply(&mut self, commit: &Commit) {
        if let Commit::Applied(bindings) = commit {
            self.animations.observe(&bindings.reveal, &bindings.counters);
            self.bindings = bindings.clone();
        }
    }

    // ---- navigation ----

    /// Navigate to a route, pushing a history entry
    pub async fn navigate(&mut self, route: &str) -> SiteResult<Commit> {
        let commit = self
            .spa
            .navigate_to(&mut self.page, &self.templates, route)
            .await?;
        self.apply(&commit);
        Ok(commit)
    }

    /// The location hash changed (`popstate`)
    pub async fn pop_state(&mut self, hash: &str) -> SiteResult<Commit> {
        let commit = self.spa.pop_state(&mut self.page, &self.templates, hash).await?;
        self.apply(&commit);
        Ok(commit)
    }

    pub async fn back(&mut self) -> SiteResult<Option<Commit>> {
        let commit = self.spa.back(&mut self.page, &self.templates).await?;
        if let Some(commit) = &commit {
            self.apply(commit);
        }
        Ok(commit)
    }

    pub async fn forward(&mut self) -> SiteResult<Option<Commit>> {
        let commit = self.spa.forward(&mut self.page, &self.templates).await?;
        if let Some(commit) = &commit {
            self.apply(commit);
        }
        Ok(commit)
    }

    // ---- user events ----

    /// Dispatch a click to every handler, navigation last
    pub async fn click(&mut self, event: ClickEvent) -> SiteResult<ClickOutcome> {
        let target = event.target;
        let mut outcome = ClickOutcome::default();
        if self.page.document.tree().get(target).is_none() {
            return Ok(outcome);
        }

        let doc = &mut self.page.document;
        if let Some(announcement) = self.a11y.handle_click(doc, target)? {
            self.timers
                .schedule(ANNOUNCE_CLEAR_DELAY_MS, Task::ClearAnnouncement(announcement));
        }
        self.feedback.handle_click(doc, &mut self.timers, target)?;
        self.animations.ripple(
            doc,
            &self.page.viewport,
            &mut self.timers,
            target,
            event.client_x,
            event.client_y,
        )?;

        if self.navigation.handle_click(&mut self.page, target)? {
            outcome.prevent_default = true;
        }

        let doc = &mut self.page.document;
        if let Some(filter) = self.bindings.filter_at(doc, target).cloned() {
            activate_filter(doc, &filter)?;
        }
        if let Some(faq) = self.bindings.faq_at(doc, target).cloned() {
            toggle_faq(doc, &faq)?;
        }

        if let Some(route) = link_route(&self.page.document, target)? {
            outcome.prevent_default = true;
            outcome.navigation = Some(self.navigate(&route).await?);
        }
        Ok(outcome)
    }

    /// Dispatch a keydown; menu activation clicks the item's link
    pub async fn keydown(&mut self, event: &KeyEvent, target: NodeId) -> SiteResult<KeyOutcome> {
        let outcome = self
            .a11y
            .handle_keydown(&mut self.page.document, event, target)?;
        self.feedback.handle_keydown(&mut self.page.document, &event.key)?;
        if let Some(link) = outcome.activate {
            self.click(ClickEvent::on(link)).await?;
        }
        Ok(outcome)
    }

    /// A bound field lost focus. `None` when the field is not validated.
    pub async fn blur(&mut self, field: NodeId) -> SiteResult<Option<bool>> {
        if self.bindings.form_of(field).is_none() {
            return Ok(None);
        }
        let valid = self.validator.validate_field(&mut self.page, field).await?;
        Ok(Some(valid))
    }

    /// The user typed into `field`
    pub fn input(&mut self, field: NodeId, value: &str) -> SiteResult<()> {
        let doc = &mut self.page.document;
        doc.set_value(field, value)?;
        if self.bindings.form_of(field).is_some() && doc.has_class(field, "error") {
            self.validator.clear_field_error(doc, field)?;
        }
        Ok(())
    }

    /// Submit `form`: validate, then report and clear it when valid
    pub async fn submit(&mut self, form: NodeId) -> SiteResult<FormReport> {
        let report = self.validator.validate_form(&mut self.page, form).await?;
        if !report.is_valid() {
            return Ok(report);
        }

        let doc = &mut self.page.document;
        let data: Map<String, Value> = form_values(doc, form)?
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        let data = Value::Object(data);
        tracing::info!("Form submitted: {}", data);
        self.last_submission = Some(data);

        self.feedback
            .show_toast(doc, &mut self.timers, SUBMIT_SUCCESS_MESSAGE, ToastKind::Success)?;
        reset_form(doc, form)?;
        Ok(report)
    }

    /// Observed elements entered the viewport
    pub fn scroll(&mut self, visible: &[NodeId]) -> SiteResult<()> {
        self.animations
            .on_visible(&mut self.page.document, &mut self.timers, visible)
    }

    /// Show a toast now
    pub fn toast(&mut self, message: &str, kind: ToastKind) -> SiteResult<NodeId> {
        self.feedback
            .show_toast(&mut self.page.document, &mut self.timers, message, kind)
    }

    /// Announce a message through the live region
    pub fn announce(&mut self, message: &str) -> SiteResult<()> {
        if let Some(announcement) = self.a11y.announce(&mut self.page.document, message)? {
            self.timers
                .schedule(ANNOUNCE_CLEAR_DELAY_MS, Task::ClearAnnouncement(announcement));
        }
        Ok(())
    }

    // ---- time ----

    /// Advance the clock by `ms`, running every task that becomes due
    pub fn advance(&mut self, ms: u64) -> SiteResult<()> {
        let until = self.timers.now().saturating_add(ms);
        while let Some(task) = self.timers.pop_due(until) {
            self.run_task(task)?;
        }
        self.timers.finish(until);
        Ok(())
    }

    fn run_task(&mut self, task: Task) -> SiteResult<()> {
        let doc = &mut self.page.document;
        match task {
            Task::ShowToast(toast) => self.feedback.show(doc, toast)?,
            Task::HideToast(toast) => self.feedback.hide(doc, &mut self.timers, toast)?,
            Task::RemoveNode(node) => {
                if doc.is_connected(node) {
                    doc.remove(node)?;
                }
            }
            Task::ClearAnnouncement(announcement) => self.a11y.clear(doc, &announcement)?,
            Task::CounterTick(stat) => {
                if self.animations.tick_counter(doc, stat)? {
                    self.timers
                        .schedule(crate::animations::COUNTER_TICK_MS, Task::CounterTick(stat));
                }
            }
            Task::WelcomeToast => {
                self.feedback.show_toast(
                    doc,
                    &mut self.timers,
                    crate::feedback::WELCOME_MESSAGE,
                    ToastKind::Info,
                )?;
            }
        }
        Ok(())
    }

    // ---- accessors ----

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn document(&self) -> &Document {
        &self.page.document
    }

    pub fn spa(&self) -> &Spa {
        &self.spa
    }

    pub fn spa_mut(&mut self) -> &mut Spa {
        &mut self.spa
    }

    pub fn templates(&self) -> &Templates<S> {
        &self.templates
    }

    pub fn bindings(&self) -> &PageBindings {
        &self.bindings
    }

    pub fn timers(&self) -> &TimerQueue<Task> {
        &self.timers
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Route of the rendered page
    pub fn current_page(&self) -> &str {
        self.spa.current_page()
    }

    /// Data of the last valid submission
    pub fn last_submission(&self) -> Option<&Value> {
        self.last_submission.as_ref()
    }
}
