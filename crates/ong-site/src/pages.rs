//! Page initializers
//!
//! After every render the initializer for the route inspects the fresh
//! `<main>` subtree and returns the page's bindings. Bindings replace the
//! previous page's wholesale.

use std::collections::HashMap;

use ong_dom::{Document, NodeId};

use crate::animations::prepare_reveal;
use crate::SiteResult;

/// Initializer for one route
pub type PageInit = fn(&mut Document, NodeId) -> SiteResult<PageBindings>;

/// A project filter button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBinding {
    pub button: NodeId,
    pub filter: String,
}

/// An FAQ question toggling the answer after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqBinding {
    pub question: NodeId,
}

/// A form validated as the user types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBinding {
    pub form: NodeId,
    pub fields: Vec<NodeId>,
}

/// Behavior attached to the rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBindings {
    pub route: String,
    pub filters: Vec<FilterBinding>,
    pub faq: Vec<FaqBinding>,
    pub forms: Vec<FormBinding>,
    /// Cards revealed on scroll
    pub reveal: Vec<NodeId>,
    /// Stat counters started on scroll
    pub counters: Vec<NodeId>,
}

impl PageBindings {
    pub fn new(route: &str) -> Self {
        Self {
            route: route.to_string(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.faq.is_empty()
            && self.forms.is_empty()
            && self.reveal.is_empty()
            && self.counters.is_empty()
    }

    /// Filter button containing `target`
    pub fn filter_at(&self, doc: &Document, target: NodeId) -> Option<&FilterBinding> {
        self.filters
            .iter()
            .find(|f| doc.tree().contains(f.button, target))
    }

    /// FAQ question containing `target`
    pub fn faq_at(&self, doc: &Document, target: NodeId) -> Option<&FaqBinding> {
        self.faq
            .iter()
            .find(|f| doc.tree().contains(f.question, target))
    }

    /// The bound form `field` belongs to
    pub fn form_of(&self, field: NodeId) -> Option<&FormBinding> {
        self.forms.iter().find(|f| f.fields.contains(&field))
    }

    pub fn is_bound_form(&self, form: NodeId) -> bool {
        self.forms.iter().any(|f| f.form == form)
    }
}

/// Route -> initializer dispatch table
#[derive(Debug, Clone)]
pub struct Initializers {
    table: HashMap<String, PageInit>,
}

impl Initializers {
    /// Table with the built-in pages
    pub fn new() -> Self {
        let mut table: HashMap<String, PageInit> = HashMap::new();
        table.insert("home".into(), init_home);
        table.insert("projetos".into(), init_projetos);
        table.insert("voluntarios".into(), init_voluntarios);
        table.insert("contato".into(), init_contato);
        table.insert("login".into(), init_login);
        Self { table }
    }

    /// Set the initializer for `route`
    pub fn register(&mut self, route: &str, init: PageInit) {
        self.table.insert(route.to_string(), init);
    }

    /// Run the initializer for `route`; routes without one get no bindings
    pub fn run(&self, route: &str, doc: &mut Document, main: NodeId) -> SiteResult<PageBindings> {
        let Some(init) = self.table.get(route) else {
            return Ok(PageBindings::new(route));
        };
        let mut bindings = init(doc, main)?;
        bindings.route = route.to_string();
        tracing::debug!(
            "Initialized {}: {} filter(s), {} form(s), {} faq item(s)",
            route,
            bindings.filters.len(),
            bindings.forms.len(),
            bindings.faq.len()
        );
        Ok(bindings)
    }
}

impl Default for Initializers {
    fn default() -> Self {
        Self::new()
    }
}

fn init_home(doc: &mut Document, main: NodeId) -> SiteResult<PageBindings> {
    let mut bindings = PageBindings::new("home");
    for card in doc.query_selector_all(main, ".card")? {
        prepare_reveal(doc, card)?;
        bindings.reveal.push(card);
    }
    bindings.counters = doc.query_selector_all(main, ".stat-number[data-count]")?;
    bindings.filters = project_filters(doc, main)?;
    Ok(bindings)
}

fn init_projetos(doc: &mut Document, main: NodeId) -> SiteResult<PageBindings> {
    let mut bindings = PageBindings::new("projetos");
    bindings.filters = project_filters(doc, main)?;
    Ok(bindings)
}

fn init_voluntarios(doc: &mut Document, main: NodeId) -> SiteResult<PageBindings> {
    let mut bindings = PageBindings::new("voluntarios");
    bindings.forms.extend(form_binding(doc, main, "#volunteer-form")?);
    Ok(bindings)
}

fn init_contato(doc: &mut Document, main: NodeId) -> SiteResult<PageBindings> {
    let mut bindings = PageBindings::new("contato");
    bindings.forms.extend(form_binding(doc, main, "#contact-form")?);
    bindings.faq = doc
        .query_selector_all(main, ".faq-question")?
        .into_iter()
        .map(|question| FaqBinding { question })
        .collect();
    Ok(bindings)
}

fn init_login(doc: &mut Document, main: NodeId) -> SiteResult<PageBindings> {
    let mut bindings = PageBindings::new("login");
    bindings.forms.extend(form_binding(doc, main, "#login-form")?);
    bindings.forms.extend(form_binding(doc, main, "#signup-form")?);
    Ok(bindings)
}

fn project_filters(doc: &Document, main: NodeId) -> SiteResult<Vec<FilterBinding>> {
    Ok(doc
        .query_selector_all(main, ".filter-btn[data-filter]")?
        .into_iter()
        .filter_map(|button| {
            let filter = doc.attr(button, "data-filter")?.to_string();
            Some(FilterBinding { button, filter })
        })
        .collect())
}

fn form_binding(doc: &Document, main: NodeId, selector: &str) -> SiteResult<Option<FormBinding>> {
    let Some(form) = doc.query_selector(main, selector)? else {
        return Ok(None);
    };
    let fields = doc.query_selector_all(form, "[data-validate]")?;
    Ok(Some(FormBinding { form, fields }))
}

/// Show the project cards matching `filter`; returns how many are shown
pub fn filter_projects(doc: &mut Document, filter: &str) -> SiteResult<usize> {
    let mut shown = 0;
    for card in doc.query_all(".project-card")? {
        let visible =
            filter == "all" || doc.attr(card, "data-category").is_some_and(|c| c.contains(filter));
        doc.set_style(card, "display", if visible { "block" } else { "none" })?;
        shown += usize::from(visible);
    }
    Ok(shown)
}

/// Apply a filter button: filter the cards and move `active` to it
pub fn activate_filter(doc: &mut Document, binding: &FilterBinding) -> SiteResult<usize> {
    if let Some(group) = doc.tree().parent(binding.button) {
        for sibling in doc.query_selector_all(group, ".filter-btn")? {
            doc.remove_class(sibling, "active")?;
        }
    }
    doc.add_class(binding.button, "active")?;
    filter_projects(doc, &binding.filter)
}

/// Toggle the answer after an FAQ question; returns whether it is open
pub fn toggle_faq(doc: &mut Document, binding: &FaqBinding) -> SiteResult<bool> {
    match doc.tree().next_element_sibling(binding.question) {
        Some(answer) => Ok(doc.toggle_class(answer, "active")?),
        None => Ok(false),
    }
}
