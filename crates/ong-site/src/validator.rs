//! Form validation
//!
//! Fields opt in with a `data-validate` attribute holding space-separated
//! rule tokens (`required email`, `minLength:8`). The first failing rule of a
//! field wins; every field is evaluated.

use std::sync::LazyLock;

use ong_dom::{Document, NodeId};
use regex::Regex;

use crate::page::Page;
use crate::SiteResult;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_RE: invalid regex pattern")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s()\-]+$").expect("PHONE_RE: invalid regex pattern"));

/// Attribute carrying the rule tokens
pub const RULES_ATTR: &str = "data-validate";

const FORM_ERROR_TITLE: &str = "Erro no formulário!";
const FORM_ERROR_TEXT: &str = "Por favor, corrija os erros destacados antes de enviar.";

/// One validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Phone,
    /// Raw argument, as written in the attribute
    MinLength(String),
    MaxLength(String),
    Password,
    /// Id of the field to compare with
    ConfirmPassword(String),
}

impl Rule {
    /// Parse one `name[:argument]` token; unknown names yield `None`
    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.split(':');
        let name = parts.next()?;
        let arg = parts.next().unwrap_or("").to_string();
        match name {
            "required" => Some(Self::Required),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "minLength" => Some(Self::MinLength(arg)),
            "maxLength" => Some(Self::MaxLength(arg)),
            "password" => Some(Self::Password),
            "confirmPassword" => Some(Self::ConfirmPassword(arg)),
            _ => None,
        }
    }

    /// Parse a whole `data-validate` value
    pub fn parse_list(attr: &str) -> Vec<Self> {
        attr.split_whitespace().filter_map(Self::parse).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::MinLength(_) => "minLength",
            Self::MaxLength(_) => "maxLength",
            Self::Password => "password",
            Self::ConfirmPassword(_) => "confirmPassword",
        }
    }

    /// Message shown when the rule fails
    pub fn message(&self) -> String {
        match self {
            Self::Required => "Este campo é obrigatório.".to_string(),
            Self::Email => "Por favor, insira um e-mail válido.".to_string(),
            Self::Phone => "Por favor, insira um telefone válido.".to_string(),
            Self::MinLength(n) => format!("Este campo deve ter no mínimo {n} caracteres."),
            Self::MaxLength(n) => format!("Este campo deve ter no máximo {n} caracteres."),
            Self::Password => "A senha deve ter pelo menos 8 caracteres, incluindo letras \
                               maiúsculas, minúsculas e números."
                .to_string(),
            Self::ConfirmPassword(_) => "As senhas não coincidem.".to_string(),
        }
    }

    /// Check the rule against `field`'s current value
    pub fn check(&self, doc: &Document, field: NodeId) -> bool {
        let value = doc.value(field);
        let trimmed = value.trim();
        match self {
            Self::Required => !trimmed.is_empty(),
            Self::Email => trimmed.is_empty() || EMAIL_RE.is_match(trimmed),
            Self::Phone => trimmed.is_empty() || PHONE_RE.is_match(trimmed),
            // Without a usable bound only the empty value passes
            Self::MinLength(arg) => match parse_int(arg) {
                Some(min) => trimmed.is_empty() || trimmed.chars().count() as i64 >= min,
                None => trimmed.is_empty(),
            },
            Self::MaxLength(arg) => match parse_int(arg) {
                Some(max) => trimmed.is_empty() || trimmed.chars().count() as i64 <= max,
                None => trimmed.is_empty(),
            },
            Self::Password => value.is_empty() || is_strong_password(&value),
            Self::ConfirmPassword(id) => doc
                .get_element_by_id(id)
                .is_some_and(|other| doc.value(other) == value),
        }
    }
}

/// Leading integer of `s`, ignoring trailing garbage (`"8px"` is 8)
fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
}

/// Outcome for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResult {
    pub field: NodeId,
    /// Message of the first failing rule
    pub error: Option<String>,
}

/// Outcome of validating a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    pub fields: Vec<FieldResult>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.error.is_none())
    }

    pub fn first_invalid(&self) -> Option<NodeId> {
        self.fields.iter().find(|f| f.error.is_some()).map(|f| f.field)
    }

    /// Failing fields with their messages
    pub fn errors(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.fields
            .iter()
            .filter_map(|f| f.error.as_deref().map(|e| (f.field, e)))
    }

    /// Message for `field`, if it failed
    pub fn error_for(&self, field: NodeId) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .and_then(|f| f.error.as_deref())
    }
}

/// Rule-attribute form validator
#[derive(Debug, Clone, Default)]
pub struct FormValidator;

impl FormValidator {
    pub fn new() -> Self {
        Self
    }

    /// Fields of `form` carrying rules
    pub fn fields(&self, doc: &Document, form: NodeId) -> SiteResult<Vec<NodeId>> {
        Ok(doc.query_selector_all(form, "[data-validate]")?)
    }

    /// Message of the first failing rule of `field`
    pub fn first_failure(&self, doc: &Document, field: NodeId) -> Option<String> {
        let rules = Rule::parse_list(doc.attr(field, RULES_ATTR).unwrap_or(""));
        rules
            .iter()
            .find(|rule| !rule.check(doc, field))
            .map(Rule::message)
    }

    /// Validate every field of `form` and annotate the document
    pub async fn validate_form(&self, page: &mut Page, form: NodeId) -> SiteResult<FormReport> {
        let fields = self.fields(&page.document, form)?;
        self.clear_all_errors(&mut page.document, form, &fields)?;

        let mut report = FormReport::default();
        for field in fields {
            smol::future::yield_now().await;
            let error = self.first_failure(&page.document, field);
            match &error {
                Some(message) => show_field_error(&mut page.document, field, message)?,
                None => show_field_success(&mut page.document, field)?,
            }
            report.fields.push(FieldResult { field, error });
        }

        if let Some(first) = report.first_invalid() {
            let banner = show_form_error(&mut page.document, form)?;
            page.viewport.scroll_into_view(banner);
            page.document.focus(first);
            tracing::debug!("Form has {} invalid field(s)", report.errors().count());
        }
        Ok(report)
    }

    /// Validate one field (blur). Returns whether it passed.
    pub async fn validate_field(&self, page: &mut Page, field: NodeId) -> SiteResult<bool> {
        smol::future::yield_now().await;
        match self.first_failure(&page.document, field) {
            Some(message) => {
                show_field_error(&mut page.document, field, &message)?;
                page.document.focus(field);
                Ok(false)
            }
            None => {
                show_field_success(&mut page.document, field)?;
                Ok(true)
            }
        }
    }

    /// Drop the error state of `field` (input while it shows an error)
    pub fn clear_field_error(&self, doc: &mut Document, field: NodeId) -> SiteResult<()> {
        doc.remove_class(field, "error")?;
        if let Some(message) = error_element(doc, field)? {
            doc.set_style(message, "display", "none")?;
        }
        Ok(())
    }

    fn clear_all_errors(&self, doc: &mut Document, form: NodeId, fields: &[NodeId]) -> SiteResult<()> {
        for &field in fields {
            doc.remove_class(field, "error")?;
            doc.remove_class(field, "success")?;
            if let Some(message) = error_element(doc, field)? {
                doc.set_style(message, "display", "none")?;
            }
        }
        if let Some(banner) = doc.query_selector(form, ".form-error")? {
            doc.remove(banner)?;
        }
        Ok(())
    }
}

/// Message element in the field's parent
fn error_element(doc: &Document, field: NodeId) -> SiteResult<Option<NodeId>> {
    match doc.tree().parent(field) {
        Some(parent) => Ok(doc.query_selector(parent, ".field-error")?),
        None => Ok(None),
    }
}

fn show_field_error(doc: &mut Document, field: NodeId, message: &str) -> SiteResult<()> {
    doc.add_class(field, "error")?;
    doc.remove_class(field, "success")?;

    let Some(parent) = doc.tree().parent(field) else {
        return Ok(());
    };
    let element = match doc.query_selector(parent, ".field-error")? {
        Some(element) => element,
        None => {
            let element = doc.create_element("div");
            doc.set_attr(element, "class", "field-error")?;
            doc.append_child(parent, element)?
        }
    };
    doc.set_text_content(element, message)?;
    doc.set_style(element, "display", "block")?;
    Ok(())
}

fn show_field_success(doc: &mut Document, field: NodeId) -> SiteResult<()> {
    doc.remove_class(field, "error")?;
    doc.add_class(field, "success")?;
    if let Some(message) = error_element(doc, field)? {
        doc.set_style(message, "display", "none")?;
    }
    Ok(())
}

fn show_form_error(doc: &mut Document, form: NodeId) -> SiteResult<NodeId> {
    let banner = doc.create_element("div");
    doc.set_attr(banner, "class", "alert alert-error form-error")?;
    let strong = doc.create_element("strong");
    doc.set_text_content(strong, FORM_ERROR_TITLE)?;
    doc.append_child(banner, strong)?;
    let text = doc.create_text(&format!(" {FORM_ERROR_TEXT}"));
    doc.append_child(banner, text)?;
    doc.prepend_child(form, banner)?;
    Ok(banner)
}

/// Named, enabled controls of `form` with their values, in document order
pub fn form_values(doc: &Document, form: NodeId) -> SiteResult<Vec<(String, String)>> {
    let mut values = Vec::new();
    for control in doc.query_selector_all(form, "input, select, textarea")? {
        let Some(name) = doc.attr(control, "name").filter(|n| !n.is_empty()) else {
            continue;
        };
        if doc.has_attr(control, "disabled") {
            continue;
        }
        let kind = doc.attr(control, "type").unwrap_or("text");
        let value = match kind {
            "submit" | "button" | "reset" | "file" | "image" => continue,
            "checkbox" | "radio" if !doc.has_attr(control, "checked") => continue,
            "checkbox" | "radio" => doc.attr(control, "value").unwrap_or("on").to_string(),
            _ => doc.value(control),
        };
        values.push((name.to_string(), value));
    }
    Ok(values)
}

/// Clear every control of `form`
pub fn reset_form(doc: &mut Document, form: NodeId) -> SiteResult<()> {
    for control in doc.query_selector_all(form, "input, select, textarea")? {
        let tag = doc.tag_name(control).unwrap_or("").to_string();
        let kind = doc.attr(control, "type").unwrap_or("text").to_string();
        match (tag.as_str(), kind.as_str()) {
            ("input", "submit" | "button" | "reset" | "image") => {}
            ("input", "checkbox" | "radio") => {
                doc.remove_attr(control, "checked")?;
            }
            ("select", _) => {
                for option in doc.query_selector_all(control, "option[selected]")? {
                    doc.remove_attr(option, "selected")?;
                }
            }
            _ => doc.set_value(control, "")?,
        }
    }
    Ok(())
}
