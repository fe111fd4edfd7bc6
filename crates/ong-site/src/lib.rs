//! ONG Connect site runtime
//!
//! Client-side behavior of the ONG Connect website, running against an
//! in-memory [`Document`](ong_dom::Document):
//! - hash routing ([`RouteTable`]) and browser-style [`History`]
//! - template lookup with lazy external fetches ([`Templates`])
//! - the single-page controller ([`Spa`]) and per-route initializers
//! - form validation, toasts, modals, animations and the navigation drawer
//!
//! [`App`] wires everything together. Hosts feed it user events and advance
//! its virtual clock; everything else happens on the document.

pub mod animations;
pub mod app;
pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod navigation;
pub mod page;
pub mod pages;
pub mod router;
pub mod spa;
pub mod templates;
pub mod timers;
pub mod utils;
pub mod validator;

pub use app::{App, ClickEvent, ClickOutcome};
pub use config::SiteConfig;
pub use error::{SiteError, SiteResult};
pub use feedback::ToastKind;
pub use history::History;
pub use page::{Page, Rect, Viewport};
pub use pages::{Initializers, PageBindings};
pub use router::RouteTable;
pub use spa::{Commit, PageState, Spa, Ticket};
pub use templates::{MemorySource, TemplateSource, Templates};
pub use timers::{Debounce, Task, Throttle, TimerQueue};
pub use validator::{FormReport, FormValidator, Rule};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
