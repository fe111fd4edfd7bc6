//! Scroll reveal, stat counters and button ripples
//!
//! The host reports which observed elements intersect the viewport; every
//! observation fires once and then detaches.

use std::collections::HashMap;

use ong_dom::{Document, NodeId};

use crate::page::Viewport;
use crate::timers::{Task, TimerQueue};
use crate::SiteResult;

/// Counter tick interval
pub const COUNTER_TICK_MS: u64 = 16;
/// Ticks a counter takes to reach its target (about 2000 ms)
pub const COUNTER_TICKS: f64 = 2000.0 / COUNTER_TICK_MS as f64;
/// Ripple lifetime
pub const RIPPLE_DURATION_MS: u64 = 600;

const RIPPLE_STYLES_ID: &str = "ripple-styles";
const RIPPLE_KEYFRAMES: &str =
    "@keyframes ripple-animation { to { transform: scale(4); opacity: 0; } }";

/// Fire-once intersection observer
#[derive(Debug, Clone, Default)]
pub struct FireOnceObserver {
    observed: Vec<NodeId>,
}

impl FireOnceObserver {
    pub fn observe(&mut self, node: NodeId) {
        if !self.observed.contains(&node) {
            self.observed.push(node);
        }
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observed.contains(&node)
    }

    pub fn clear(&mut self) {
        self.observed.clear();
    }

    /// Observed nodes among `visible`, detached from the observer
    pub fn take_intersecting(&mut self, visible: &[NodeId]) -> Vec<NodeId> {
        let (hit, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.observed)
            .into_iter()
            .partition(|node| visible.contains(node));
        self.observed = rest;
        hit
    }
}

/// A running stat counter
#[derive(Debug, Clone, Copy, PartialEq)]
struct Counter {
    target: f64,
    step: f64,
    current: f64,
}

/// Page animations
#[derive(Debug, Clone, Default)]
pub struct Animations {
    reveal: FireOnceObserver,
    counters: FireOnceObserver,
    running: HashMap<NodeId, Counter>,
}

impl Animations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the observed elements after a render
    pub fn observe(&mut self, reveal: &[NodeId], counters: &[NodeId]) {
        self.reveal.clear();
        self.counters.clear();
        self.running.clear();
        reveal.iter().for_each(|&n| self.reveal.observe(n));
        counters.iter().for_each(|&n| self.counters.observe(n));
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.reveal.is_observing(node) || self.counters.is_observing(node)
    }

    /// Elements in `visible` entered the viewport
    pub fn on_visible(
        &mut self,
        doc: &mut Document,
        timers: &mut TimerQueue<Task>,
        visible: &[NodeId],
    ) -> SiteResult<()> {
        for card in self.reveal.take_intersecting(visible) {
            reveal(doc, card)?;
        }
        for stat in self.counters.take_intersecting(visible) {
            let target = doc
                .attr(stat, "data-count")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(0.0);
            self.running.insert(
                stat,
                Counter {
                    target,
                    step: target / COUNTER_TICKS,
                    current: 0.0,
                },
            );
            timers.schedule(COUNTER_TICK_MS, Task::CounterTick(stat));
            tracing::debug!("Counter started towards {}", target);
        }
        Ok(())
    }

    /// Advance a counter one tick. Returns whether it needs another.
    pub fn tick_counter(&mut self, doc: &mut Document, stat: NodeId) -> SiteResult<bool> {
        let Some(counter) = self.running.get_mut(&stat) else {
            return Ok(false);
        };
        counter.current += counter.step;
        if counter.current < counter.target {
            let shown = counter.current.floor();
            doc.set_text_content(stat, &shown.to_string())?;
            Ok(true)
        } else {
            let target = counter.target;
            self.running.remove(&stat);
            doc.set_text_content(stat, &target.to_string())?;
            Ok(false)
        }
    }

    /// Ripple for a click on or inside a `.btn`
    pub fn ripple(
        &self,
        doc: &mut Document,
        viewport: &Viewport,
        timers: &mut TimerQueue<Task>,
        target: NodeId,
        client_x: f64,
        client_y: f64,
    ) -> SiteResult<Option<NodeId>> {
        let Some(button) = doc.closest(target, ".btn")? else {
            return Ok(None);
        };
        let rect = viewport.rect(button);
        let size = rect.width.max(rect.height);
        let x = client_x - rect.x - size / 2.0;
        let y = client_y - rect.y - size / 2.0;

        let span = doc.create_element("span");
        for (property, value) in [
            ("position", "absolute".to_string()),
            ("border-radius", "50%".to_string()),
            ("background", "rgba(255, 255, 255, 0.6)".to_string()),
            ("transform", "scale(0)".to_string()),
            ("animation", "ripple-animation 0.6s linear".to_string()),
            ("width", format!("{size}px")),
            ("height", format!("{size}px")),
            ("left", format!("{x}px")),
            ("top", format!("{y}px")),
        ] {
            doc.set_style(span, property, &value)?;
        }
        doc.set_style(button, "position", "relative")?;
        doc.set_style(button, "overflow", "hidden")?;
        doc.append_child(button, span)?;

        timers.schedule(RIPPLE_DURATION_MS, Task::RemoveNode(span));
        Ok(Some(span))
    }
}

/// Hide a card until it is revealed
pub fn prepare_reveal(doc: &mut Document, card: NodeId) -> SiteResult<()> {
    doc.set_style(card, "opacity", "0")?;
    doc.set_style(card, "transform", "translateY(20px)")?;
    doc.set_style(card, "transition", "opacity 0.6s ease, transform 0.6s ease")?;
    Ok(())
}

pub fn reveal(doc: &mut Document, card: NodeId) -> SiteResult<()> {
    doc.set_style(card, "opacity", "1")?;
    doc.set_style(card, "transform", "translateY(0)")?;
    Ok(())
}

/// Add the ripple keyframes to `<head>` once
pub fn ensure_ripple_styles(doc: &mut Document) -> SiteResult<()> {
    if doc.get_element_by_id(RIPPLE_STYLES_ID).is_some() {
        return Ok(());
    }
    let Some(head) = doc.head() else {
        return Ok(());
    };
    let style = doc.create_element("style");
    doc.set_attr(style, "id", RIPPLE_STYLES_ID)?;
    doc.set_text_content(style, RIPPLE_KEYFRAMES)?;
    doc.append_child(head, style)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Rect;

    fn stat(doc: &mut Document, count: &str) -> NodeId {
        let body = doc.body().unwrap();
        let span = doc.create_element("span");
        doc.set_attr(span, "class", "stat-number").unwrap();
        doc.set_attr(span, "data-count", count).unwrap();
        doc.append_child(body, span).unwrap()
    }

    fn run_counter(anim: &mut Animations, doc: &mut Document, node: NodeId) -> usize {
        let mut ticks = 1;
        while anim.tick_counter(doc, node).unwrap() {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_observer_fires_once() {
        let mut doc = Document::default();
        let mut observer = FireOnceObserver::default();
        let (a, b) = (doc.create_element("div"), doc.create_element("div"));
        observer.observe(a);
        observer.observe(b);

        assert_eq!(observer.take_intersecting(&[a]), vec![a]);
        assert!(observer.take_intersecting(&[a]).is_empty());
        assert!(observer.is_observing(b));
    }

    #[test]
    fn test_counter_runs_to_target() {
        let mut doc = Document::default();
        let node = stat(&mut doc, "250");
        let mut anim = Animations::new();
        let mut timers = TimerQueue::new();
        anim.observe(&[], &[node]);
        anim.on_visible(&mut doc, &mut timers, &[node]).unwrap();
        assert_eq!(timers.pending(), 1);

        for _ in 0..10 {
            assert!(anim.tick_counter(&mut doc, node).unwrap());
        }
        assert_eq!(doc.text_content(node), "20");

        run_counter(&mut anim, &mut doc, node);
        assert_eq!(doc.text_content(node), "250");
        assert!(!anim.tick_counter(&mut doc, node).unwrap());
    }

    #[test]
    fn test_counter_takes_about_two_seconds() {
        let mut doc = Document::default();
        let node = stat(&mut doc, "2500");
        let mut anim = Animations::new();
        let mut timers = TimerQueue::new();
        anim.observe(&[], &[node]);
        anim.on_visible(&mut doc, &mut timers, &[node]).unwrap();

        let ticks = run_counter(&mut anim, &mut doc, node);
        assert!((125..=126).contains(&ticks), "{ticks}");
    }

    #[test]
    fn test_invalid_count_is_zero() {
        let mut doc = Document::default();
        let node = stat(&mut doc, "muitos");
        let mut anim = Animations::new();
        let mut timers = TimerQueue::new();
        anim.observe(&[], &[node]);
        anim.on_visible(&mut doc, &mut timers, &[node]).unwrap();

        assert!(!anim.tick_counter(&mut doc, node).unwrap());
        assert_eq!(doc.text_content(node), "0");
    }

    #[test]
    fn test_reveal_styles() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let card = doc.create_element("article");
        doc.append_child(body, card).unwrap();

        prepare_reveal(&mut doc, card).unwrap();
        assert_eq!(doc.style(card, "opacity").as_deref(), Some("0"));
        reveal(&mut doc, card).unwrap();
        assert_eq!(doc.style(card, "opacity").as_deref(), Some("1"));
        assert_eq!(doc.style(card, "transform").as_deref(), Some("translateY(0)"));
    }

    #[test]
    fn test_ripple_geometry() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let button = doc.create_element("button");
        doc.set_attr(button, "class", "btn").unwrap();
        doc.append_child(body, button).unwrap();
        let mut viewport = Viewport::default();
        viewport.set_rect(button, Rect::new(10.0, 20.0, 100.0, 40.0));
        let mut timers = TimerQueue::new();

        let span = Animations::new()
            .ripple(&mut doc, &viewport, &mut timers, button, 60.0, 40.0)
            .unwrap()
            .unwrap();
        assert_eq!(doc.style(span, "width").as_deref(), Some("100px"));
        assert_eq!(doc.style(span, "left").as_deref(), Some("0px"));
        assert_eq!(doc.style(span, "top").as_deref(), Some("-30px"));
        assert_eq!(doc.style(button, "overflow").as_deref(), Some("hidden"));
        assert_eq!(timers.pop_due(600), Some(Task::RemoveNode(span)));
    }

    #[test]
    fn test_ripple_styles_added_once() {
        let mut doc = Document::default();
        ensure_ripple_styles(&mut doc).unwrap();
        ensure_ripple_styles(&mut doc).unwrap();
        assert_eq!(doc.query_all("#ripple-styles").unwrap().len(), 1);
    }
}
