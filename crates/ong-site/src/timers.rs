//! Virtual-time timers
//!
//! The host owns the clock: it advances time and the app runs whatever
//! became due, in due-time order and then scheduling order.

use std::collections::{BTreeMap, HashMap};

use ong_a11y::Announcement;
use ong_dom::NodeId;

/// Timer handle
pub type TimerId = u64;

/// Deferred work scheduled by the site runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Add `show` to a toast
    ShowToast(NodeId),
    /// Remove `show` from a toast and schedule its removal
    HideToast(NodeId),
    /// Detach a node from the document
    RemoveNode(NodeId),
    /// Clear the live region if it still shows this message
    ClearAnnouncement(Announcement),
    /// Advance a stat counter
    CounterTick(NodeId),
    /// Show the welcome toast
    WelcomeToast,
}

/// Timer queue keyed by (due time, id)
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: u64,
    next_id: TimerId,
    queue: BTreeMap<(u64, TimerId), T>,
    due: HashMap<TimerId, u64>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            queue: BTreeMap::new(),
            due: HashMap::new(),
        }
    }

    /// Current virtual time in ms
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `task` `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now.saturating_add(delay_ms);
        self.queue.insert((due, id), task);
        self.due.insert(id, due);
        id
    }

    /// Remove a pending timer
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let due = self.due.remove(&id)?;
        self.queue.remove(&(due, id))
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the next timer
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Pop the next task due at or before `until`, moving the clock to it
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        self.due.remove(&id);
        let task = self.queue.remove(&(due, id))?;
        self.now = self.now.max(due);
        Some(task)
    }

    /// Move the clock to `until` once everything due ran
    pub fn finish(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Only the last call within `wait` fires, `wait` after it
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    wait: u64,
    pending: Option<(u64, T)>,
}

impl<T> Debounce<T> {
    pub fn new(wait: u64) -> Self {
        Self { wait, pending: None }
    }

    /// Record a call at `now`, replacing any pending one
    pub fn call(&mut self, now: u64, value: T) {
        self.pending = Some((now.saturating_add(self.wait), value));
    }

    /// Take the pending value if its wait elapsed
    pub fn poll(&mut self, now: u64) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// At most one call per `limit` window
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: u64,
    blocked_until: Option<u64>,
}

impl Throttle {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            blocked_until: None,
        }
    }

    /// Whether a call at `now` goes through
    pub fn try_call(&mut self, now: u64) -> bool {
        if self.blocked_until.is_some_and(|until| now < until) {
            return false;
        }
        self.blocked_until = Some(now.saturating_add(self.limit));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_order_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(300, "c");
        timers.schedule(100, "a");
        timers.schedule(100, "b");

        assert_eq!(timers.pop_due(1000), Some("a"));
        assert_eq!(timers.pop_due(1000), Some("b"));
        assert_eq!(timers.now(), 100);
        assert_eq!(timers.pop_due(1000), Some("c"));
        assert_eq!(timers.pop_due(1000), None);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timers = TimerQueue::new();
        timers.schedule(500, 1);
        assert_eq!(timers.pop_due(499), None);
        timers.finish(499);
        assert_eq!(timers.now(), 499);
        assert_eq!(timers.next_due(), Some(500));
        assert_eq!(timers.pop_due(500), Some(1));
    }

    #[test]
    fn test_schedule_relative_to_now() {
        let mut timers = TimerQueue::new();
        timers.finish(1000);
        timers.schedule(16, ());
        assert_eq!(timers.next_due(), Some(1016));
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(10, "x");
        timers.schedule(20, "y");
        assert_eq!(timers.cancel(id), Some("x"));
        assert_eq!(timers.cancel(id), None);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_debounce_keeps_last_call() {
        let mut debounce = Debounce::new(300);
        debounce.call(0, "a");
        debounce.call(100, "ab");
        assert_eq!(debounce.poll(300), None);
        assert_eq!(debounce.poll(400), Some("ab"));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_throttle_window() {
        let mut throttle = Throttle::new(100);
        assert!(throttle.try_call(0));
        assert!(!throttle.try_call(50));
        assert!(!throttle.try_call(99));
        assert!(throttle.try_call(100));
    }
}
