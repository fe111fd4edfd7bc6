//! Session history of location hashes

use std::collections::VecDeque;

const MAX_ENTRIES: usize = 100;

/// Navigation history
#[derive(Debug, Clone)]
pub struct History {
    /// Back stack
    back: VecDeque<String>,
    /// Forward stack
    forward: Vec<String>,
    /// Current location hash
    current: String,
}

impl History {
    /// History with a single entry
    pub fn new(initial_hash: &str) -> Self {
        Self {
            back: VecDeque::new(),
            forward: Vec::new(),
            current: initial_hash.to_string(),
        }
    }

    /// `history.pushState({}, '', hash)`
    pub fn push_state(&mut self, hash: &str) {
        let previous = std::mem::replace(&mut self.current, hash.to_string());
        self.back.push_back(previous);
        while self.back.len() > MAX_ENTRIES {
            self.back.pop_front();
        }
        self.forward.clear();
    }

    /// `history.replaceState({}, '', hash)`
    pub fn replace_state(&mut self, hash: &str) {
        self.current = hash.to_string();
    }

    /// Go back; returns the new current hash
    pub fn go_back(&mut self) -> Option<String> {
        let prev = self.back.pop_back()?;
        let current = std::mem::replace(&mut self.current, prev);
        self.forward.push(current);
        Some(self.current.clone())
    }

    /// Go forward; returns the new current hash
    pub fn go_forward(&mut self) -> Option<String> {
        let next = self.forward.pop()?;
        let current = std::mem::replace(&mut self.current, next);
        self.back.push_back(current);
        Some(self.current.clone())
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Current location hash
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.back.len() + 1 + self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_forward() {
        let mut history = History::new("#home");
        history.push_state("#sobre");
        history.push_state("#contato");
        assert_eq!(history.len(), 3);

        assert_eq!(history.go_back().as_deref(), Some("#sobre"));
        assert_eq!(history.go_back().as_deref(), Some("#home"));
        assert_eq!(history.go_back(), None);
        assert_eq!(history.go_forward().as_deref(), Some("#sobre"));
        assert!(history.can_go_forward());
    }

    #[test]
    fn test_push_clears_forward() {
        let mut history = History::new("#home");
        history.push_state("#sobre");
        history.go_back();
        history.push_state("#login");
        assert!(!history.can_go_forward());
        assert_eq!(history.current(), "#login");
    }

    #[test]
    fn test_bounded() {
        let mut history = History::new("");
        for i in 0..(MAX_ENTRIES + 20) {
            history.push_state(&format!("#p{i}"));
        }
        assert_eq!(history.len(), MAX_ENTRIES + 1);
    }
}
