//! Route table
//!
//! Routes are plain names (`"sobre"`). Anything unregistered resolves to
//! the `"404"` route, so navigation never fails on a bad hash.

use std::collections::BTreeSet;

use crate::History;

pub const HOME: &str = "home";
pub const NOT_FOUND: &str = "404";

/// Routes with a built-in template
pub const BUILTIN_ROUTES: &[&str] = &[
    "home",
    "sobre",
    "projetos",
    "voluntarios",
    "contato",
    "login",
    NOT_FOUND,
];

/// Registered routes
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: BTreeSet<String>,
}

impl RouteTable {
    /// Table with the built-in routes
    pub fn new() -> Self {
        Self {
            routes: BUILTIN_ROUTES.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Built-in routes plus `extra` (routes served by external templates)
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for route in extra {
            let route = route.into();
            if !route.is_empty() {
                table.routes.insert(route);
            }
        }
        table
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.routes.contains(name)
    }

    /// `name` if registered, else `"404"`
    pub fn resolve<'a>(&'a self, name: &str) -> &'a str {
        self.routes
            .get(name)
            .map(String::as_str)
            .unwrap_or(NOT_FOUND)
    }

    /// Route named by a location hash, `"home"` when empty
    pub fn current_route(hash: &str) -> String {
        let name = hash.strip_prefix('#').unwrap_or(hash);
        if name.is_empty() {
            HOME.to_string()
        } else {
            name.to_string()
        }
    }

    /// Set the location hash to a registered route
    pub fn navigate(&self, route: &str, history: &mut History) -> bool {
        if !self.is_registered(route) {
            return false;
        }
        history.push_state(&format!("#{route}"));
        true
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(String::as_str)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_routes() {
        let table = RouteTable::new();
        for route in BUILTIN_ROUTES {
            assert_eq!(table.resolve(route), *route);
        }
    }

    #[test]
    fn test_resolve_unknown_routes() {
        let table = RouteTable::new();
        for name in ["", "eventos", "HOME", "home ", "#home", "../etc/passwd"] {
            assert_eq!(table.resolve(name), NOT_FOUND, "{name:?}");
        }
    }

    #[test]
    fn test_extra_routes() {
        let table = RouteTable::with_extra(["eventos", ""]);
        assert_eq!(table.resolve("eventos"), "eventos");
        assert!(!table.is_registered(""));
        assert_eq!(table.routes().count(), BUILTIN_ROUTES.len() + 1);
    }

    #[test]
    fn test_current_route() {
        assert_eq!(RouteTable::current_route(""), "home");
        assert_eq!(RouteTable::current_route("#"), "home");
        assert_eq!(RouteTable::current_route("#contato"), "contato");
        assert_eq!(RouteTable::current_route("sobre"), "sobre");
    }

    #[test]
    fn test_navigate() {
        let table = RouteTable::new();
        let mut history = History::new("");
        assert!(table.navigate("sobre", &mut history));
        assert_eq!(history.current(), "#sobre");
        assert!(!table.navigate("eventos", &mut history));
        assert_eq!(history.current(), "#sobre");
    }
}
