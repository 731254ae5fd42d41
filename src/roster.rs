//! Roster and Directory definitions
//!
//! The roster is the set of display names currently in use; the directory
//! maps registered sessions to their names and back. Both are owned
//! exclusively by the relay actor, which keeps check-and-insert and
//! remove-then-broadcast sequences indivisible without any locking.

use std::collections::{HashMap, HashSet};

use crate::types::SessionId;

/// The set of registered display names
///
/// Invariant: no two live sessions hold the same name. `try_register`
/// is the only insertion path and tests membership and inserts in one
/// step.
#[derive(Debug, Default)]
pub struct Roster {
    names: HashSet<String>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name if it is not already taken
    ///
    /// Returns true on success, false if the name is in use.
    pub fn try_register(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    /// Release a name; no-op if it was not registered
    pub fn release(&mut self, name: &str) {
        self.names.remove(name);
    }

    /// Check whether a name is currently registered
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether no names are registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Mapping between registered sessions and their names
///
/// A session appears here exactly while it is registered: inserted when
/// negotiation completes, removed on teardown. Lookups in both
/// directions back the router's recipient resolution and the
/// personalized active-list views.
#[derive(Debug, Default)]
pub struct Directory {
    by_session: HashMap<SessionId, String>,
    by_name: HashMap<String, SessionId>,
}

impl Directory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a registered session under its name
    pub fn insert(&mut self, id: SessionId, name: String) {
        self.by_session.insert(id, name.clone());
        self.by_name.insert(name, id);
    }

    /// Remove a session, returning the name it was registered under
    pub fn remove(&mut self, id: SessionId) -> Option<String> {
        let name = self.by_session.remove(&id)?;
        self.by_name.remove(&name);
        Some(name)
    }

    /// Resolve a name to its live session, if any
    pub fn resolve(&self, name: &str) -> Option<SessionId> {
        self.by_name.get(name).copied()
    }

    /// Name a session is registered under, if any
    pub fn name_of(&self, id: SessionId) -> Option<&str> {
        self.by_session.get(&id).map(String::as_str)
    }

    /// All registered names, sorted
    pub fn snapshot(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted names minus the excluded one
    ///
    /// Builds the personalized active-list view for the named peer.
    pub fn view_for(&self, excluded: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .keys()
            .filter(|name| name.as_str() != excluded)
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Iterate over all registered (session, name) pairs
    pub fn entries(&self) -> impl Iterator<Item = (SessionId, &str)> {
        self.by_session.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of registered sessions
    pub fn len(&self) -> usize {
        self.by_session.len()
    }

    /// Check whether no sessions are registered
    pub fn is_empty(&self) -> bool {
        self.by_session.is_empty()
    }
}
