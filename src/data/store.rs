//! Single indexed issue store backing the list view.
//!
//! "My issues" and "all issues" are id lists into one map, so an edit lands
//! in exactly one place and every scope sees it.

use super::Issue;
use std::collections::HashMap;

/// Which issue collection is being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Mine,
    All,
}

impl Scope {
    pub fn toggled(self) -> Self {
        match self {
            Scope::Mine => Scope::All,
            Scope::All => Scope::Mine,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scope::Mine => "My Issues",
            Scope::All => "All Issues",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IssueStore {
    issues: HashMap<String, Issue>,
    mine: Vec<String>,
    all: Vec<String>,
}

impl IssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one scope's contents. Issues only referenced by the old list are dropped.
    pub fn replace(&mut self, scope: Scope, issues: Vec<Issue>) {
        let ids: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
        for issue in issues {
            self.issues.insert(issue.id.clone(), issue);
        }
        *self.ids_mut(scope) = ids;
        self.prune();
    }

    pub fn ids(&self, scope: Scope) -> &[String] {
        match scope {
            Scope::Mine => &self.mine,
            Scope::All => &self.all,
        }
    }

    fn ids_mut(&mut self, scope: Scope) -> &mut Vec<String> {
        match scope {
            Scope::Mine => &mut self.mine,
            Scope::All => &mut self.all,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Issue> {
        self.issues.get_mut(id)
    }

    /// Issues of one scope, in the order the tracker returned them.
    pub fn iter(&self, scope: Scope) -> impl Iterator<Item = &Issue> + '_ {
        self.ids(scope).iter().filter_map(|id| self.issues.get(id))
    }

    /// "My issues" followed by "all issues"; an issue in both appears twice.
    pub fn iter_mine_then_all(&self) -> impl Iterator<Item = &Issue> + '_ {
        self.iter(Scope::Mine).chain(self.iter(Scope::All))
    }

    /// Remove an issue from every scope. Returns false if it was not held.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.issues.remove(id).is_some();
        self.mine.retain(|i| i != id);
        self.all.retain(|i| i != id);
        removed
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    fn prune(&mut self) {
        let (mine, all) = (&self.mine, &self.all);
        self.issues
            .retain(|id, _| mine.iter().any(|i| i == id) || all.iter().any(|i| i == id));
    }
}
