//! Issue list: state tabs, filtering, in-place edits and branch correlation.

use super::{step, TextInput};
use crate::data::{
    filter_issues, find_branch_issue, group_by_state, Issue, IssueStore, Priority, Scope, State,
};
use crate::tui::message::{IssueUpdate, ListAction, Message, Phase};
use std::collections::HashMap;

/// The edit in progress, if any. Every mode targets one issue by id.
///
/// `submitted` is set once the change has been sent; the mode then stays up
/// (showing progress) until the tracker answers.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditMode {
    #[default]
    None,
    Rename {
        issue_id: String,
        input: TextInput,
        submitted: bool,
    },
    Priority {
        issue_id: String,
        cursor: usize,
        submitted: bool,
    },
    Status {
        issue_id: String,
        cursor: usize,
        submitted: bool,
    },
}

impl EditMode {
    pub fn issue_id(&self) -> Option<&str> {
        match self {
            EditMode::None => None,
            EditMode::Rename { issue_id, .. }
            | EditMode::Priority { issue_id, .. }
            | EditMode::Status { issue_id, .. } => Some(issue_id),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, EditMode::None)
    }

    pub fn is_submitted(&self) -> bool {
        match self {
            EditMode::None => false,
            EditMode::Rename { submitted, .. }
            | EditMode::Priority { submitted, .. }
            | EditMode::Status { submitted, .. } => *submitted,
        }
    }
}

/// Entries the status picker shows after the team's states.
pub const STATUS_EXTRA_ENTRIES: [&str; 2] = ["Canceled", "Duplicate"];

#[derive(Debug, Clone)]
pub struct ListView {
    store: IssueStore,
    states: Vec<State>,
    scope: Scope,
    /// State id -> issue ids of the active scope, priority ordered
    buckets: HashMap<String, Vec<String>>,
    /// Issue ids of the active tab that pass the filter
    filtered: Vec<String>,
    cursor: usize,
    active_tab: usize,
    filter: TextInput,
    filtering: bool,
    loading: bool,
    error: Option<String>,
    edit: EditMode,
    branch: Option<String>,
    branch_issue: Option<String>,
    working_dir: String,
    version: String,
}

impl ListView {
    pub fn new(version: &str, working_dir: &str, branch: Option<String>) -> Self {
        Self {
            store: IssueStore::new(),
            states: Vec::new(),
            scope: Scope::Mine,
            buckets: HashMap::new(),
            filtered: Vec::new(),
            cursor: 0,
            active_tab: 0,
            filter: TextInput::with_limit(100),
            filtering: false,
            loading: true,
            error: None,
            edit: EditMode::None,
            branch: branch.filter(|b| !b.is_empty()),
            branch_issue: None,
            working_dir: working_dir.to_string(),
            version: version.to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_states(&mut self, result: Result<Vec<State>, String>) {
        match result {
            Ok(states) => {
                self.states = states;
                self.active_tab = self
                    .states
                    .iter()
                    .position(|s| s.name.eq_ignore_ascii_case("todo"))
                    .unwrap_or(0);
                self.refilter();
            }
            Err(e) => self.error = Some(e),
        }
    }

    /// Only the "my issues" load clears the loading flag.
    pub fn set_issues(&mut self, scope: Scope, result: Result<Vec<Issue>, String>) {
        if scope == Scope::Mine {
            self.loading = false;
        }
        match result {
            Ok(issues) => {
                self.store.replace(scope, issues);
                self.refresh();
            }
            Err(e) => self.error = Some(e),
        }
    }

    pub fn set_branch(&mut self, branch: Option<String>) {
        self.branch = branch.filter(|b| !b.is_empty());
        self.correlate_branch();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived state
    // ─────────────────────────────────────────────────────────────────────────

    fn refresh(&mut self) {
        self.regroup();
        self.refilter();
        self.correlate_branch();
    }

    fn regroup(&mut self) {
        self.buckets = group_by_state(self.store.iter(self.scope))
            .into_iter()
            .map(|(state_id, issues)| {
                (state_id, issues.into_iter().map(|i| i.id.clone()).collect())
            })
            .collect();
    }

    fn refilter(&mut self) {
        let filtered: Vec<String> = match self.states.get(self.active_tab) {
            Some(state) => {
                let bucket: Vec<&Issue> = self
                    .buckets
                    .get(&state.id)
                    .map(|ids| ids.iter().filter_map(|id| self.store.get(id)).collect())
                    .unwrap_or_default();
                filter_issues(&bucket, self.filter.value())
                    .into_iter()
                    .map(|i| i.id.clone())
                    .collect()
            }
            None => Vec::new(),
        };
        self.filtered = filtered;
        self.cursor = self.cursor.min(self.filtered.len().saturating_sub(1));
    }

    fn correlate_branch(&mut self) {
        self.branch_issue = self
            .branch
            .as_deref()
            .and_then(|branch| find_branch_issue(branch, self.store.iter_mine_then_all()))
            .map(|issue| issue.id.clone());
    }

    fn change_tab(&mut self, tab: usize) {
        self.active_tab = tab;
        self.cursor = 0;
        self.filter.clear();
        self.refilter();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a list action, returning the message it leads to (if any).
    ///
    /// Input is ignored while a submitted edit waits for the tracker.
    pub fn apply(&mut self, action: ListAction) -> Option<Message> {
        if self.edit.is_submitted() {
            return None;
        }

        match action {
            ListAction::MoveUp => self.cursor = step(self.cursor, self.filtered.len(), false),
            ListAction::MoveDown => self.cursor = step(self.cursor, self.filtered.len(), true),
            ListAction::PrevTab => {
                if self.active_tab > 0 {
                    self.change_tab(self.active_tab - 1);
                }
            }
            ListAction::NextTab => {
                if self.active_tab + 1 < self.states.len() {
                    self.change_tab(self.active_tab + 1);
                }
            }
            ListAction::ToggleScope => {
                self.scope = self.scope.toggled();
                self.cursor = 0;
                self.regroup();
                self.refilter();
            }
            ListAction::StartFilter => self.filtering = true,
            ListAction::Filter(edit) => {
                if self.filter.apply(edit) {
                    self.refilter();
                }
            }
            ListAction::EndFilter => self.filtering = false,
            ListAction::ClearFilter => {
                self.filter.clear();
                self.refilter();
            }
            ListAction::OpenDetail => {
                return self
                    .selected()
                    .map(|issue| Message::SwitchToDetail(Box::new(issue.clone())));
            }
            ListAction::OpenSettings => return Some(Message::SwitchToSettings),
            ListAction::StartRename => {
                if let Some(issue) = self.selected() {
                    let mut input = TextInput::with_limit(200);
                    input.set(&issue.title);
                    self.edit = EditMode::Rename {
                        issue_id: issue.id.clone(),
                        input,
                        submitted: false,
                    };
                }
            }
            ListAction::StartPriority => {
                if let Some(issue) = self.selected() {
                    self.edit = EditMode::Priority {
                        issue_id: issue.id.clone(),
                        cursor: issue.priority.as_int() as usize,
                        submitted: false,
                    };
                }
            }
            ListAction::StartStatus => {
                if let Some(issue) = self.selected() {
                    let cursor = self
                        .states
                        .iter()
                        .position(|s| s.id == issue.state.id)
                        .unwrap_or(0);
                    self.edit = EditMode::Status {
                        issue_id: issue.id.clone(),
                        cursor,
                        submitted: false,
                    };
                }
            }
            ListAction::EditText(edit) => {
                if let EditMode::Rename { input, .. } = &mut self.edit {
                    input.apply(edit);
                }
            }
            ListAction::EditUp | ListAction::EditDown => {
                let down = action == ListAction::EditDown;
                let status_len = self.states.len() + STATUS_EXTRA_ENTRIES.len();
                match &mut self.edit {
                    EditMode::Priority { cursor, .. } => {
                        *cursor = step(*cursor, Priority::ALL.len(), down)
                    }
                    EditMode::Status { cursor, .. } => *cursor = step(*cursor, status_len, down),
                    _ => {}
                }
            }
            ListAction::EditConfirm => return self.confirm_edit(None),
            ListAction::EditCancel => self.edit = EditMode::None,
            ListAction::QuickPriority(priority) => {
                if matches!(self.edit, EditMode::Priority { .. }) {
                    return self.confirm_edit(Some(priority));
                }
            }
        }
        None
    }

    /// Turn the current edit into its request message and mark it submitted.
    fn confirm_edit(&mut self, quick_priority: Option<Priority>) -> Option<Message> {
        let message = match &self.edit {
            EditMode::None => return None,
            EditMode::Rename { issue_id, input, .. } => {
                let title = input.value().trim();
                if title.is_empty() {
                    self.edit = EditMode::None;
                    return None;
                }
                Message::TitleUpdated(IssueUpdate::requested(issue_id.clone(), title.to_string()))
            }
            EditMode::Priority {
                issue_id, cursor, ..
            } => {
                let priority =
                    quick_priority.unwrap_or_else(|| Priority::from_int(*cursor as i64));
                Message::PriorityUpdated(IssueUpdate::requested(issue_id.clone(), priority))
            }
            EditMode::Status {
                issue_id, cursor, ..
            } => {
                let Some(team_id) = self.store.get(issue_id).map(|i| i.team.id.clone()) else {
                    self.edit = EditMode::None;
                    return None;
                };
                let issue_id = issue_id.clone();
                match self.states.get(*cursor) {
                    Some(state) => Message::StateUpdated(IssueUpdate::requested(
                        issue_id,
                        Some(state.id.clone()),
                    )),
                    None if *cursor == self.states.len() => {
                        Message::CancelIssue { issue_id, team_id }
                    }
                    None => Message::MarkDuplicate { issue_id, team_id },
                }
            }
        };

        match &mut self.edit {
            EditMode::Rename { submitted, .. }
            | EditMode::Priority { submitted, .. }
            | EditMode::Status { submitted, .. } => *submitted = true,
            EditMode::None => {}
        }
        Some(message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Completed edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the outcome of an edit and leave edit mode.
    ///
    /// Returns the successful outcome's value so callers can apply it.
    fn finish_edit<'a, T>(&mut self, update: &'a IssueUpdate<T>) -> Option<&'a T> {
        let outcome = match &update.phase {
            Phase::Requested => return None,
            Phase::Completed(Ok(())) => Some(&update.value),
            Phase::Completed(Err(e)) => {
                tracing::warn!("Update of {} failed: {}", update.issue_id, e);
                self.error = Some(e.clone());
                None
            }
        };
        self.edit = EditMode::None;
        outcome
    }

    pub fn title_updated(&mut self, update: &IssueUpdate<String>) {
        if let Some(title) = self.finish_edit(update) {
            if let Some(issue) = self.store.get_mut(&update.issue_id) {
                issue.title = title.clone();
            }
            self.refresh();
        }
    }

    pub fn priority_updated(&mut self, update: &IssueUpdate<Priority>) {
        if let Some(priority) = self.finish_edit(update) {
            if let Some(issue) = self.store.get_mut(&update.issue_id) {
                issue.priority = *priority;
            }
            self.refresh();
        }
    }

    /// A missing state id, or one the team does not have, removes the issue from the list.
    pub fn state_updated(&mut self, update: &IssueUpdate<Option<String>>) {
        let Some(state_id) = self.finish_edit(update) else {
            return;
        };
        let state = state_id
            .as_ref()
            .and_then(|id| self.states.iter().find(|s| &s.id == id).cloned());
        match state {
            Some(state) => {
                if let Some(issue) = self.store.get_mut(&update.issue_id) {
                    issue.state = state;
                }
            }
            None => {
                self.store.remove(&update.issue_id);
            }
        }
        self.refresh();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Detail stepping
    // ─────────────────────────────────────────────────────────────────────────

    /// Move the cursor to the neighbouring issue and return it, if there is one.
    pub fn step_issue(&mut self, forward: bool) -> Option<Issue> {
        let target = if forward {
            (self.cursor + 1 < self.filtered.len()).then(|| self.cursor + 1)
        } else {
            self.cursor.checked_sub(1)
        }?;
        self.cursor = target;
        self.selected().cloned()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<&Issue> {
        self.filtered
            .get(self.cursor)
            .and_then(|id| self.store.get(id))
    }

    pub fn filtered(&self) -> Vec<&Issue> {
        self.filtered
            .iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    pub fn bucket_len(&self, state_id: &str) -> usize {
        self.buckets.get(state_id).map_or(0, Vec::len)
    }

    pub fn issue(&self, id: &str) -> Option<&Issue> {
        self.store.get(id)
    }

    pub fn store(&self) -> &IssueStore {
        &self.store
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn filter(&self) -> &TextInput {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn edit(&self) -> &EditMode {
        &self.edit
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn branch_issue(&self) -> Option<&Issue> {
        self.branch_issue.as_deref().and_then(|id| self.store.get(id))
    }

    pub fn working_dir(&self) -> &str {
        &self.working_dir
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether a plain `q` should be treated as text instead of quitting.
    pub fn captures_text(&self) -> bool {
        self.filtering || matches!(self.edit, EditMode::Rename { .. })
    }
}
