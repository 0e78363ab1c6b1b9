//! Message enum for Elm Architecture (TEA) pattern.
//!
//! Key events are mapped to messages by `input::dispatch`; background effects
//! report back with messages too. Everything goes through `App::update()`.

use crate::agent::LaunchRequest;
use crate::config::WorkspaceChoice;
use crate::data::{Issue, Priority, State, Team, Viewer};

/// Whether an edit is being asked for or has been answered by the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Requested,
    Completed(Result<(), String>),
}

/// One edit to one issue, in either phase.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueUpdate<T> {
    pub issue_id: String,
    pub value: T,
    pub phase: Phase,
}

impl<T> IssueUpdate<T> {
    pub fn requested(issue_id: impl Into<String>, value: T) -> Self {
        Self {
            issue_id: issue_id.into(),
            value,
            phase: Phase::Requested,
        }
    }

    pub fn completed(issue_id: impl Into<String>, value: T, result: Result<(), String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            value,
            phase: Phase::Completed(result),
        }
    }
}

/// A single editing keystroke for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Issue list actions.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    MoveUp,
    MoveDown,
    PrevTab,
    NextTab,
    /// Switch between "my issues" and "all issues"
    ToggleScope,
    StartFilter,
    Filter(TextEdit),
    EndFilter,
    ClearFilter,
    OpenDetail,
    OpenSettings,
    StartRename,
    StartPriority,
    StartStatus,
    EditText(TextEdit),
    EditUp,
    EditDown,
    EditConfirm,
    EditCancel,
    /// Pick a priority and confirm in one step
    QuickPriority(Priority),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Back,
    OpenInBrowser,
    FocusLeft,
    FocusRight,
    ToggleFocus,
    Activate,
    NextIssue,
    PrevIssue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartWorkAction {
    NextFocus,
    PrevFocus,
    Edit(TextEdit),
    Activate,
    Back,
}

/// Cursor list actions shared by the team and workspace pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Up,
    Down,
    Select,
    /// Team picker only: toggle "remember as default"
    ToggleDefault,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    Back,
    EditProvider,
    Up,
    Down,
    Confirm,
    Cancel,
}

/// All messages the session controller handles.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────────────────────
    // App lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Quit the application
    Quit,

    // ─────────────────────────────────────────────────────────────────────────
    // View input
    // ─────────────────────────────────────────────────────────────────────────
    List(ListAction),
    Detail(DetailAction),
    StartWork(StartWorkAction),
    TeamSelect(PickerAction),
    WorkspaceSelect(PickerAction),
    Settings(SettingsAction),

    // ─────────────────────────────────────────────────────────────────────────
    // View switches
    // ─────────────────────────────────────────────────────────────────────────
    SwitchToList,
    SwitchToTeamSelect,
    SwitchToWorkspaceSelect,
    SwitchToSettings,
    SwitchToDetail(Box<Issue>),
    SwitchToStartWork(Box<Issue>),
    /// Step the detail view to the next issue of the list
    NextIssue,
    /// Step the detail view to the previous issue of the list
    PrevIssue,

    // ─────────────────────────────────────────────────────────────────────────
    // Selections
    // ─────────────────────────────────────────────────────────────────────────
    TeamSelected { team: Team, set_as_default: bool },
    WorkspaceSelected(WorkspaceChoice),
    ProviderSelected(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Loads
    // ─────────────────────────────────────────────────────────────────────────
    ViewerLoaded(Result<Viewer, String>),
    StatesLoaded {
        team_id: String,
        result: Result<Vec<State>, String>,
    },
    MyIssuesLoaded {
        team_id: String,
        result: Result<Vec<Issue>, String>,
    },
    AllIssuesLoaded {
        team_id: String,
        result: Result<Vec<Issue>, String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Issue edits
    // ─────────────────────────────────────────────────────────────────────────
    TitleUpdated(IssueUpdate<String>),
    PriorityUpdated(IssueUpdate<Priority>),
    /// `None` means the target state could not be resolved and nothing changed
    StateUpdated(IssueUpdate<Option<String>>),
    CancelIssue { issue_id: String, team_id: String },
    MarkDuplicate { issue_id: String, team_id: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Hand-off
    // ─────────────────────────────────────────────────────────────────────────
    /// End the session and launch an agent on the issue
    Launch(LaunchRequest),
    CommentCreated(Result<(), String>),

    // ─────────────────────────────────────────────────────────────────────────
    // Misc
    // ─────────────────────────────────────────────────────────────────────────
    OpenBrowser(String),
    ConfigSaved(Result<(), String>),

    // ─────────────────────────────────────────────────────────────────────────
    // No-op
    // ─────────────────────────────────────────────────────────────────────────
    /// No operation (for unhandled keys)
    None,
}
