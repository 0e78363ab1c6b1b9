//! Domain model for tracker data.
//!
//! These are plain values: every view holds its own copies and nothing here
//! is shared mutably between views.

pub mod grouping;
pub mod states;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use grouping::{filter_issues, find_branch_issue, group_by_state, matches_filter};
pub use states::{
    order_states, resolve_canceled_state, resolve_duplicate_state, resolve_in_progress_state,
};
pub use store::{IssueStore, Scope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// The authenticated user plus the teams they can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub organization: Organization,
    pub teams: Vec<Team>,
}

/// Workflow state category as reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateType {
    Triage,
    Backlog,
    Unstarted,
    Started,
    Completed,
    Canceled,
    #[serde(other)]
    Other,
}

impl StateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triage => "triage",
            Self::Backlog => "backlog",
            Self::Unstarted => "unstarted",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Other => "other",
        }
    }
}

/// A team's workflow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: String,
    pub name: String,
    pub color: String,
    pub state_type: StateType,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: String,
    pub number: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub body: String,
    /// Raw timestamp as sent by the tracker (RFC 3339 when well-formed).
    pub created_at: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source_type: String,
    pub subtitle: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: String,
}

/// Issue priority (0-4 from the API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    #[default]
    NoPriority = 0,
    Urgent = 1,
    High = 2,
    Medium = 3,
    Low = 4,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Self::NoPriority,
        Self::Urgent,
        Self::High,
        Self::Medium,
        Self::Low,
    ];

    /// Create from the API integer value; anything out of range means "no priority".
    pub fn from_int(value: i64) -> Self {
        match value {
            1 => Self::Urgent,
            2 => Self::High,
            3 => Self::Medium,
            4 => Self::Low,
            _ => Self::NoPriority,
        }
    }

    pub fn as_int(&self) -> u8 {
        *self as u8
    }

    /// Ordering key inside a bucket. An unset priority sorts after every explicit one.
    pub fn sort_key(&self) -> u8 {
        match self {
            Self::NoPriority => 99,
            other => other.as_int(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoPriority => "No priority",
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub identifier: String, // e.g., "ENG-123"
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimate: Option<f64>,
    pub branch_name: Option<String>,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub state: State,
    pub assignee: Option<User>,
    pub labels: Vec<Label>,
    pub cycle: Option<Cycle>,
    pub team: Team,
    /// Only populated when the full context is fetched.
    pub comments: Vec<Comment>,
    /// Only populated when the full context is fetched.
    pub attachments: Vec<Attachment>,
}

/// Organization details included in the agent prompt when available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContext {
    pub organization_id: String,
    pub organization_name: String,
}

impl From<Organization> for IssueContext {
    fn from(org: Organization) -> Self {
        Self {
            organization_id: org.id,
            organization_name: org.name,
        }
    }
}
