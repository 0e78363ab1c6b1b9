//! Test utilities and fixtures for linc tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use linc::data::{Issue, Organization, Priority, State, StateType, Team, Viewer};
use linc::integrations::git::{Checkout, Vcs};
use linc::integrations::Tracker;
use std::sync::Mutex;

// ============================================================================
// Fixtures
// ============================================================================

pub fn team(id: &str, name: &str, key: &str) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
        key: key.to_string(),
    }
}

pub fn eng_team() -> Team {
    team("team-eng", "Engineering", "ENG")
}

pub fn state(id: &str, name: &str, state_type: StateType, position: f64) -> State {
    State {
        id: id.to_string(),
        name: name.to_string(),
        color: "#888888".to_string(),
        state_type,
        position,
    }
}

/// A typical team workflow, already in display order.
pub fn workflow() -> Vec<State> {
    vec![
        state("backlog", "Backlog", StateType::Backlog, 0.0),
        state("todo", "Todo", StateType::Unstarted, 1.0),
        state("progress", "In Progress", StateType::Started, 2.0),
        state("done", "Done", StateType::Completed, 3.0),
        state("canceled", "Canceled", StateType::Canceled, 4.0),
    ]
}

pub fn workflow_state(id: &str) -> State {
    workflow()
        .into_iter()
        .find(|s| s.id == id)
        .unwrap_or_else(|| panic!("no workflow state {id}"))
}

/// An ENG issue in the given workflow state.
pub fn issue(identifier: &str, state_id: &str, priority: Priority) -> Issue {
    Issue {
        id: format!("id-{}", identifier.to_lowercase()),
        identifier: identifier.to_string(),
        title: format!("Title of {identifier}"),
        description: String::new(),
        priority,
        estimate: None,
        branch_name: Some(format!("user/{}-work", identifier.to_lowercase())),
        url: format!("https://linear.app/acme/issue/{identifier}"),
        created_at: None,
        state: workflow_state(state_id),
        assignee: None,
        labels: Vec::new(),
        cycle: None,
        team: eng_team(),
        comments: Vec::new(),
        attachments: Vec::new(),
    }
}

pub fn organization() -> Organization {
    Organization {
        id: "org-1".to_string(),
        name: "Acme".to_string(),
    }
}

pub fn viewer(teams: Vec<Team>) -> Viewer {
    Viewer {
        id: "user-1".to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        organization: organization(),
        teams,
    }
}

// ============================================================================
// Fake tracker
// ============================================================================

/// A tracker call, as recorded by [`FakeTracker`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Viewer,
    TeamStates(String),
    MyIssues(String),
    AllIssues(String),
    IssueWithContext(String),
    Organization,
    CreateComment { issue_id: String, body: String },
    UpdateTitle { issue_id: String, title: String },
    UpdatePriority { issue_id: String, priority: Priority },
    UpdateState { issue_id: String, state_id: String },
}

/// In-memory tracker. Operations named in `fail` return an error.
#[derive(Default)]
pub struct FakeTracker {
    pub viewer: Option<Viewer>,
    pub states: Vec<State>,
    pub my_issues: Vec<Issue>,
    pub all_issues: Vec<Issue>,
    pub context_issue: Option<Issue>,
    pub organization: Option<Organization>,
    pub fail: Vec<&'static str>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states(mut self, states: Vec<State>) -> Self {
        self.states = states;
        self
    }

    pub fn failing(mut self, op: &'static str) -> Self {
        self.fail.push(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail.contains(&op) {
            return Err(anyhow!("{op} failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl Tracker for FakeTracker {
    async fn viewer(&self) -> Result<Viewer> {
        self.record("viewer", Call::Viewer)?;
        self.viewer.clone().ok_or_else(|| anyhow!("no viewer"))
    }

    async fn team_states(&self, team_id: &str) -> Result<Vec<State>> {
        self.record("team_states", Call::TeamStates(team_id.to_string()))?;
        Ok(self.states.clone())
    }

    async fn my_issues(&self, team_id: &str) -> Result<Vec<Issue>> {
        self.record("my_issues", Call::MyIssues(team_id.to_string()))?;
        Ok(self.my_issues.clone())
    }

    async fn all_team_issues(&self, team_id: &str) -> Result<Vec<Issue>> {
        self.record("all_team_issues", Call::AllIssues(team_id.to_string()))?;
        Ok(self.all_issues.clone())
    }

    async fn issue_with_context(&self, issue_id: &str) -> Result<Issue> {
        self.record(
            "issue_with_context",
            Call::IssueWithContext(issue_id.to_string()),
        )?;
        self.context_issue
            .clone()
            .ok_or_else(|| anyhow!("issue not found"))
    }

    async fn create_comment(&self, issue_id: &str, body: &str) -> Result<()> {
        self.record(
            "create_comment",
            Call::CreateComment {
                issue_id: issue_id.to_string(),
                body: body.to_string(),
            },
        )
    }

    async fn update_title(&self, issue_id: &str, title: &str) -> Result<()> {
        self.record(
            "update_title",
            Call::UpdateTitle {
                issue_id: issue_id.to_string(),
                title: title.to_string(),
            },
        )
    }

    async fn update_priority(&self, issue_id: &str, priority: Priority) -> Result<()> {
        self.record(
            "update_priority",
            Call::UpdatePriority {
                issue_id: issue_id.to_string(),
                priority,
            },
        )
    }

    async fn update_state(&self, issue_id: &str, state_id: &str) -> Result<()> {
        self.record(
            "update_state",
            Call::UpdateState {
                issue_id: issue_id.to_string(),
                state_id: state_id.to_string(),
            },
        )
    }

    async fn organization(&self) -> Result<Organization> {
        self.record("organization", Call::Organization)?;
        self.organization
            .clone()
            .ok_or_else(|| anyhow!("no organization"))
    }
}

// ============================================================================
// Fake version control
// ============================================================================

/// Records checkouts and answers with a fixed result.
pub struct FakeVcs {
    pub result: Checkout,
    pub fail: bool,
    checkouts: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn new(result: Checkout) -> Self {
        Self {
            result,
            fail: false,
            checkouts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Checkout::Existing)
        }
    }

    pub fn checkouts(&self) -> Vec<String> {
        self.checkouts.lock().unwrap().clone()
    }
}

impl Vcs for FakeVcs {
    fn checkout(&self, branch: &str) -> Result<Checkout> {
        self.checkouts.lock().unwrap().push(branch.to_string());
        if self.fail {
            return Err(anyhow!("pathspec '{branch}' did not match"));
        }
        Ok(self.result)
    }
}
