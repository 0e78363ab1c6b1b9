//! Side effects requested by the session controller.
//!
//! Each effect runs as its own task and reports back with exactly one message.

use super::message::{IssueUpdate, Message};
use crate::config::Config;
use crate::data::{order_states, resolve_canceled_state, resolve_duplicate_state, Priority, State};
use crate::integrations::Tracker;
use crate::util::send_or_log;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadViewer,
    LoadStates { team_id: String },
    LoadMyIssues { team_id: String },
    LoadAllIssues { team_id: String },
    CreateComment { issue_id: String, body: String },
    UpdateTitle { issue_id: String, title: String },
    UpdatePriority { issue_id: String, priority: Priority },
    UpdateState { issue_id: String, state_id: String },
    /// Resolve the team's canceled state, then move the issue there
    CancelIssue { issue_id: String, team_id: String },
    /// Resolve the team's duplicate state, then move the issue there
    MarkDuplicate { issue_id: String, team_id: String },
    SaveConfig { config: Box<Config>, path: PathBuf },
    OpenBrowser(String),
}

fn err_string<T>(result: Result<T>) -> Result<T, String> {
    result.map_err(|e| format!("{e:#}"))
}

impl Effect {
    /// Run the effect to completion and produce the message it reports with.
    pub async fn run(self, tracker: Arc<dyn Tracker>) -> Message {
        match self {
            Effect::LoadViewer => Message::ViewerLoaded(err_string(tracker.viewer().await)),
            Effect::LoadStates { team_id } => {
                let result = err_string(tracker.team_states(&team_id).await.map(order_states));
                Message::StatesLoaded { team_id, result }
            }
            Effect::LoadMyIssues { team_id } => {
                let result = err_string(tracker.my_issues(&team_id).await);
                Message::MyIssuesLoaded { team_id, result }
            }
            Effect::LoadAllIssues { team_id } => {
                let result = err_string(tracker.all_team_issues(&team_id).await);
                Message::AllIssuesLoaded { team_id, result }
            }
            Effect::CreateComment { issue_id, body } => {
                Message::CommentCreated(err_string(tracker.create_comment(&issue_id, &body).await))
            }
            Effect::UpdateTitle { issue_id, title } => {
                let result = err_string(tracker.update_title(&issue_id, &title).await);
                Message::TitleUpdated(IssueUpdate::completed(issue_id, title, result))
            }
            Effect::UpdatePriority { issue_id, priority } => {
                let result = err_string(tracker.update_priority(&issue_id, priority).await);
                Message::PriorityUpdated(IssueUpdate::completed(issue_id, priority, result))
            }
            Effect::UpdateState { issue_id, state_id } => {
                let result = err_string(tracker.update_state(&issue_id, &state_id).await);
                Message::StateUpdated(IssueUpdate::completed(issue_id, Some(state_id), result))
            }
            Effect::CancelIssue { issue_id, team_id } => {
                resolve_and_move(tracker, issue_id, team_id, resolve_canceled_state).await
            }
            Effect::MarkDuplicate { issue_id, team_id } => {
                resolve_and_move(tracker, issue_id, team_id, resolve_duplicate_state).await
            }
            Effect::SaveConfig { config, path } => {
                // save takes a blocking file lock
                let result = tokio::task::spawn_blocking(move || config.save(&path))
                    .await
                    .map_err(anyhow::Error::from)
                    .and_then(|saved| saved);
                Message::ConfigSaved(err_string(result))
            }
            Effect::OpenBrowser(url) => {
                if let Err(e) = crate::util::open_url(&url) {
                    tracing::warn!("Failed to open {}: {}", url, e);
                }
                Message::None
            }
        }
    }
}

/// Find the target state with `resolve` and move the issue there.
///
/// No matching state completes successfully with no state id.
async fn resolve_and_move(
    tracker: Arc<dyn Tracker>,
    issue_id: String,
    team_id: String,
    resolve: fn(&[State]) -> Option<&State>,
) -> Message {
    let states = match tracker.team_states(&team_id).await {
        Ok(states) => states,
        Err(e) => {
            return Message::StateUpdated(IssueUpdate::completed(
                issue_id,
                None,
                Err(format!("{e:#}")),
            ))
        }
    };

    let Some(state_id) = resolve(&states).map(|s| s.id.clone()) else {
        tracing::info!("No matching state on team {}, leaving {} as is", team_id, issue_id);
        return Message::StateUpdated(IssueUpdate::completed(issue_id, None, Ok(())));
    };

    let result = err_string(tracker.update_state(&issue_id, &state_id).await);
    Message::StateUpdated(IssueUpdate::completed(issue_id, Some(state_id), result))
}

/// Spawns effects onto the runtime and funnels their messages into one queue.
#[derive(Clone)]
pub struct Scheduler {
    tx: mpsc::Sender<Message>,
}

impl Scheduler {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }

    pub fn spawn(&self, effect: Effect, tracker: Arc<dyn Tracker>) {
        tracing::debug!("Running effect {}", effect_name(&effect));
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let message = effect.run(tracker).await;
            if message != Message::None {
                send_or_log(&tx, message, "effect result").await;
            }
        });
    }
}

fn effect_name(effect: &Effect) -> &'static str {
    match effect {
        Effect::LoadViewer => "load_viewer",
        Effect::LoadStates { .. } => "load_states",
        Effect::LoadMyIssues { .. } => "load_my_issues",
        Effect::LoadAllIssues { .. } => "load_all_issues",
        Effect::CreateComment { .. } => "create_comment",
        Effect::UpdateTitle { .. } => "update_title",
        Effect::UpdatePriority { .. } => "update_priority",
        Effect::UpdateState { .. } => "update_state",
        Effect::CancelIssue { .. } => "cancel_issue",
        Effect::MarkDuplicate { .. } => "mark_duplicate",
        Effect::SaveConfig { .. } => "save_config",
        Effect::OpenBrowser(_) => "open_browser",
    }
}
