//! Tracker and git preparation run after the TUI exits and before the agent starts.

use crate::data::{order_states, resolve_in_progress_state, Issue, IssueContext};
use crate::integrations::git::{Checkout, Vcs};
use crate::integrations::Tracker;
use anyhow::Result;
use std::io::Write;

/// What the session asked for when it ended on "start work".
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub issue: Issue,
    pub comment: String,
    pub use_branch: bool,
    pub plan_mode: bool,
    pub checkout_only: bool,
    /// The session already tried to post `comment`; do not post it again.
    pub comment_synced: bool,
}

/// Issue and organization details to launch the agent with.
#[derive(Debug, Clone, PartialEq)]
pub struct Handoff {
    pub issue: Issue,
    pub context: Option<IssueContext>,
}

/// Run the hand-off steps, reporting progress to `out`.
///
/// Remote and git failures are reported and skipped. Only writing to `out` can
/// fail. Returns `None` for checkout-only requests, which never launch an agent.
pub async fn prepare(
    tracker: &dyn Tracker,
    vcs: &dyn Vcs,
    request: &LaunchRequest,
    out: &mut impl Write,
) -> Result<Option<Handoff>> {
    let issue = &request.issue;

    if request.checkout_only {
        match issue.branch_name.as_deref().filter(|b| !b.is_empty()) {
            Some(branch) => checkout(vcs, branch, out)?,
            None => writeln!(out, "No branch name available for this issue")?,
        }
        return Ok(None);
    }

    write!(out, "Fetching issue context...")?;
    let full_issue = match tracker.issue_with_context(&issue.id).await {
        Ok(full) => {
            writeln!(out, " done")?;
            full
        }
        Err(e) => {
            writeln!(out, " failed: {e}")?;
            tracing::warn!("Failed to fetch context for {}: {:#}", issue.identifier, e);
            issue.clone()
        }
    };

    let context = match tracker.organization().await {
        Ok(org) => Some(IssueContext::from(org)),
        Err(e) => {
            tracing::debug!("Proceeding without organization context: {:#}", e);
            None
        }
    };

    write!(out, "Moving issue to In Progress...")?;
    match tracker.team_states(&issue.team.id).await {
        Err(e) => writeln!(out, " failed: {e}")?,
        Ok(states) => {
            let states = order_states(states);
            match resolve_in_progress_state(&states) {
                None => writeln!(out, " skipped (no In Progress state found)")?,
                Some(state) => match tracker.update_state(&issue.id, &state.id).await {
                    Ok(()) => writeln!(out, " done")?,
                    Err(e) => writeln!(out, " failed: {e}")?,
                },
            }
        }
    }

    if !request.comment.trim().is_empty() && !request.comment_synced {
        write!(out, "Adding comment to issue...")?;
        match tracker.create_comment(&issue.id, &request.comment).await {
            Ok(()) => writeln!(out, " done")?,
            Err(e) => writeln!(out, " failed: {e}")?,
        }
    }

    if request.use_branch {
        if let Some(branch) = issue.branch_name.as_deref().filter(|b| !b.is_empty()) {
            checkout(vcs, branch, out)?;
        }
    }

    writeln!(out)?;
    Ok(Some(Handoff {
        issue: full_issue,
        context,
    }))
}

fn checkout(vcs: &dyn Vcs, branch: &str, out: &mut impl Write) -> Result<()> {
    write!(out, "Checking out branch {branch}...")?;
    match vcs.checkout(branch) {
        Ok(Checkout::Existing) => writeln!(out, " done")?,
        Ok(Checkout::FromRemote) => writeln!(out, " done (tracking origin/{branch})")?,
        Ok(Checkout::Created) => writeln!(out, " done (new branch)")?,
        Err(e) => {
            tracing::warn!("Checkout of {} failed: {:#}", branch, e);
            writeln!(out, " failed: {e}")?
        }
    }
    Ok(())
}
