//! Builds the context prompt handed to a coding agent.

use crate::data::{Attachment, Issue, IssueContext};
use chrono::DateTime;
use std::fmt::Write;

/// Render the agent prompt for an issue.
///
/// The output is deterministic for a given input; the closing line always
/// carries a `Fixes <identifier>` commit hint.
pub fn build_prompt(issue: &Issue, comment: &str, context: Option<&IssueContext>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_prompt(&mut out, issue, comment, context);
    out
}

fn write_prompt(
    out: &mut String,
    issue: &Issue,
    comment: &str,
    context: Option<&IssueContext>,
) -> std::fmt::Result {
    writeln!(out, "I'm starting work on Linear ticket {}.\n", issue.identifier)?;
    writeln!(out, "## {}: {}\n", issue.identifier, issue.title)?;

    if !issue.description.is_empty() {
        writeln!(out, "### Description\n{}\n", issue.description)?;
    }

    out.push_str("### Metadata\n");
    writeln!(out, "- **Status**: {} (moved to In Progress)", issue.state.name)?;
    writeln!(out, "- **Team**: {}", issue.team.name)?;
    if let Some(assignee) = &issue.assignee {
        writeln!(out, "- **Assignee**: {}", assignee.name)?;
    }
    if !issue.labels.is_empty() {
        let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        writeln!(out, "- **Labels**: {}", labels.join(", "))?;
    }
    if let Some(branch) = issue.branch_name.as_deref().filter(|b| !b.is_empty()) {
        writeln!(out, "- **Suggested branch**: `{branch}`")?;
    }
    writeln!(out, "- **Linear URL**: {}", issue.url)?;

    let (slack, other): (Vec<&Attachment>, Vec<&Attachment>) = issue
        .attachments
        .iter()
        .partition(|a| a.source_type.eq_ignore_ascii_case("slack"));

    if !slack.is_empty() {
        out.push_str("\n### Slack Conversations\n");
        for att in slack {
            writeln!(out, "**{}**", att.title)?;
            if let Some(content) = slack_content(att) {
                writeln!(out, "> {content}")?;
            }
            if !att.subtitle.is_empty() {
                writeln!(out, "_{}_", att.subtitle)?;
            }
            writeln!(out, "- [View in Slack]({})\n", att.url)?;
        }
    }

    if !other.is_empty() {
        out.push_str("\n### Attachments\n");
        for att in other {
            let source = if att.source_type.is_empty() {
                "link"
            } else {
                att.source_type.as_str()
            };
            writeln!(out, "- [{}]({}) ({})", att.title, att.url, source)?;
        }
        out.push('\n');
    }

    if !issue.comments.is_empty() {
        out.push_str("\n### Discussion Thread\n");
        writeln!(out, "*{} comment(s) on this issue:*\n", issue.comments.len())?;
        for c in &issue.comments {
            writeln!(out, "**{}** ({}):", c.user.name, comment_date(&c.created_at))?;
            for line in c.body.split('\n') {
                writeln!(out, "> {line}")?;
            }
            out.push('\n');
        }
    }

    if !comment.is_empty() {
        writeln!(out, "\n### My Notes\n{comment}")?;
    }

    out.push_str("\n### Linear API Context\n");
    out.push_str("If you have access to the Linear MCP server, you can use these identifiers:\n");
    writeln!(out, "- **Issue ID (UUID)**: `{}`", issue.id)?;
    writeln!(out, "- **Issue Identifier**: `{}`", issue.identifier)?;
    writeln!(out, "- **Team ID**: `{}`", issue.team.id)?;
    writeln!(out, "- **Team Key**: `{}`", issue.team.key)?;
    if let Some(ctx) = context {
        writeln!(out, "- **Organization ID**: `{}`", ctx.organization_id)?;
        writeln!(out, "- **Organization Name**: {}", ctx.organization_name)?;
    }
    out.push_str(
        "\nWith Linear MCP, you can: update issue status, add comments, create sub-issues, query related issues, and more.\n",
    );

    out.push_str("\n---\n");
    out.push_str("Please help me implement this ticket. Start by understanding the requirements and exploring the codebase if needed.\n\n");
    write!(
        out,
        "**Important**: When you make the commit that resolves this issue, include `Fixes {}` in the commit message so Linear automatically marks it as done.",
        issue.identifier
    )
}

/// First non-empty string among the `text`, `message` and `content` metadata fields.
fn slack_content(att: &Attachment) -> Option<&str> {
    ["text", "message", "content"]
        .iter()
        .filter_map(|key| att.metadata.get(*key).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty())
}

/// Reduce an RFC 3339 timestamp to its calendar date; anything else passes through.
fn comment_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
