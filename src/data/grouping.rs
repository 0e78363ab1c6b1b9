//! Bucketing, filtering and branch correlation over issue collections.

use super::Issue;
use std::collections::HashMap;

/// Partition issues by workflow state id.
///
/// Within each bucket issues are ordered by priority (unset last). The sort is
/// stable, so issues of equal priority keep their input order.
pub fn group_by_state<'a, I>(issues: I) -> HashMap<String, Vec<&'a Issue>>
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut buckets: HashMap<String, Vec<&'a Issue>> = HashMap::new();
    for issue in issues {
        buckets.entry(issue.state.id.clone()).or_default().push(issue);
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by_key(|issue| issue.priority.sort_key());
    }
    buckets
}

/// Case-insensitive substring match against title, identifier and description.
///
/// `query` must already be lowercased.
pub fn matches_filter(issue: &Issue, query: &str) -> bool {
    query.is_empty()
        || issue.title.to_lowercase().contains(query)
        || issue.identifier.to_lowercase().contains(query)
        || issue.description.to_lowercase().contains(query)
}

/// Filter a bucket, preserving its order. An empty query returns the bucket unchanged.
pub fn filter_issues<'a>(bucket: &[&'a Issue], query: &str) -> Vec<&'a Issue> {
    let query = query.to_lowercase();
    bucket
        .iter()
        .copied()
        .filter(|issue| matches_filter(issue, &query))
        .collect()
}

/// Find the issue the given branch is about.
///
/// First match in scan order wins: an issue whose identifier appears in the
/// branch name (ignoring case, since generated branch names are lowercase), or
/// whose stored branch name equals it exactly.
pub fn find_branch_issue<'a, I>(branch: &str, issues: I) -> Option<&'a Issue>
where
    I: IntoIterator<Item = &'a Issue>,
{
    if branch.is_empty() {
        return None;
    }
    let lowered = branch.to_lowercase();
    issues.into_iter().find(|issue| {
        (!issue.identifier.is_empty() && lowered.contains(&issue.identifier.to_lowercase()))
            || issue.branch_name.as_deref() == Some(branch)
    })
}
