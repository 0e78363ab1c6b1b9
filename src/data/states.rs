//! Workflow state ordering and name/type resolution rules.

use super::{State, StateType};

/// Order states for display: active band, then completed, then canceled.
///
/// Each band is sorted by position. The sort is stable, so states sharing a
/// position keep the order the tracker returned them in.
pub fn order_states(states: Vec<State>) -> Vec<State> {
    let (mut active, mut completed, mut canceled) = (Vec::new(), Vec::new(), Vec::new());
    for state in states {
        match state.state_type {
            StateType::Canceled => canceled.push(state),
            StateType::Completed => completed.push(state),
            _ => active.push(state),
        }
    }

    for band in [&mut active, &mut completed, &mut canceled] {
        band.sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    active.extend(completed);
    active.extend(canceled);
    active
}

/// The state an issue moves to when work starts on it.
pub fn resolve_in_progress_state(states: &[State]) -> Option<&State> {
    states
        .iter()
        .find(|s| s.state_type == StateType::Started)
        .or_else(|| states.iter().find(|s| s.name == "In Progress"))
}

/// Prefer a canceled-type state literally named "Canceled", else any canceled-type state.
pub fn resolve_canceled_state(states: &[State]) -> Option<&State> {
    states
        .iter()
        .find(|s| s.state_type == StateType::Canceled && s.name == "Canceled")
        .or_else(|| states.iter().find(|s| s.state_type == StateType::Canceled))
}

/// A state literally named "Duplicate", falling back to the cancel rule.
pub fn resolve_duplicate_state(states: &[State]) -> Option<&State> {
    states
        .iter()
        .find(|s| s.name == "Duplicate")
        .or_else(|| resolve_canceled_state(states))
}
