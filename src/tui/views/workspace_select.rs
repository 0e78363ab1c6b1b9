use super::step;
use crate::config::{Workspace, WorkspaceChoice};
use crate::tui::message::{Message, PickerAction};

/// Configured workspaces followed by an "add new" entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceSelectView {
    workspaces: Vec<Workspace>,
    cursor: usize,
}

impl WorkspaceSelectView {
    pub const ADD_NEW_LABEL: &'static str = "+ Add new workspace";

    /// Starts on `current` when it is among `workspaces`.
    pub fn new(workspaces: Vec<Workspace>, current: Option<&str>) -> Self {
        let cursor = current
            .and_then(|id| workspaces.iter().position(|w| w.id == id))
            .unwrap_or(0);
        Self { workspaces, cursor }
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn entries(&self) -> usize {
        self.workspaces.len() + 1
    }

    pub fn apply(&mut self, action: PickerAction) -> Option<Message> {
        match action {
            PickerAction::Up => self.cursor = step(self.cursor, self.entries(), false),
            PickerAction::Down => self.cursor = step(self.cursor, self.entries(), true),
            PickerAction::Select => {
                let choice = match self.workspaces.get(self.cursor) {
                    Some(workspace) => WorkspaceChoice::Existing(workspace.clone()),
                    None => WorkspaceChoice::AddNew,
                };
                return Some(Message::WorkspaceSelected(choice));
            }
            PickerAction::ToggleDefault | PickerAction::Back => {}
        }
        None
    }
}
