use super::step;
use crate::data::Team;
use crate::tui::message::{Message, PickerAction};

/// Team picker shown while the viewer loads and when no default team applies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamSelectView {
    teams: Vec<Team>,
    cursor: usize,
    set_as_default: bool,
    loading: bool,
    error: Option<String>,
}

impl TeamSelectView {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn set_teams(&mut self, teams: Vec<Team>) {
        self.teams = teams;
        self.cursor = 0;
        self.loading = false;
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
        self.loading = false;
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_as_default(&self) -> bool {
        self.set_as_default
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Keys are ignored while loading. With an error shown only `esc` works.
    pub fn apply(&mut self, action: PickerAction) -> Option<Message> {
        if self.loading {
            return None;
        }
        if self.error.is_some() {
            return (action == PickerAction::Back).then_some(Message::SwitchToWorkspaceSelect);
        }
        match action {
            PickerAction::Up => self.cursor = step(self.cursor, self.teams.len(), false),
            PickerAction::Down => self.cursor = step(self.cursor, self.teams.len(), true),
            PickerAction::ToggleDefault => self.set_as_default = !self.set_as_default,
            PickerAction::Select => {
                return self.teams.get(self.cursor).map(|team| Message::TeamSelected {
                    team: team.clone(),
                    set_as_default: self.set_as_default,
                })
            }
            PickerAction::Back => return Some(Message::SwitchToWorkspaceSelect),
        }
        None
    }
}
