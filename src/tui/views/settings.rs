use super::step;
use crate::config::Workspace;
use crate::tui::message::{Message, SettingsAction};

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    workspace: Option<Workspace>,
    config_path: String,
    providers: Vec<String>,
    current: String,
    cursor: usize,
    editing: bool,
    saved: bool,
    error: Option<String>,
}

impl SettingsView {
    pub fn new(
        workspace: Option<Workspace>,
        config_path: String,
        mut providers: Vec<String>,
        current: &str,
    ) -> Self {
        providers.sort();
        let mut view = Self {
            workspace,
            config_path,
            providers,
            current: current.to_string(),
            cursor: 0,
            editing: false,
            saved: false,
            error: None,
        };
        view.reset_cursor();
        view
    }

    fn reset_cursor(&mut self) {
        self.cursor = self
            .providers
            .iter()
            .position(|p| *p == self.current)
            .unwrap_or(0);
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn saved(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.saved = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
    }

    pub fn apply(&mut self, action: SettingsAction) -> Option<Message> {
        if !self.editing {
            match action {
                SettingsAction::Back => return Some(Message::SwitchToList),
                SettingsAction::EditProvider => {
                    self.editing = true;
                    self.saved = false;
                }
                _ => {}
            }
            return None;
        }

        match action {
            SettingsAction::Up => self.cursor = step(self.cursor, self.providers.len(), false),
            SettingsAction::Down => self.cursor = step(self.cursor, self.providers.len(), true),
            SettingsAction::Confirm => {
                self.editing = false;
                if let Some(provider) = self.providers.get(self.cursor) {
                    self.current = provider.clone();
                    return Some(Message::ProviderSelected(provider.clone()));
                }
            }
            SettingsAction::Cancel => {
                self.reset_cursor();
                self.editing = false;
            }
            SettingsAction::Back | SettingsAction::EditProvider => {}
        }
        None
    }
}
