//! Per-view state. Each view turns its actions into follow-up messages.

pub mod detail;
pub mod list;
pub mod settings;
pub mod start_work;
pub mod team_select;
pub mod workspace_select;

pub use detail::{DetailButton, DetailView};
pub use list::{EditMode, ListView};
pub use settings::SettingsView;
pub use start_work::{StartFocus, StartWorkView};
pub use team_select::TeamSelectView;
pub use workspace_select::WorkspaceSelectView;

use super::message::TextEdit;

/// Single-line text field with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars, `0..=len`
    cursor: usize,
    limit: Option<usize>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Replace the text and put the cursor at the end.
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Apply an edit. Returns true if the text changed.
    pub fn apply(&mut self, edit: TextEdit) -> bool {
        let len = self.value.chars().count();
        match edit {
            TextEdit::Insert(c) => {
                if self.limit.is_some_and(|limit| len >= limit) {
                    return false;
                }
                let at = self.byte_offset(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            TextEdit::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let at = self.byte_offset(self.cursor - 1);
                self.value.remove(at);
                self.cursor -= 1;
                true
            }
            TextEdit::Delete => {
                if self.cursor >= len {
                    return false;
                }
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
                true
            }
            TextEdit::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            TextEdit::Right => {
                self.cursor = (self.cursor + 1).min(len);
                false
            }
            TextEdit::Home => {
                self.cursor = 0;
                false
            }
            TextEdit::End => {
                self.cursor = len;
                false
            }
        }
    }
}

/// Move a list cursor one step, staying inside `0..len`.
pub(crate) fn step(cursor: usize, len: usize, down: bool) -> usize {
    if down {
        if cursor + 1 < len {
            cursor + 1
        } else {
            cursor
        }
    } else {
        cursor.saturating_sub(1)
    }
}
