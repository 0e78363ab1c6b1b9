//! Input dispatch layer for Elm Architecture (TEA) pattern.
//!
//! Maps key events to messages based on the active view and its sub-mode.

use super::app::{App, ViewState};
use super::message::{
    DetailAction, ListAction, Message, PickerAction, SettingsAction, StartWorkAction, TextEdit,
};
use super::views::{EditMode, ListView, SettingsView, StartFocus, StartWorkView};
use crate::data::Priority;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map key events to messages based on the active view.
pub fn dispatch(app: &App, key: KeyEvent) -> Message {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Message::Quit;
    }

    let view = app.view();
    if key.code == KeyCode::Char('q') && !captures_quit(app, view) {
        return Message::Quit;
    }

    match view {
        ViewState::List => dispatch_list(app.list(), key),
        ViewState::Detail(_) => dispatch_detail(key),
        ViewState::StartWork(start) => dispatch_start_work(start, key),
        ViewState::TeamSelect(_) => dispatch_team_select(key),
        ViewState::WorkspaceSelect(_) => dispatch_workspace_select(key),
        ViewState::Settings(settings) => dispatch_settings(settings, key),
    }
}

/// Views where `q` is input rather than quit.
fn captures_quit(app: &App, view: &ViewState) -> bool {
    match view {
        ViewState::StartWork(_) | ViewState::Settings(_) => true,
        ViewState::List => app.list().captures_text(),
        _ => false,
    }
}

/// Map a key to a text field edit, if it is one.
pub fn text_edit(key: KeyEvent) -> Option<TextEdit> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TextEdit::Insert(c))
        }
        KeyCode::Backspace => Some(TextEdit::Backspace),
        KeyCode::Delete => Some(TextEdit::Delete),
        KeyCode::Left => Some(TextEdit::Left),
        KeyCode::Right => Some(TextEdit::Right),
        KeyCode::Home => Some(TextEdit::Home),
        KeyCode::End => Some(TextEdit::End),
        _ => None,
    }
}

fn list(action: ListAction) -> Message {
    Message::List(action)
}

/// Dispatch keys in the issue list, by sub-mode.
pub fn dispatch_list(view: &ListView, key: KeyEvent) -> Message {
    match view.edit() {
        EditMode::Rename { .. } => match key.code {
            KeyCode::Enter => list(ListAction::EditConfirm),
            KeyCode::Esc => list(ListAction::EditCancel),
            _ => text_edit(key).map_or(Message::None, |e| list(ListAction::EditText(e))),
        },
        EditMode::Priority { .. } => match key.code {
            KeyCode::Char(c @ '0'..='4') => {
                let value = c.to_digit(10).map_or(0, i64::from);
                list(ListAction::QuickPriority(Priority::from_int(value)))
            }
            _ => dispatch_picker_edit(key),
        },
        EditMode::Status { .. } => dispatch_picker_edit(key),
        EditMode::None if view.is_filtering() => match key.code {
            KeyCode::Enter | KeyCode::Esc => list(ListAction::EndFilter),
            _ => text_edit(key).map_or(Message::None, |e| list(ListAction::Filter(e))),
        },
        EditMode::None => dispatch_list_normal(view, key),
    }
}

fn dispatch_picker_edit(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => list(ListAction::EditDown),
        KeyCode::Char('k') | KeyCode::Up => list(ListAction::EditUp),
        KeyCode::Enter => list(ListAction::EditConfirm),
        KeyCode::Esc => list(ListAction::EditCancel),
        _ => Message::None,
    }
}

fn dispatch_list_normal(view: &ListView, key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => list(ListAction::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => list(ListAction::MoveUp),
        KeyCode::Char('h') | KeyCode::Left => list(ListAction::PrevTab),
        KeyCode::Char('l') | KeyCode::Right => list(ListAction::NextTab),
        KeyCode::Char('/') => list(ListAction::StartFilter),
        KeyCode::Char('a') => list(ListAction::ToggleScope),
        KeyCode::Char('R') => list(ListAction::StartRename),
        KeyCode::Char('p') => list(ListAction::StartPriority),
        KeyCode::Char('s') => list(ListAction::StartStatus),
        KeyCode::Char(',') => list(ListAction::OpenSettings),
        KeyCode::Enter => list(ListAction::OpenDetail),
        KeyCode::Esc if !view.filter().is_empty() => list(ListAction::ClearFilter),
        KeyCode::Esc => Message::SwitchToTeamSelect,
        _ => Message::None,
    }
}

pub fn dispatch_detail(key: KeyEvent) -> Message {
    let action = match key.code {
        KeyCode::Esc => DetailAction::Back,
        KeyCode::Char('o') => DetailAction::OpenInBrowser,
        KeyCode::Char('h') | KeyCode::Left => DetailAction::FocusLeft,
        KeyCode::Char('l') | KeyCode::Right => DetailAction::FocusRight,
        KeyCode::Tab => DetailAction::ToggleFocus,
        KeyCode::Char('s') | KeyCode::Enter => DetailAction::Activate,
        KeyCode::Char('j') | KeyCode::Down => DetailAction::NextIssue,
        KeyCode::Char('k') | KeyCode::Up => DetailAction::PrevIssue,
        _ => return Message::None,
    };
    Message::Detail(action)
}

pub fn dispatch_start_work(view: &StartWorkView, key: KeyEvent) -> Message {
    let action = if view.focus() == StartFocus::Comment {
        match key.code {
            KeyCode::Tab | KeyCode::Down => StartWorkAction::NextFocus,
            KeyCode::BackTab => StartWorkAction::PrevFocus,
            KeyCode::Enter => StartWorkAction::Activate,
            KeyCode::Esc => StartWorkAction::Back,
            _ => match text_edit(key) {
                Some(edit) => StartWorkAction::Edit(edit),
                None => return Message::None,
            },
        }
    } else {
        match key.code {
            KeyCode::Tab | KeyCode::Down => StartWorkAction::NextFocus,
            KeyCode::BackTab | KeyCode::Up => StartWorkAction::PrevFocus,
            KeyCode::Enter | KeyCode::Char(' ') => StartWorkAction::Activate,
            KeyCode::Esc => StartWorkAction::Back,
            _ => return Message::None,
        }
    };
    Message::StartWork(action)
}

pub fn dispatch_team_select(key: KeyEvent) -> Message {
    let action = match key.code {
        KeyCode::Char('j') | KeyCode::Down => PickerAction::Down,
        KeyCode::Char('k') | KeyCode::Up => PickerAction::Up,
        KeyCode::Char('d') => PickerAction::ToggleDefault,
        KeyCode::Enter => PickerAction::Select,
        KeyCode::Esc => PickerAction::Back,
        _ => return Message::None,
    };
    Message::TeamSelect(action)
}

pub fn dispatch_workspace_select(key: KeyEvent) -> Message {
    let action = match key.code {
        KeyCode::Char('j') | KeyCode::Down => PickerAction::Down,
        KeyCode::Char('k') | KeyCode::Up => PickerAction::Up,
        KeyCode::Enter => PickerAction::Select,
        _ => return Message::None,
    };
    Message::WorkspaceSelect(action)
}

pub fn dispatch_settings(view: &SettingsView, key: KeyEvent) -> Message {
    let action = if view.is_editing() {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => SettingsAction::Down,
            KeyCode::Char('k') | KeyCode::Up => SettingsAction::Up,
            KeyCode::Enter => SettingsAction::Confirm,
            KeyCode::Esc => SettingsAction::Cancel,
            _ => return Message::None,
        }
    } else {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => SettingsAction::Back,
            KeyCode::Char('p') => SettingsAction::EditProvider,
            _ => return Message::None,
        }
    };
    Message::Settings(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Issue, Priority, State, StateType, Team};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn key_event_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn state() -> State {
        State {
            id: "s-todo".to_string(),
            name: "Todo".to_string(),
            color: "#e2e2e2".to_string(),
            state_type: StateType::Unstarted,
            position: 0.0,
        }
    }

    fn issue() -> Issue {
        Issue {
            id: "i-1".to_string(),
            identifier: "ENG-1".to_string(),
            title: "Fix login".to_string(),
            description: String::new(),
            priority: Priority::High,
            estimate: None,
            branch_name: None,
            url: "https://linear.app/acme/issue/ENG-1".to_string(),
            created_at: None,
            state: state(),
            assignee: None,
            labels: vec![],
            cycle: None,
            team: Team {
                id: "t-1".to_string(),
                name: "Engineering".to_string(),
                key: "ENG".to_string(),
            },
            comments: vec![],
            attachments: vec![],
        }
    }

    fn loaded_list() -> ListView {
        let mut view = ListView::new("0.1.0", "~/code", None);
        view.set_states(Ok(vec![state()]));
        view.set_issues(crate::data::Scope::Mine, Ok(vec![issue()]));
        view
    }

    #[test]
    fn test_text_edit_ignores_control_chords() {
        assert_eq!(
            text_edit(key_event(KeyCode::Char('x'))),
            Some(TextEdit::Insert('x'))
        );
        assert_eq!(text_edit(key_event_ctrl(KeyCode::Char('x'))), None);
        assert_eq!(text_edit(key_event(KeyCode::Tab)), None);
    }

    #[test]
    fn test_list_normal_mode_keys() {
        let view = loaded_list();
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Char('j'))),
            Message::List(ListAction::MoveDown)
        );
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Char('R'))),
            Message::List(ListAction::StartRename)
        );
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Char('a'))),
            Message::List(ListAction::ToggleScope)
        );
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Esc)),
            Message::SwitchToTeamSelect
        );
    }

    #[test]
    fn test_list_esc_clears_filter_first() {
        let mut view = loaded_list();
        view.apply(ListAction::StartFilter);
        view.apply(ListAction::Filter(TextEdit::Insert('x')));
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Esc)),
            Message::List(ListAction::EndFilter)
        );
        view.apply(ListAction::EndFilter);
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Esc)),
            Message::List(ListAction::ClearFilter)
        );
    }

    #[test]
    fn test_priority_digits_confirm_immediately() {
        let mut view = loaded_list();
        view.apply(ListAction::StartPriority);
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Char('1'))),
            Message::List(ListAction::QuickPriority(Priority::Urgent))
        );
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Char('0'))),
            Message::List(ListAction::QuickPriority(Priority::NoPriority))
        );
        assert_eq!(dispatch_list(&view, key_event(KeyCode::Char('5'))), Message::None);
    }

    #[test]
    fn test_rename_captures_letters() {
        let mut view = loaded_list();
        view.apply(ListAction::StartRename);
        assert_eq!(
            dispatch_list(&view, key_event(KeyCode::Char('q'))),
            Message::List(ListAction::EditText(TextEdit::Insert('q')))
        );
    }

    #[test]
    fn test_detail_keys() {
        assert_eq!(
            dispatch_detail(key_event(KeyCode::Char('o'))),
            Message::Detail(DetailAction::OpenInBrowser)
        );
        assert_eq!(
            dispatch_detail(key_event(KeyCode::Tab)),
            Message::Detail(DetailAction::ToggleFocus)
        );
        assert_eq!(
            dispatch_detail(key_event(KeyCode::Esc)),
            Message::Detail(DetailAction::Back)
        );
    }

    #[test]
    fn test_start_work_comment_field_takes_text() {
        let view = StartWorkView::new(issue());
        assert_eq!(
            dispatch_start_work(&view, key_event(KeyCode::Char(' '))),
            Message::StartWork(StartWorkAction::Edit(TextEdit::Insert(' ')))
        );
        assert_eq!(
            dispatch_start_work(&view, key_event(KeyCode::Down)),
            Message::StartWork(StartWorkAction::NextFocus)
        );
    }

    #[test]
    fn test_start_work_space_toggles_off_comment() {
        let mut view = StartWorkView::new(issue());
        view.apply(StartWorkAction::NextFocus);
        assert_eq!(
            dispatch_start_work(&view, key_event(KeyCode::Char(' '))),
            Message::StartWork(StartWorkAction::Activate)
        );
    }

    #[test]
    fn test_settings_q_goes_back() {
        let view = SettingsView::new(None, String::new(), vec!["claude".to_string()], "claude");
        assert_eq!(
            dispatch_settings(&view, key_event(KeyCode::Char('q'))),
            Message::Settings(SettingsAction::Back)
        );
    }
}
