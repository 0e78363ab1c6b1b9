use crate::data::Issue;
use crate::tui::message::{DetailAction, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailButton {
    OpenInBrowser,
    #[default]
    StartWorking,
}

impl DetailButton {
    pub fn label(&self) -> &'static str {
        match self {
            DetailButton::OpenInBrowser => "Open in Browser",
            DetailButton::StartWorking => "Start Working",
        }
    }

    fn toggled(self) -> Self {
        match self {
            DetailButton::OpenInBrowser => DetailButton::StartWorking,
            DetailButton::StartWorking => DetailButton::OpenInBrowser,
        }
    }
}

/// One issue with two action buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    issue: Issue,
    focus: DetailButton,
}

impl DetailView {
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            focus: DetailButton::default(),
        }
    }

    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    pub fn focus(&self) -> DetailButton {
        self.focus
    }

    pub fn apply(&mut self, action: DetailAction) -> Option<Message> {
        match action {
            DetailAction::Back => return Some(Message::SwitchToList),
            DetailAction::OpenInBrowser => return Some(Message::OpenBrowser(self.issue.url.clone())),
            DetailAction::FocusLeft => self.focus = DetailButton::OpenInBrowser,
            DetailAction::FocusRight => self.focus = DetailButton::StartWorking,
            DetailAction::ToggleFocus => self.focus = self.focus.toggled(),
            DetailAction::Activate => {
                return Some(match self.focus {
                    DetailButton::OpenInBrowser => Message::OpenBrowser(self.issue.url.clone()),
                    DetailButton::StartWorking => {
                        Message::SwitchToStartWork(Box::new(self.issue.clone()))
                    }
                })
            }
            DetailAction::NextIssue => return Some(Message::NextIssue),
            DetailAction::PrevIssue => return Some(Message::PrevIssue),
        }
        None
    }
}
