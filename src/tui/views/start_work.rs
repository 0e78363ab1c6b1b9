use super::TextInput;
use crate::agent::LaunchRequest;
use crate::data::Issue;
use crate::tui::message::{Message, StartWorkAction};

/// Focusable elements, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartFocus {
    #[default]
    Comment,
    UseBranch,
    PlanMode,
    Start,
    CheckoutOnly,
}

impl StartFocus {
    const ORDER: [StartFocus; 5] = [
        StartFocus::Comment,
        StartFocus::UseBranch,
        StartFocus::PlanMode,
        StartFocus::Start,
        StartFocus::CheckoutOnly,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Comment and launch options for starting work on one issue.
#[derive(Debug, Clone, PartialEq)]
pub struct StartWorkView {
    issue: Issue,
    comment: TextInput,
    use_branch: bool,
    plan_mode: bool,
    focus: StartFocus,
    /// Waiting for the comment to be posted before the session ends
    sending: bool,
}

impl StartWorkView {
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            comment: TextInput::with_limit(500),
            use_branch: true,
            plan_mode: true,
            focus: StartFocus::default(),
            sending: false,
        }
    }

    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    pub fn comment(&self) -> &TextInput {
        &self.comment
    }

    pub fn use_branch(&self) -> bool {
        self.use_branch
    }

    pub fn plan_mode(&self) -> bool {
        self.plan_mode
    }

    pub fn focus(&self) -> StartFocus {
        self.focus
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn set_sending(&mut self) {
        self.sending = true;
    }

    fn request(&self, checkout_only: bool) -> LaunchRequest {
        LaunchRequest {
            issue: self.issue.clone(),
            comment: self.comment.value().to_string(),
            use_branch: checkout_only || self.use_branch,
            plan_mode: !checkout_only && self.plan_mode,
            checkout_only,
            comment_synced: false,
        }
    }

    pub fn apply(&mut self, action: StartWorkAction) -> Option<Message> {
        if self.sending {
            return None;
        }
        match action {
            StartWorkAction::NextFocus => self.focus = self.focus.next(),
            StartWorkAction::PrevFocus => self.focus = self.focus.prev(),
            StartWorkAction::Edit(edit) => {
                if self.focus == StartFocus::Comment {
                    self.comment.apply(edit);
                }
            }
            StartWorkAction::Activate => match self.focus {
                StartFocus::Comment => self.focus = self.focus.next(),
                StartFocus::UseBranch => self.use_branch = !self.use_branch,
                StartFocus::PlanMode => self.plan_mode = !self.plan_mode,
                StartFocus::Start => return Some(Message::Launch(self.request(false))),
                StartFocus::CheckoutOnly => return Some(Message::Launch(self.request(true))),
            },
            StartWorkAction::Back => {
                return Some(Message::SwitchToDetail(Box::new(self.issue.clone())))
            }
        }
        None
    }
}
