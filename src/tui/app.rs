//! Session controller: owns the active view and turns messages into effects.

use super::effect::Effect;
use super::message::{IssueUpdate, Message, Phase};
use super::views::{
    DetailView, ListView, SettingsView, StartWorkView, TeamSelectView, WorkspaceSelectView,
};
use crate::agent::LaunchRequest;
use crate::config::{Config, Workspace, WorkspaceChoice};
use crate::data::{Scope, Team, Viewer};
use crate::integrations::Tracker;
use crate::util::shorten_home;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

/// Braille spinner frames for loading animation
pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Builds a tracker client for a workspace.
pub type Connector = Box<dyn Fn(&Workspace) -> Arc<dyn Tracker> + Send>;

/// The active view. The list view itself lives on [`App`] so it survives
/// trips to the detail and settings views.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    WorkspaceSelect(WorkspaceSelectView),
    TeamSelect(TeamSelectView),
    List,
    Detail(DetailView),
    StartWork(StartWorkView),
    Settings(SettingsView),
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Quit,
    Launch(LaunchRequest),
    /// Run the add-workspace wizard and start a new session
    AddWorkspace,
}

/// Everything a session starts from.
pub struct Session {
    pub config: Config,
    pub config_path: PathBuf,
    pub workspace: Workspace,
    pub working_dir: PathBuf,
    pub branch: Option<String>,
    pub version: String,
    pub providers: Vec<String>,
}

pub struct App {
    view: ViewState,
    list: ListView,
    tracker: Arc<dyn Tracker>,
    connect: Connector,
    config: Config,
    config_path: PathBuf,
    workspace: Workspace,
    teams: Vec<Team>,
    team: Option<Team>,
    providers: Vec<String>,
    version: String,
    working_dir: PathBuf,
    branch: Option<String>,
    /// Launch waiting for its comment to be posted
    pending_launch: Option<LaunchRequest>,
    outcome: Option<Outcome>,
    spinner_frame: usize,
}

impl App {
    pub fn new(session: Session, connect: Connector) -> Self {
        let tracker = connect(&session.workspace);
        let list = ListView::new(
            &session.version,
            &shorten_home(&session.working_dir),
            session.branch.clone(),
        );
        Self {
            view: ViewState::TeamSelect(TeamSelectView::loading()),
            list,
            tracker,
            connect,
            config: session.config,
            config_path: session.config_path,
            workspace: session.workspace,
            teams: Vec::new(),
            team: None,
            providers: session.providers,
            version: session.version,
            working_dir: session.working_dir,
            branch: session.branch,
            pending_launch: None,
            outcome: None,
            spinner_frame: 0,
        }
    }

    /// Effects to run when the session starts.
    pub fn init(&self) -> Vec<Effect> {
        vec![Effect::LoadViewer]
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn tracker(&self) -> Arc<dyn Tracker> {
        Arc::clone(&self.tracker)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn team(&self) -> Option<&Team> {
        self.team.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    pub fn is_loading(&self) -> bool {
        match &self.view {
            ViewState::TeamSelect(view) => view.is_loading(),
            ViewState::List => self.list.is_loading(),
            ViewState::StartWork(view) => view.is_sending(),
            _ => false,
        }
    }

    pub fn spinner(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Advance spinner frame (call on tick while loading)
    pub fn tick_spinner(&mut self) {
        if self.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Process a message and update app state (Elm Architecture update function).
    ///
    /// Follow-up messages produced by views are handled in the same call.
    /// Returns the effects to run.
    pub fn update(&mut self, msg: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            if self.outcome.is_some() {
                break;
            }
            if let Some(next) = self.handle(msg, &mut effects) {
                queue.push_back(next);
            }
        }
        effects
    }

    fn handle(&mut self, msg: Message, effects: &mut Vec<Effect>) -> Option<Message> {
        match msg {
            // ─────────────────────────────────────────────────────────────────
            // App lifecycle
            // ─────────────────────────────────────────────────────────────────
            Message::Quit => self.outcome = Some(Outcome::Quit),

            // ─────────────────────────────────────────────────────────────────
            // View input
            // ─────────────────────────────────────────────────────────────────
            Message::List(action) => {
                if matches!(self.view, ViewState::List) {
                    return self.list.apply(action);
                }
            }
            Message::Detail(action) => {
                if let ViewState::Detail(view) = &mut self.view {
                    return view.apply(action);
                }
            }
            Message::StartWork(action) => {
                if let ViewState::StartWork(view) = &mut self.view {
                    return view.apply(action);
                }
            }
            Message::TeamSelect(action) => {
                if let ViewState::TeamSelect(view) = &mut self.view {
                    return view.apply(action);
                }
            }
            Message::WorkspaceSelect(action) => {
                if let ViewState::WorkspaceSelect(view) = &mut self.view {
                    return view.apply(action);
                }
            }
            Message::Settings(action) => {
                if let ViewState::Settings(view) = &mut self.view {
                    return view.apply(action);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // View switches
            // ─────────────────────────────────────────────────────────────────
            Message::SwitchToList => self.view = ViewState::List,
            Message::SwitchToTeamSelect => {
                let mut view = TeamSelectView::loading();
                view.set_teams(self.teams.clone());
                self.view = ViewState::TeamSelect(view);
            }
            Message::SwitchToWorkspaceSelect => {
                self.view = ViewState::WorkspaceSelect(WorkspaceSelectView::new(
                    self.config.workspaces.clone(),
                    Some(&self.workspace.id),
                ));
            }
            Message::SwitchToSettings => {
                self.view = ViewState::Settings(SettingsView::new(
                    Some(self.workspace.clone()),
                    shorten_home(&self.config_path),
                    self.providers.clone(),
                    self.config.provider(),
                ));
            }
            Message::SwitchToDetail(issue) => self.view = ViewState::Detail(DetailView::new(*issue)),
            Message::SwitchToStartWork(issue) => {
                self.view = ViewState::StartWork(StartWorkView::new(*issue))
            }
            Message::NextIssue => self.step_detail(true),
            Message::PrevIssue => self.step_detail(false),

            // ─────────────────────────────────────────────────────────────────
            // Selections
            // ─────────────────────────────────────────────────────────────────
            Message::TeamSelected {
                team,
                set_as_default,
            } => {
                if set_as_default && self.config.set_default_team(&self.workspace.id, &team.id) {
                    self.workspace.default_team_id = Some(team.id.clone());
                    effects.push(self.save_config());
                }
                self.enter_team(team, effects);
            }
            Message::WorkspaceSelected(WorkspaceChoice::AddNew) => {
                self.outcome = Some(Outcome::AddWorkspace)
            }
            Message::WorkspaceSelected(WorkspaceChoice::Existing(workspace)) => {
                if workspace.id == self.workspace.id {
                    return Some(Message::SwitchToTeamSelect);
                }
                self.switch_workspace(workspace, effects);
            }
            Message::ProviderSelected(provider) => {
                self.config.set_provider(&provider);
                effects.push(self.save_config());
            }

            // ─────────────────────────────────────────────────────────────────
            // Loads
            // ─────────────────────────────────────────────────────────────────
            Message::ViewerLoaded(result) => self.viewer_loaded(result, effects),
            Message::StatesLoaded { team_id, result } => {
                if self.is_current_team(&team_id, "states") {
                    self.list.set_states(result);
                }
            }
            Message::MyIssuesLoaded { team_id, result } => {
                if self.is_current_team(&team_id, "my issues") {
                    self.list.set_issues(Scope::Mine, result);
                }
            }
            Message::AllIssuesLoaded { team_id, result } => {
                if self.is_current_team(&team_id, "all issues") {
                    self.list.set_issues(Scope::All, result);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Issue edits
            // ─────────────────────────────────────────────────────────────────
            Message::TitleUpdated(update) => match requested(&update) {
                Some((issue_id, title)) => effects.push(Effect::UpdateTitle {
                    issue_id,
                    title: title.clone(),
                }),
                None => self.list.title_updated(&update),
            },
            Message::PriorityUpdated(update) => match requested(&update) {
                Some((issue_id, priority)) => effects.push(Effect::UpdatePriority {
                    issue_id,
                    priority: *priority,
                }),
                None => self.list.priority_updated(&update),
            },
            Message::StateUpdated(update) => match requested(&update) {
                Some((issue_id, Some(state_id))) => effects.push(Effect::UpdateState {
                    issue_id,
                    state_id: state_id.clone(),
                }),
                Some((_, None)) => {}
                None => self.list.state_updated(&update),
            },
            Message::CancelIssue { issue_id, team_id } => {
                effects.push(Effect::CancelIssue { issue_id, team_id })
            }
            Message::MarkDuplicate { issue_id, team_id } => {
                effects.push(Effect::MarkDuplicate { issue_id, team_id })
            }

            // ─────────────────────────────────────────────────────────────────
            // Hand-off
            // ─────────────────────────────────────────────────────────────────
            Message::Launch(mut request) => {
                if request.comment.trim().is_empty() {
                    self.outcome = Some(Outcome::Launch(request));
                } else {
                    effects.push(Effect::CreateComment {
                        issue_id: request.issue.id.clone(),
                        body: request.comment.clone(),
                    });
                    request.comment_synced = true;
                    self.pending_launch = Some(request);
                    if let ViewState::StartWork(view) = &mut self.view {
                        view.set_sending();
                    }
                }
            }
            Message::CommentCreated(result) => {
                if let Err(e) = &result {
                    tracing::warn!("Failed to add comment: {}", e);
                }
                if let Some(request) = self.pending_launch.take() {
                    self.outcome = Some(Outcome::Launch(request));
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Misc
            // ─────────────────────────────────────────────────────────────────
            Message::OpenBrowser(url) => effects.push(Effect::OpenBrowser(url)),
            Message::ConfigSaved(result) => match &mut self.view {
                ViewState::Settings(view) => view.saved(result),
                _ => {
                    if let Err(e) = result {
                        tracing::warn!("Failed to save config: {}", e);
                    }
                }
            },

            // ─────────────────────────────────────────────────────────────────
            // No-op
            // ─────────────────────────────────────────────────────────────────
            Message::None => {}
        }
        None
    }

    /// Show the neighbouring list issue in the detail view.
    fn step_detail(&mut self, forward: bool) {
        if matches!(self.view, ViewState::Detail(_)) {
            if let Some(issue) = self.list.step_issue(forward) {
                self.view = ViewState::Detail(DetailView::new(issue));
            }
        }
    }

    fn save_config(&self) -> Effect {
        Effect::SaveConfig {
            config: Box::new(self.config.clone()),
            path: self.config_path.clone(),
        }
    }

    /// Loads for a team other than the current one are stale and dropped.
    fn is_current_team(&self, team_id: &str, what: &str) -> bool {
        let current = self.team.as_ref().is_some_and(|t| t.id == team_id);
        if !current {
            tracing::debug!("Dropping {} loaded for stale team {}", what, team_id);
        }
        current
    }

    fn enter_team(&mut self, team: Team, effects: &mut Vec<Effect>) {
        tracing::info!("Opening team {} ({})", team.name, team.key);
        self.list = self.fresh_list();
        effects.extend([
            Effect::LoadStates {
                team_id: team.id.clone(),
            },
            Effect::LoadMyIssues {
                team_id: team.id.clone(),
            },
            Effect::LoadAllIssues {
                team_id: team.id.clone(),
            },
        ]);
        self.team = Some(team);
        self.view = ViewState::List;
    }

    fn fresh_list(&self) -> ListView {
        ListView::new(
            &self.version,
            &shorten_home(&self.working_dir),
            self.branch.clone(),
        )
    }

    fn switch_workspace(&mut self, workspace: Workspace, effects: &mut Vec<Effect>) {
        tracing::info!("Switching to workspace {}", workspace.name);
        self.tracker = (self.connect)(&workspace);
        self.workspace = workspace;
        self.list = self.fresh_list();
        self.team = None;
        self.teams.clear();
        self.view = ViewState::TeamSelect(TeamSelectView::loading());
        effects.push(Effect::LoadViewer);
    }

    fn viewer_loaded(&mut self, result: Result<Viewer, String>, effects: &mut Vec<Effect>) {
        let viewer = match result {
            Ok(viewer) => viewer,
            Err(e) => {
                tracing::warn!("Failed to load viewer: {}", e);
                let mut view = TeamSelectView::loading();
                view.set_error(e);
                self.view = ViewState::TeamSelect(view);
                return;
            }
        };

        self.teams = viewer.teams;
        let default_team = self
            .workspace
            .default_team_id
            .as_deref()
            .and_then(|id| self.teams.iter().find(|t| t.id == id));
        let auto_team = match (default_team, self.teams.as_slice()) {
            (Some(team), _) => Some(team.clone()),
            (None, [only]) => Some(only.clone()),
            _ => None,
        };

        match auto_team {
            Some(team) => self.enter_team(team, effects),
            None => {
                let mut view = TeamSelectView::loading();
                view.set_teams(self.teams.clone());
                self.view = ViewState::TeamSelect(view);
            }
        }
    }
}

/// The issue id and value of a not-yet-sent update.
fn requested<T>(update: &IssueUpdate<T>) -> Option<(String, &T)> {
    (update.phase == Phase::Requested).then(|| (update.issue_id.clone(), &update.value))
}
