//! TUI rendering module.
//!
//! Rendering only reads the app; it never changes it.
//!
//! - `layout` - Layout calculations and text utilities
//! - `style` - Icons, colours and formatters
//! - `list` - Issue list and its edit screens
//! - `detail` - Issue detail with markdown description
//! - `forms` - Pickers, start-work form and settings

pub mod layout;
mod detail;
mod forms;
mod list;
pub mod style;

pub use detail::markdown_to_lines;

use crate::tui::app::{App, ViewState};
use ratatui::{layout::Rect, Frame};

/// Main draw function - renders the active view.
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    let spinner = app.spinner();

    match app.view() {
        ViewState::List => list::draw_list(f, app.list(), spinner, area),
        ViewState::Detail(view) => detail::draw_detail(f, view, area),
        ViewState::StartWork(view) => forms::draw_start_work(f, view, spinner, area),
        ViewState::TeamSelect(view) => forms::draw_team_select(f, view, spinner, area),
        ViewState::WorkspaceSelect(view) => forms::draw_workspace_select(f, view, area),
        ViewState::Settings(view) => forms::draw_settings(f, view, area),
    }
}
