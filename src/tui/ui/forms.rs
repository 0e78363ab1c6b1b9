//! Rendering for the smaller views: pickers, start-work form and settings.

use super::layout::body_and_footer;
use super::style::{
    checkbox_span, cursor_span, dim_style, error_style, help_style, selected_style, title_style,
    ACCENT, DIM,
};
use crate::tui::views::{
    SettingsView, StartFocus, StartWorkView, TeamSelectView, WorkspaceSelectView,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn render(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>, help: &'static str) {
    let (body, footer) = body_and_footer(area);
    f.render_widget(Paragraph::new(lines), body);
    f.render_widget(Paragraph::new(Span::styled(help, help_style())), footer);
}

fn heading(text: impl Into<String>) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(text.into(), title_style())),
        Line::default(),
    ]
}

fn row(text: String, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(format!(" {text} "), selected_style()))
    } else {
        Line::from(Span::raw(format!(" {text} ")))
    }
}

fn label(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(DIM).add_modifier(Modifier::BOLD),
    ))
}

pub fn draw_team_select(f: &mut Frame, view: &TeamSelectView, spinner: char, area: Rect) {
    let help = "j/k: navigate • enter: select • d: toggle default • esc: back • q: quit";
    if view.is_loading() {
        return render(f, area, heading(format!("{spinner} Loading teams...")), help);
    }
    if let Some(error) = view.error() {
        let lines = vec![Line::from(Span::styled(
            format!("Error loading teams: {error}"),
            error_style(),
        ))];
        return render(f, area, lines, "esc: back • q: quit");
    }
    if view.teams().is_empty() {
        return render(f, area, vec![Line::from(Span::styled("No teams found", dim_style()))], help);
    }

    let mut lines = heading("Select a Team");
    for (i, team) in view.teams().iter().enumerate() {
        lines.push(row(format!("{} ({})", team.name, team.key), i == view.cursor()));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        checkbox_span(view.set_as_default()),
        Span::raw(" Set as default team (d to toggle)"),
    ]));
    render(f, area, lines, help);
}

pub fn draw_workspace_select(f: &mut Frame, view: &WorkspaceSelectView, area: Rect) {
    let mut lines = heading("Select a Linear workspace for this directory");
    for (i, workspace) in view.workspaces().iter().enumerate() {
        lines.push(row(workspace.name.clone(), i == view.cursor()));
    }
    lines.push(row(
        WorkspaceSelectView::ADD_NEW_LABEL.to_string(),
        view.cursor() == view.workspaces().len(),
    ));
    render(f, area, lines, "j/k: navigate • enter: select • q: quit");
}

pub fn draw_start_work(f: &mut Frame, view: &StartWorkView, spinner: char, area: Rect) {
    let issue = view.issue();
    let focus = view.focus();

    let mut lines = heading(format!("Start Working on {}", issue.identifier));
    lines.push(Line::from(Span::styled(issue.title.clone(), dim_style())));
    lines.push(Line::default());

    lines.push(label("Comment:"));
    let comment = view.comment();
    let comment_line = if comment.is_empty() && focus != StartFocus::Comment {
        Span::styled("Add a comment (optional, syncs to Linear)", dim_style())
    } else {
        Span::raw(comment.value().to_string())
    };
    let border = if focus == StartFocus::Comment {
        Style::default().fg(ACCENT)
    } else {
        dim_style()
    };
    let mut spans = vec![Span::styled("│ ", border), comment_line];
    if focus == StartFocus::Comment {
        spans.push(Span::styled("█", Style::default().fg(ACCENT)));
    }
    lines.push(Line::from(spans));
    lines.push(Line::default());

    let mut branch = checkbox_line("Use Linear branch name", view.use_branch(), focus == StartFocus::UseBranch);
    if let Some(name) = issue.branch_name.as_deref() {
        branch.spans.push(Span::styled(format!("  ({name})"), dim_style()));
    }
    lines.push(branch);
    lines.push(checkbox_line("Start in plan mode", view.plan_mode(), focus == StartFocus::PlanMode));
    lines.push(Line::default());

    let button = |text: &'static str, active: bool| {
        let style = if active {
            Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!(" {text} "), style)
    };
    lines.push(Line::from(vec![
        button("Start Agent", focus == StartFocus::Start),
        Span::raw("  "),
        button("Checkout Only", focus == StartFocus::CheckoutOnly),
    ]));

    if view.is_sending() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("{spinner} Adding comment..."),
            dim_style(),
        )));
    }

    render(f, area, lines, "tab/arrows: navigate • space/enter: toggle/select • esc: back");
}

fn checkbox_line(text: &str, checked: bool, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        cursor_span(focused),
        checkbox_span(checked),
        Span::styled(format!(" {text}"), style),
    ])
}

pub fn draw_settings(f: &mut Frame, view: &SettingsView, area: Rect) {
    if view.is_editing() {
        let mut lines = heading("Select AI Provider");
        for (i, provider) in view.providers().iter().enumerate() {
            let mut spans = vec![cursor_span(i == view.cursor()), Span::raw(provider.clone())];
            if provider == view.current() {
                spans.push(Span::styled(" (current)", dim_style()));
            }
            lines.push(Line::from(spans));
        }
        return render(f, area, lines, "j/k: navigate • enter: select • esc: cancel");
    }

    let mut lines = heading("Settings");
    lines.push(label("Workspace"));
    match view.workspace() {
        Some(workspace) => {
            lines.push(Line::from(format!("  Name: {}", workspace.name)));
            lines.push(Line::from(Span::styled(format!("  ID:   {}", workspace.id), dim_style())));
            if let Some(team) = &workspace.default_team_id {
                lines.push(Line::from(Span::styled(
                    format!("  Default Team: {team}"),
                    dim_style(),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled("  No workspace selected", dim_style()))),
    }
    lines.push(Line::default());
    lines.push(label("AI Provider"));
    lines.push(Line::from(format!("  {}", view.current())));
    lines.push(Line::default());
    lines.push(label("Config File"));
    lines.push(Line::from(Span::styled(format!("  {}", view.config_path()), dim_style())));

    if view.is_saved() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Settings saved!", Style::default().fg(Color::Green))));
    }
    if let Some(error) = view.error() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(error.to_string(), error_style())));
    }
    render(f, area, lines, "p: change provider • esc/q: back");
}
