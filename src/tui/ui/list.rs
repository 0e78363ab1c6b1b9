//! Issue list rendering, including the edit sub-mode screens.

use super::layout::{
    body_and_footer, pad_spans, pad_to_width, truncate_str, visible_window, MAX_VISIBLE_ROWS,
};
use super::style::{
    cursor_span, dim_style, error_style, help_style, initials, priority_spans,
    selected_style, short_date, state_span, title_style, ACCENT, DIM,
};
use crate::data::{Issue, Priority};
use crate::tui::views::list::STATUS_EXTRA_ENTRIES;
use crate::tui::views::{EditMode, ListView};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const LIST_HELP: &str = "h/l: status • j/k: navigate • R: rename • p: priority • s: status • a: my/all • /: filter • ,: settings • enter: select • q: quit";

/// Width of everything in a row except the title.
const ROW_FIXED_WIDTH: usize = 44;

pub fn draw_list(f: &mut Frame, list: &ListView, spinner: char, area: Rect) {
    let (body, footer) = body_and_footer(area);

    let (lines, help) = match list.edit() {
        EditMode::Rename { .. } => (rename_lines(list), "enter: save • esc: cancel"),
        EditMode::Priority { .. } => (
            priority_lines(list),
            "j/k: navigate • 0-4: quick select • enter: save • esc: cancel",
        ),
        EditMode::Status { .. } => (status_lines(list), "j/k: navigate • enter: save • esc: cancel"),
        EditMode::None => (list_lines(list, spinner, body.width as usize), LIST_HELP),
    };

    f.render_widget(Paragraph::new(lines), body);
    f.render_widget(Paragraph::new(Span::styled(help, help_style())), footer);
}

fn header_lines(list: &ListView) -> Vec<Line<'static>> {
    let version = if list.version().is_empty() {
        "dev"
    } else {
        list.version()
    };
    vec![
        Line::from(vec![
            Span::styled(" LINC ", Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(version.to_string(), dim_style()),
        ]),
        Line::from(Span::styled(format!(" {}", list.working_dir()), dim_style())),
    ]
}

fn branch_lines(list: &ListView) -> Vec<Line<'static>> {
    let Some(branch) = list.branch() else {
        return Vec::new();
    };
    let label = Style::default().fg(DIM);
    let mut lines = vec![Line::from(vec![
        Span::styled("│ branch: ", label),
        Span::styled(branch.to_string(), Style::default().fg(Color::Green)),
    ])];
    if let Some(issue) = list.branch_issue() {
        lines.push(Line::from(vec![
            Span::styled("│ issue:  ", label),
            state_span(&issue.state),
            Span::raw(" "),
            Span::styled(issue.identifier.clone(), Style::default().fg(ACCENT)),
            Span::raw(format!(" {}", issue.title)),
        ]));
    }
    lines
}

fn tab_spans(list: &ListView) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, state) in list.states().iter().enumerate() {
        let text = format!(" {} ({}) ", state.name, list.bucket_len(&state.id));
        spans.push(state_span(state));
        if i == list.active_tab() {
            spans.push(Span::styled(
                text,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::styled(text, dim_style()));
        }
    }
    spans
}

fn list_lines(list: &ListView, spinner: char, width: usize) -> Vec<Line<'static>> {
    let mut lines = header_lines(list);
    lines.push(Line::default());

    if list.is_loading() {
        lines.push(Line::from(Span::styled(
            format!("{spinner} Loading issues..."),
            title_style(),
        )));
        return lines;
    }

    lines.extend(branch_lines(list));
    lines.push(Line::from(Span::styled(list.scope().label(), title_style())));
    lines.push(Line::default());
    lines.push(Line::from(tab_spans(list)));
    lines.push(Line::default());

    if list.is_filtering() {
        lines.push(Line::from(vec![
            Span::styled("/ ", Style::default().fg(ACCENT)),
            Span::raw(list.filter().value().to_string()),
            Span::styled("█", dim_style()),
        ]));
    } else if !list.filter().is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(ACCENT)),
            Span::raw(list.filter().value().to_string()),
        ]));
    }

    let issues = list.filtered();
    if issues.is_empty() {
        lines.push(Line::from(Span::styled("No issues", dim_style())));
    } else {
        let (start, end) = visible_window(list.cursor(), issues.len(), MAX_VISIBLE_ROWS);
        if start > 0 {
            lines.push(Line::from(Span::styled(
                format!("  ↑ {start} more above"),
                dim_style(),
            )));
        }
        let title_width = width.saturating_sub(ROW_FIXED_WIDTH).max(10);
        for (i, issue) in issues.iter().enumerate().take(end).skip(start) {
            lines.push(issue_row(issue, i == list.cursor(), title_width));
        }
        if end < issues.len() {
            lines.push(Line::from(Span::styled(
                format!("  ↓ {} more below", issues.len() - end),
                dim_style(),
            )));
        }
    }

    if let Some(error) = list.error() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(format!("Error: {error}"), error_style())));
    }
    lines
}

fn issue_row(issue: &Issue, selected: bool, title_width: usize) -> Line<'static> {
    let cell = |text: String, width: usize, style: Style| {
        Span::styled(pad_to_width(&text, width, Alignment::Left), style)
    };

    let mut spans = pad_spans(priority_spans(issue.priority), 3);
    spans.push(Span::raw(" "));
    spans.push(cell(issue.identifier.clone(), 10, dim_style()));
    spans.push(Span::raw(" "));
    spans.push(state_span(&issue.state));
    spans.push(Span::raw(" "));
    spans.push(cell(
        truncate_str(&issue.title, title_width),
        title_width,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(" "));
    spans.push(cell(
        issue.cycle.as_ref().map(|c| format!("▶ {}", c.number)).unwrap_or_default(),
        6,
        Style::default().fg(Color::White),
    ));
    spans.push(Span::raw(" "));
    spans.push(cell(
        issue.estimate.map(|e| format!("{e:.0}")).unwrap_or_default(),
        4,
        dim_style(),
    ));
    spans.push(Span::raw(" "));
    match &issue.assignee {
        Some(user) => spans.push(cell(
            format!(" {} ", initials(&user.name)),
            4,
            Style::default().fg(Color::White).bg(ACCENT),
        )),
        None => spans.push(cell(String::new(), 4, Style::default())),
    }
    spans.push(Span::raw(" "));
    spans.push(cell(short_date(issue.created_at.as_ref()), 7, dim_style()));

    let line = Line::from(spans);
    if selected {
        line.style(selected_style())
    } else {
        line
    }
}

fn edit_heading(title: &str, issue: Option<&Issue>, with_title: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(title.to_string(), title_style())), Line::default()];
    if let Some(issue) = issue {
        let mut spans = vec![Span::styled(issue.identifier.clone(), Style::default().fg(ACCENT))];
        if with_title {
            spans.push(Span::raw(format!(" {}", issue.title)));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }
    lines
}

fn edit_target<'a>(list: &'a ListView) -> Option<&'a Issue> {
    list.edit().issue_id().and_then(|id| list.issue(id))
}

fn saving_line(list: &ListView) -> Option<Line<'static>> {
    list.edit()
        .is_submitted()
        .then(|| Line::from(Span::styled("Saving...", dim_style())))
}

fn rename_lines(list: &ListView) -> Vec<Line<'static>> {
    let mut lines = edit_heading("Rename Issue", edit_target(list), false);
    if let EditMode::Rename { input, .. } = list.edit() {
        let value = input.value();
        let at = value
            .char_indices()
            .nth(input.cursor())
            .map_or(value.len(), |(i, _)| i);
        lines.push(Line::from(vec![
            Span::raw(value[..at].to_string()),
            Span::styled("█", Style::default().fg(ACCENT)),
            Span::raw(value[at..].to_string()),
        ]));
    }
    lines.push(Line::default());
    lines.extend(saving_line(list));
    lines
}

fn priority_lines(list: &ListView) -> Vec<Line<'static>> {
    let target = edit_target(list);
    let mut lines = edit_heading("Set Priority", target, true);
    let cursor = match list.edit() {
        EditMode::Priority { cursor, .. } => *cursor,
        _ => 0,
    };
    for priority in Priority::ALL {
        let value = priority.as_int() as usize;
        let mut spans = vec![cursor_span(cursor == value), Span::raw(format!("{value}: "))];
        spans.extend(pad_spans(priority_spans(priority), 3));
        spans.push(Span::raw(format!(" {}", priority.label())));
        if target.is_some_and(|i| i.priority == priority) {
            spans.push(Span::styled(" (current)", dim_style()));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
    lines.extend(saving_line(list));
    lines
}

fn status_lines(list: &ListView) -> Vec<Line<'static>> {
    let target = edit_target(list);
    let mut lines = edit_heading("Set Status", target, true);
    let cursor = match list.edit() {
        EditMode::Status { cursor, .. } => *cursor,
        _ => 0,
    };
    for (i, state) in list.states().iter().enumerate() {
        let mut spans = vec![
            cursor_span(cursor == i),
            state_span(state),
            Span::raw(format!(" {}", state.name)),
        ];
        if target.is_some_and(|issue| issue.state.id == state.id) {
            spans.push(Span::styled(" (current)", dim_style()));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
    for (offset, label) in STATUS_EXTRA_ENTRIES.iter().enumerate() {
        lines.push(Line::from(vec![
            cursor_span(cursor == list.states().len() + offset),
            Span::styled("○", dim_style()),
            Span::raw(format!(" {label}")),
        ]));
    }
    lines.push(Line::default());
    lines.extend(saving_line(list));
    lines
}
