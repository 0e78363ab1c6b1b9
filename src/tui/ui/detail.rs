//! Issue detail rendering.

use super::layout::{body_and_footer, display_width};
use super::style::{
    dim_style, help_style, hex_color, initials, priority_spans, state_span, title_style, ACCENT,
    DIM,
};
use crate::tui::views::{DetailButton, DetailView};
use pulldown_cmark::{Event, Parser, Tag};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

const DETAIL_HELP: &str =
    "j/k: prev/next issue • h/l: switch button • enter: activate • o: open • s: start • esc: back";

const LABEL_WIDTH: usize = 10;

fn field(label: &str, value: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{label:<LABEL_WIDTH$}"),
        Style::default().fg(DIM).add_modifier(Modifier::BOLD),
    )];
    spans.extend(value);
    Line::from(spans)
}

fn button(label: &'static str, active: bool) -> Span<'static> {
    let style = if active {
        Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!(" {label} "), style)
}

pub fn draw_detail(f: &mut Frame, view: &DetailView, area: Rect) {
    let (body, footer) = body_and_footer(area);
    let issue = view.issue();

    let mut header = priority_spans(issue.priority);
    header.push(Span::raw("  "));
    header.push(Span::styled(issue.identifier.clone(), Style::default().fg(ACCENT)));
    header.push(Span::raw(" "));
    header.push(state_span(&issue.state));
    header.push(Span::raw(" "));
    header.push(Span::styled(issue.title.clone(), title_style()));

    let mut lines = vec![Line::from(header), Line::default()];
    lines.push(field(
        "Status",
        vec![state_span(&issue.state), Span::raw(format!(" {}", issue.state.name))],
    ));
    let mut priority = priority_spans(issue.priority);
    priority.push(Span::raw(format!(" {}", issue.priority.label())));
    lines.push(field("Priority", priority));
    lines.push(field(
        "Assignee",
        match &issue.assignee {
            Some(user) => vec![
                Span::styled(
                    format!(" {} ", initials(&user.name)),
                    Style::default().fg(Color::White).bg(ACCENT),
                ),
                Span::raw(format!(" {}", user.name)),
            ],
            None => vec![Span::styled("Unassigned", dim_style())],
        },
    ));
    if let Some(cycle) = &issue.cycle {
        let name = cycle.name.as_deref().unwrap_or_default();
        lines.push(field(
            "Cycle",
            vec![Span::styled(
                format!("#{} {}", cycle.number, name).trim_end().to_string(),
                Style::default().fg(Color::Indexed(141)),
            )],
        ));
    }
    if let Some(created) = &issue.created_at {
        lines.push(field(
            "Created",
            vec![Span::raw(created.format("%b %-d, %Y").to_string())],
        ));
    }
    if !issue.labels.is_empty() {
        let mut spans = Vec::new();
        for label in &issue.labels {
            let bg = hex_color(&label.color).unwrap_or(DIM);
            spans.push(Span::styled(
                format!(" {} ", label.name),
                Style::default().fg(Color::White).bg(bg),
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(field("Labels", spans));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Description",
        Style::default().fg(DIM).add_modifier(Modifier::BOLD),
    )));
    if issue.description.trim().is_empty() {
        lines.push(Line::from(Span::styled("(No description)", dim_style())));
    } else {
        lines.extend(markdown_to_lines(&issue.description, body.width as usize));
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        button(
            "Open in Browser (o)",
            view.focus() == DetailButton::OpenInBrowser,
        ),
        Span::raw("  "),
        button("Start Working (s)", view.focus() == DetailButton::StartWorking),
    ]));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
    f.render_widget(Paragraph::new(Span::styled(DETAIL_HELP, help_style())), footer);
}

/// Parse markdown text into styled ratatui Lines, word-wrapped to `max_width`.
pub fn markdown_to_lines(markdown: &str, max_width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    let mut bold = false;
    let mut italic = false;
    let mut heading = false;
    let mut code_block = false;
    let mut quote = false;
    let mut link = false;
    let mut list_depth = 0usize;

    let flush = |spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in Parser::new(markdown) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading(..) => {
                    flush(&mut current, &mut lines);
                    heading = true;
                }
                Tag::Paragraph => flush(&mut current, &mut lines),
                Tag::Strong => bold = true,
                Tag::Emphasis => italic = true,
                Tag::CodeBlock(_) => {
                    flush(&mut current, &mut lines);
                    code_block = true;
                }
                Tag::BlockQuote => {
                    flush(&mut current, &mut lines);
                    quote = true;
                }
                Tag::List(_) => {
                    flush(&mut current, &mut lines);
                    list_depth += 1;
                }
                Tag::Item => {
                    flush(&mut current, &mut lines);
                    current.push(Span::raw(format!("{}• ", "  ".repeat(list_depth - 1))));
                }
                Tag::Link(..) => link = true,
                _ => {}
            },
            Event::End(tag) => match tag {
                Tag::Heading(..) | Tag::Paragraph | Tag::CodeBlock(_) => {
                    flush(&mut current, &mut lines);
                    lines.push(Line::default());
                    heading = false;
                    code_block = false;
                }
                Tag::Strong => bold = false,
                Tag::Emphasis => italic = false,
                Tag::BlockQuote => {
                    flush(&mut current, &mut lines);
                    quote = false;
                }
                Tag::List(_) => list_depth = list_depth.saturating_sub(1),
                Tag::Item => flush(&mut current, &mut lines),
                Tag::Link(..) => link = false,
                _ => {}
            },
            Event::Text(text) => {
                let mut style = Style::default().fg(Color::White);
                if heading || link {
                    style = style.fg(Color::Cyan);
                }
                if code_block || quote {
                    style = style.fg(Color::Gray);
                }
                if bold || heading {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if italic || quote {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                if link {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }

                if code_block {
                    for line in text.lines() {
                        current.push(Span::styled(format!("    {line}"), style));
                        flush(&mut current, &mut lines);
                    }
                    continue;
                }

                let mut used: usize = current.iter().map(|s| display_width(&s.content)).sum();
                for word in text.split_whitespace() {
                    let width = display_width(word);
                    if used > 0 && used + width + 1 > max_width {
                        flush(&mut current, &mut lines);
                        used = 0;
                    }
                    let after_space = current.last().is_some_and(|s| s.content.ends_with(' '));
                    if used > 0 && !after_space {
                        current.push(Span::raw(" "));
                        used += 1;
                    }
                    current.push(Span::styled(word.to_string(), style));
                    used += width;
                }
            }
            Event::Code(code) => {
                current.push(Span::styled(format!("`{code}`"), Style::default().fg(Color::Gray)))
            }
            Event::SoftBreak | Event::HardBreak => flush(&mut current, &mut lines),
            _ => {}
        }
    }
    flush(&mut current, &mut lines);

    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}
