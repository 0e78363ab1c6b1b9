//! Icons, colours and small formatters shared by the views.

use crate::data::{Priority, State, StateType};
use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

pub const DIM: Color = Color::Indexed(241);
pub const ACCENT: Color = Color::Indexed(62);
pub const URGENT: Color = Color::Indexed(196);

pub fn title_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn dim_style() -> Style {
    Style::default().fg(DIM)
}

pub fn help_style() -> Style {
    Style::default().fg(DIM)
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn selected_style() -> Style {
    Style::default().bg(ACCENT).fg(Color::White)
}

pub fn cursor_span(selected: bool) -> Span<'static> {
    if selected {
        Span::styled("> ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
    } else {
        Span::raw("  ")
    }
}

pub fn checkbox_span(checked: bool) -> Span<'static> {
    if checked {
        Span::styled("[x]", Style::default().fg(Color::Green))
    } else {
        Span::raw("[ ]")
    }
}

/// Parse `#rrggbb` into a terminal colour.
pub fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

pub fn state_icon(state_type: StateType) -> &'static str {
    match state_type {
        StateType::Started => "◐",
        StateType::Completed => "●",
        _ => "○",
    }
}

/// State icon in the state's own colour.
pub fn state_span(state: &State) -> Span<'static> {
    let color = hex_color(&state.color).unwrap_or(DIM);
    Span::styled(state_icon(state.state_type), Style::default().fg(color))
}

/// Three-cell priority signal, as (bright part, dim part).
pub fn priority_icon(priority: Priority) -> (&'static str, &'static str) {
    match priority {
        Priority::Urgent => ("[!]", ""),
        Priority::High => ("▂▄▆", ""),
        Priority::Medium => ("▂▄", "▆"),
        Priority::Low => ("▂", "▄▆"),
        Priority::NoPriority => ("", "---"),
    }
}

pub fn priority_spans(priority: Priority) -> Vec<Span<'static>> {
    let (bright, dim) = priority_icon(priority);
    let bright_color = if priority == Priority::Urgent {
        URGENT
    } else {
        Color::White
    };
    vec![
        Span::styled(bright, Style::default().fg(bright_color)),
        Span::styled(dim, dim_style()),
    ]
}

/// Two-letter initials: first and last word, or the first two letters of a single word.
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => "?".to_string(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}

/// e.g. "Jan 2"
pub fn short_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %-d").to_string())
        .unwrap_or_default()
}
