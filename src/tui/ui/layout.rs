//! Layout calculations and text utilities for the TUI.

use once_cell::sync::Lazy;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Pre-computed padding strings to avoid repeated " ".repeat(n) allocations.
static PADDING: Lazy<Vec<String>> = Lazy::new(|| (0..=120).map(|n| " ".repeat(n)).collect());

#[inline]
fn get_padding(width: usize) -> &'static str {
    &PADDING[width.min(120)]
}

/// Rows of the issue list shown at once.
pub const MAX_VISIBLE_ROWS: usize = 10;

/// Window `start..end` of at most `max` rows that keeps `cursor` roughly centered.
pub fn visible_window(cursor: usize, total: usize, max: usize) -> (usize, usize) {
    if total <= max {
        return (0, total);
    }
    let start = cursor.saturating_sub(max / 2).min(total - max);
    (start, start + max)
}

/// Calculate the display width of text (accounting for Unicode).
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate text to a maximum display width.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > max_width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

/// Truncate a string to max width, adding "..." if needed.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if display_width(s) <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return truncate_to_width(s, max_len);
    }
    let truncated = truncate_to_width(s, max_len - 3);
    format!("{truncated}...")
}

/// Pad text to a specific width with given alignment.
pub fn pad_to_width(text: &str, width: usize, alignment: Alignment) -> String {
    let mut trimmed = truncate_to_width(text, width);
    let pad = width.saturating_sub(display_width(&trimmed));
    match alignment {
        Alignment::Left => {
            trimmed.push_str(get_padding(pad));
            trimmed
        }
        Alignment::Right => format!("{}{}", get_padding(pad), trimmed),
        Alignment::Center => {
            let left = pad / 2;
            format!("{}{}{}", get_padding(left), trimmed, get_padding(pad - left))
        }
    }
}

/// Calculate the display width of a Line.
pub fn line_display_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|span| display_width(span.content.as_ref()))
        .sum()
}

/// Pad a set of spans to `width` with trailing spaces.
pub fn pad_spans(mut spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    let current = line_display_width(&Line::from(spans.clone()));
    if current < width {
        spans.push(Span::raw(get_padding(width - current)));
    }
    spans
}

/// Split an area into a body and a one-line footer.
pub fn body_and_footer(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}
