//! Layout and text helpers shared by the screens.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rectangle covering `percent_x` by `percent_y` of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Usable content width for a terminal of `width` columns.
pub fn content_width(width: u16) -> usize {
    (width as usize).saturating_sub(4).max(20)
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap every line of `text` separately so paragraph breaks survive.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    text.split('\n').flat_map(|line| wrap_text(line, width)).collect()
}

/// Column widths of the backlog table: ID, Type, Title, Assigned To, State, Priority.
pub fn table_widths(width: u16) -> [u16; 6] {
    let usable = u32::from(width.saturating_sub(8));
    [8u32, 12, 45, 15, 12, 8].map(|pct| (usable * pct / 100) as u16)
}
