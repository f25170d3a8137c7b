//! Interactive field building blocks.
//!
//! A `Field` is one unit of a form: it has a label, knows whether it is focused
//! or editing, consumes input and renders itself as a block of lines. The
//! read-only displays (plain text, tag chips, comment threads) and the
//! single-choice selector live here; the text editor and the tab group have
//! their own modules.

use ratatui::text::{Line, Span};

use crate::tui::{
    colors::Theme,
    enums::{AppEvent, FieldCmd, Orientation},
    input::key_name,
    utils::wrap_lines,
};
use crate::work_item::{format_comments, format_tags, format_timestamp, Comment};

/// Capability set shared by every field variant.
pub trait Field {
    fn label(&self) -> &str;

    /// Key that commits an in-progress edit, or `None` for fields that cannot edit.
    fn terminator(&self) -> Option<&'static str> {
        None
    }

    fn focus(&mut self) -> Option<FieldCmd>;

    /// Unfocus. A field that was editing leaves edit mode.
    fn blur(&mut self);

    fn begin_edit(&mut self) -> Option<FieldCmd> {
        None
    }

    /// Leave edit mode, keeping the in-progress value.
    fn commit(&mut self) {}

    fn handle_input(&mut self, event: &AppEvent) -> Option<FieldCmd>;

    /// Render with the label padded to `label_width`.
    fn render(&self, label_width: usize, theme: &Theme) -> Vec<Line<'static>>;

    fn is_focused(&self) -> bool;

    fn is_editing(&self) -> bool {
        false
    }

    /// Current committed value as text.
    fn value(&self) -> String;

    /// Index of the visible child, for tab groups.
    fn selected_tab(&self) -> Option<usize> {
        None
    }
}

/// Right-pad `label` to `width` characters.
pub fn pad_label(label: &str, width: usize) -> String {
    format!("{label:<width$}")
}

/// Label as rendered: "Label:" padded to the column width, or nothing when unlabeled.
fn label_span(label: &str, width: usize, style: ratatui::style::Style) -> Option<Span<'static>> {
    if label.is_empty() {
        None
    } else {
        Some(Span::styled(pad_label(&format!("{label}:"), width), style))
    }
}

/// Display-only field. Never edits.
pub struct Readonly {
    label: String,
    value: String,
    focused: bool,
}

impl Readonly {
    pub fn new(label: &str, value: &str) -> Self {
        Readonly {
            label: label.to_string(),
            value: value.to_string(),
            focused: false,
        }
    }
}

impl Field for Readonly {
    fn label(&self) -> &str {
        &self.label
    }

    fn focus(&mut self) -> Option<FieldCmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn handle_input(&mut self, _event: &AppEvent) -> Option<FieldCmd> {
        None
    }

    fn render(&self, label_width: usize, theme: &Theme) -> Vec<Line<'static>> {
        let value_style = if self.focused { theme.focused } else { theme.value };
        let label = label_span(&self.label, label_width, theme.label);
        let indent = if label.is_some() { label_width } else { 0 };

        let mut lines = Vec::new();
        for (i, text) in self.value.split('\n').enumerate() {
            let mut spans = Vec::new();
            match (&label, i) {
                (Some(label), 0) => spans.push(label.clone()),
                _ if indent > 0 => spans.push(Span::raw(" ".repeat(indent))),
                _ => {}
            }
            spans.push(Span::styled(text.to_string(), value_style));
            lines.push(Line::from(spans));
        }
        lines
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

/// Read-only tag list drawn as chips.
pub struct TagList {
    label: String,
    tags: Vec<String>,
    focused: bool,
}

impl TagList {
    pub fn new(label: &str, tags: &[String]) -> Self {
        TagList {
            label: label.to_string(),
            tags: tags.to_vec(),
            focused: false,
        }
    }
}

impl Field for TagList {
    fn label(&self) -> &str {
        &self.label
    }

    fn focus(&mut self) -> Option<FieldCmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn handle_input(&mut self, _event: &AppEvent) -> Option<FieldCmd> {
        None
    }

    fn render(&self, label_width: usize, theme: &Theme) -> Vec<Line<'static>> {
        let label_style = if self.focused { theme.focused } else { theme.label };
        let mut spans: Vec<Span<'static>> = label_span(&self.label, label_width, label_style)
            .into_iter()
            .collect();
        if self.tags.is_empty() {
            spans.push(Span::styled("-", theme.value));
        }
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(format!(" {tag} "), theme.tag));
        }
        vec![Line::from(spans)]
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn value(&self) -> String {
        format_tags(&self.tags)
    }
}

/// Read-only discussion: each comment as an author/date line over its wrapped text.
pub struct CommentThread {
    label: String,
    comments: Vec<Comment>,
    width: usize,
    focused: bool,
}

impl CommentThread {
    pub fn new(label: &str, comments: &[Comment], width: usize) -> Self {
        CommentThread {
            label: label.to_string(),
            comments: comments.to_vec(),
            width: width.max(1),
            focused: false,
        }
    }
}

impl Field for CommentThread {
    fn label(&self) -> &str {
        &self.label
    }

    fn focus(&mut self) -> Option<FieldCmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn handle_input(&mut self, _event: &AppEvent) -> Option<FieldCmd> {
        None
    }

    fn render(&self, label_width: usize, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = label_span(&self.label, label_width, theme.label)
            .map(Line::from)
            .into_iter()
            .collect();
        if self.comments.is_empty() {
            lines.push(Line::from(Span::styled("No comments yet.", theme.help)));
            return lines;
        }

        let text_style = if self.focused { theme.focused } else { theme.value };
        for (i, comment) in self.comments.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(vec![
                Span::styled(comment.author.clone(), theme.comment_author),
                Span::raw("  "),
                Span::styled(format_timestamp(&comment.created_at), theme.comment_date),
            ]));
            lines.extend(
                wrap_lines(&comment.content, self.width)
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, text_style))),
            );
        }
        lines
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn value(&self) -> String {
        format_comments(&self.comments)
    }
}

/// Single-choice selector over a fixed option list.
///
/// Directional keys only move the selection while editing. Movement clamps at
/// both ends.
pub struct Selector {
    label: String,
    options: Vec<String>,
    selected: usize,
    orientation: Orientation,
    focused: bool,
    editing: bool,
}

impl Selector {
    pub fn new(label: &str, options: &[&str], orientation: Orientation) -> Self {
        Selector {
            label: label.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            selected: 0,
            orientation,
            focused: false,
            editing: false,
        }
    }

    /// Preselect `value`, appending it to the options when it is not one of them.
    pub fn with_selected(mut self, value: &str) -> Self {
        match self.options.iter().position(|o| o == value) {
            Some(i) => self.selected = i,
            None => {
                self.options.push(value.to_string());
                self.selected = self.options.len() - 1;
            }
        }
        self
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    fn current(&self) -> &str {
        self.options.get(self.selected).map_or("-", String::as_str)
    }

    fn step(&mut self, forward: bool) {
        if self.options.is_empty() {
            return;
        }
        if forward {
            if self.selected + 1 < self.options.len() {
                self.selected += 1;
            }
        } else if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn option_spans(&self, theme: &Theme) -> Vec<Span<'static>> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                if i == self.selected {
                    Span::styled(format!("(*) {option}  "), theme.option_active)
                } else {
                    Span::styled(format!("( ) {option}  "), theme.option_inactive)
                }
            })
            .collect()
    }
}

impl Field for Selector {
    fn label(&self) -> &str {
        &self.label
    }

    fn terminator(&self) -> Option<&'static str> {
        Some("enter")
    }

    fn focus(&mut self) -> Option<FieldCmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
        self.editing = false;
    }

    fn begin_edit(&mut self) -> Option<FieldCmd> {
        if self.focused {
            self.editing = true;
        }
        None
    }

    fn commit(&mut self) {
        self.editing = false;
    }

    fn handle_input(&mut self, event: &AppEvent) -> Option<FieldCmd> {
        let AppEvent::Key(key) = event else { return None };
        if !self.editing {
            return None;
        }
        match (self.orientation, key_name(key).as_str()) {
            (Orientation::Horizontal, "left" | "h") => self.step(false),
            (Orientation::Horizontal, "right" | "l") => self.step(true),
            (Orientation::Vertical, "up" | "k") => self.step(false),
            (Orientation::Vertical, "down" | "j") => self.step(true),
            _ => {}
        }
        None
    }

    fn render(&self, label_width: usize, theme: &Theme) -> Vec<Line<'static>> {
        let label_style = if self.focused { theme.focused } else { theme.label };
        let label = label_span(&self.label, label_width, label_style);
        let mut first: Vec<Span<'static>> = label.into_iter().collect();

        if self.editing && !self.options.is_empty() {
            match self.orientation {
                Orientation::Horizontal => {
                    first.extend(self.option_spans(theme));
                    return vec![Line::from(first)];
                }
                Orientation::Vertical => {
                    let mut lines = vec![Line::from(first)];
                    lines.extend(
                        self.option_spans(theme)
                            .into_iter()
                            .map(|span| Line::from(vec![Span::raw("  "), span])),
                    );
                    return lines;
                }
            }
        }

        if self.focused && !self.options.is_empty() {
            let (back, forward) = match self.orientation {
                Orientation::Horizontal => ("< ", " >"),
                Orientation::Vertical => ("^ ", " v"),
            };
            let at_start = self.selected == 0;
            let at_end = self.selected + 1 >= self.options.len();
            first.push(Span::styled(if at_start { "  " } else { back }, theme.help));
            first.push(Span::styled(self.current().to_string(), theme.focused));
            first.push(Span::styled(if at_end { "  " } else { forward }, theme.help));
        } else {
            first.push(Span::styled(self.current().to_string(), theme.value));
        }
        vec![Line::from(first)]
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn value(&self) -> String {
        self.current().to_string()
    }
}

#[cfg(test)]
pub(crate) fn line_text(lines: &[Line<'_>]) -> String {
    lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().join("\n")
}
