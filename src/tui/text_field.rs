//! Multi-line text editor field.

use ratatui::text::{Line, Span};

use crate::tui::{
    colors::Theme,
    enums::{AppEvent, FieldCmd},
    field::{pad_label, Field},
    text_area::TextArea,
    utils::wrap_lines,
};

pub const TEXT_WIDTH: usize = 50;
pub const TEXT_HEIGHT: usize = 10;

/// Editable text with a committed value and an optional in-progress draft.
///
/// `begin_edit` opens (or resumes) the draft, `commit` replaces the value with
/// it. Blurring mid-edit leaves edit mode but keeps the draft for the next
/// `begin_edit`.
pub struct TextField {
    label: String,
    value: String,
    draft: Option<TextArea>,
    always_show: bool,
    /// Columns available to the text; the value and the draft wrap at it.
    width: usize,
    focused: bool,
    editing: bool,
}

impl TextField {
    pub fn new(label: &str, value: &str, always_show: bool) -> Self {
        TextField {
            label: label.to_string(),
            value: value.to_string(),
            draft: None,
            always_show,
            width: TEXT_WIDTH,
            focused: false,
            editing: false,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// True when an uncommitted draft exists.
    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }
}

impl Field for TextField {
    fn label(&self) -> &str {
        &self.label
    }

    fn terminator(&self) -> Option<&'static str> {
        Some("ctrl+s")
    }

    fn focus(&mut self) -> Option<FieldCmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
        self.editing = false;
        if let Some(draft) = self.draft.as_mut() {
            draft.blur();
        }
    }

    fn begin_edit(&mut self) -> Option<FieldCmd> {
        if !self.focused {
            return None;
        }
        self.editing = true;
        let (value, width) = (&self.value, self.width);
        self.draft
            .get_or_insert_with(|| TextArea::new(value, width, TEXT_HEIGHT))
            .focus()
    }

    fn commit(&mut self) {
        self.editing = false;
        if let Some(draft) = self.draft.take() {
            self.value = draft.text();
        }
    }

    fn handle_input(&mut self, event: &AppEvent) -> Option<FieldCmd> {
        if !self.editing {
            return None;
        }
        self.draft.as_mut().and_then(|draft| draft.handle_input(event))
    }

    fn render(&self, label_width: usize, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if !self.label.is_empty() {
            let style = if self.focused { theme.focused } else { theme.label };
            lines.push(Line::from(Span::styled(
                pad_label(&format!("{}:", self.label), label_width),
                style,
            )));
        }

        if self.focused || self.editing || self.always_show {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            match (&self.draft, self.editing) {
                (Some(draft), true) => lines.extend(draft.render(theme)),
                _ => {
                    let style = if self.focused { theme.focused } else { theme.value };
                    lines.extend(
                        wrap_lines(&self.value, self.width)
                            .into_iter()
                            .map(|l| Line::from(Span::styled(l, style))),
                    );
                }
            }
        }

        if self.editing {
            lines.push(Line::from(Span::styled("(ctrl+s or esc to finish editing)", theme.help)));
        } else if self.focused {
            lines.push(Line::from(Span::styled("(Press enter to edit)", theme.help)));
        }
        lines
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::field::line_text;
    use crate::tui::input::keys::*;

    fn type_text(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle_input(&AppEvent::Key(ch(c)));
        }
    }

    #[test]
    fn typed_text_commits_exactly() {
        let mut field = TextField::new("", "", true);
        field.focus();
        assert_eq!(field.begin_edit(), Some(FieldCmd::Blink));
        type_text(&mut field, "hello");
        field.commit();
        assert_eq!(field.value(), "hello");
        assert!(!field.is_editing());
        assert!(!field.has_draft());
    }

    #[test]
    fn edits_append_to_existing_value() {
        let mut field = TextField::new("", "original", true);
        field.focus();
        field.begin_edit();
        type_text(&mut field, "  updated");
        assert_eq!(field.value(), "original");
        field.commit();
        assert_eq!(field.value(), "original  updated");
    }

    #[test]
    fn input_is_ignored_when_not_editing() {
        let mut field = TextField::new("Notes", "x", false);
        field.focus();
        type_text(&mut field, "abc");
        assert_eq!(field.value(), "x");
    }

    #[test]
    fn begin_edit_requires_focus() {
        let mut field = TextField::new("Notes", "x", false);
        assert_eq!(field.begin_edit(), None);
        assert!(!field.is_editing());
    }

    #[test]
    fn blur_keeps_the_draft_without_committing() {
        let mut field = TextField::new("", "base", true);
        field.focus();
        field.begin_edit();
        type_text(&mut field, "!");
        field.blur();
        assert!(!field.is_editing());
        assert_eq!(field.value(), "base");
        assert!(field.has_draft());

        field.focus();
        field.begin_edit();
        type_text(&mut field, "?");
        field.commit();
        assert_eq!(field.value(), "base!?");
    }

    #[test]
    fn hidden_until_focused_unless_always_shown() {
        let theme = Theme::default();
        let mut field = TextField::new("Notes", "secret", false);
        assert_eq!(line_text(&field.render(8, &theme)), "Notes:  ");
        field.focus();
        let text = line_text(&field.render(8, &theme));
        assert!(text.contains("secret"));
        assert!(text.ends_with("(Press enter to edit)"));
    }

    #[test]
    fn long_values_wrap_at_the_field_width() {
        let theme = Theme::default();
        let field = TextField::new("", "improve security and user experience", true).with_width(20);
        assert_eq!(
            line_text(&field.render(0, &theme)),
            "improve security and\nuser experience"
        );
    }

    #[test]
    fn draft_uses_the_field_width() {
        let theme = Theme::default();
        let mut field = TextField::new("", "abcdefghij", true).with_width(4);
        field.focus();
        field.begin_edit();
        let text = line_text(&field.render(0, &theme));
        assert!(text.starts_with("abcd\nefgh\nij"));
    }
}
