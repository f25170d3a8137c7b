//! Form: an ordered list of fields with shared focus traversal and label alignment.

use ratatui::text::{Line, Span};

use crate::tui::{
    colors::Theme,
    enums::{AppEvent, FieldCmd},
    field::{pad_label, Field},
    input::key_name,
};

/// Extra columns after the longest label.
const LABEL_PADDING: usize = 2;

/// Outcome of routing one event through a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// A field asked for a follow-up action.
    Cmd(FieldCmd),
    /// The field at this index left edit mode through `commit`.
    Committed(usize),
}

pub struct Form {
    title: Option<String>,
    fields: Vec<Box<dyn Field>>,
    focused: usize,
    label_width: usize,
}

impl Form {
    /// Build a form with the first field focused.
    pub fn new(fields: Vec<Box<dyn Field>>) -> Self {
        let label_width = fields.iter().map(|f| f.label().chars().count()).max().unwrap_or(0) + LABEL_PADDING;
        let mut form = Form {
            title: None,
            fields,
            focused: 0,
            label_width,
        };
        if let Some(first) = form.fields.first_mut() {
            first.focus();
        }
        form
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn label_width(&self) -> usize {
        self.label_width
    }

    /// Right-pad a label to the shared column width.
    pub fn pad(&self, label: &str) -> String {
        pad_label(label, self.label_width)
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn field(&self, index: usize) -> Option<&dyn Field> {
        self.fields.get(index).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when the focused field is consuming keystrokes.
    pub fn is_editing(&self) -> bool {
        self.fields.get(self.focused).is_some_and(|f| f.is_editing())
    }

    /// Move focus to `index`, clamped to the last field.
    pub fn set_focus(&mut self, index: usize) -> Option<FieldCmd> {
        if self.fields.is_empty() {
            return None;
        }
        let index = index.min(self.fields.len() - 1);
        if let Some(current) = self.fields.get_mut(self.focused) {
            current.blur();
        }
        self.focused = index;
        self.fields.get_mut(index).and_then(|f| f.focus())
    }

    fn focus_next(&mut self) -> Option<FieldCmd> {
        if self.focused + 1 < self.fields.len() {
            self.set_focus(self.focused + 1)
        } else {
            None
        }
    }

    fn focus_prev(&mut self) -> Option<FieldCmd> {
        if self.focused > 0 {
            self.set_focus(self.focused - 1)
        } else {
            None
        }
    }

    /// Route one event.
    ///
    /// While the focused field edits, esc and its terminator both commit and
    /// everything else goes to the field. Otherwise j/k and the arrow keys move
    /// focus, enter begins editing, and other input still reaches the field.
    pub fn update(&mut self, event: &AppEvent) -> Option<FormEvent> {
        let index = self.focused;
        if !self.fields.get(index)?.is_editing() {
            if let AppEvent::Key(key) = event {
                match key_name(key).as_str() {
                    "down" | "j" => return self.focus_next().map(FormEvent::Cmd),
                    "up" | "k" => return self.focus_prev().map(FormEvent::Cmd),
                    _ => {}
                }
            }
        }

        let field = self.fields.get_mut(index)?;
        if field.is_editing() {
            if let AppEvent::Key(key) = event {
                let name = key_name(key);
                if name == "esc" || field.terminator() == Some(name.as_str()) {
                    field.commit();
                    return Some(FormEvent::Committed(index));
                }
            }
            return field.handle_input(event).map(FormEvent::Cmd);
        }

        if let AppEvent::Key(key) = event {
            if key_name(key) == "enter" {
                return field.begin_edit().map(FormEvent::Cmd);
            }
        }
        field.handle_input(event).map(FormEvent::Cmd)
    }

    /// Optional title and blank line, then every field in order.
    pub fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if let Some(title) = &self.title {
            lines.push(Line::from(Span::styled(title.clone(), theme.title)));
            lines.push(Line::default());
        }
        for field in &self.fields {
            lines.extend(field.render(self.label_width, theme));
        }
        lines
    }
}
