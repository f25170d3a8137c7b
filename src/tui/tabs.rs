//! Tabbed field group.

use ratatui::text::{Line, Span};

use crate::tui::{
    colors::Theme,
    enums::{AppEvent, FieldCmd},
    field::Field,
    input::key_name,
};

/// A field showing one of several child fields at a time.
///
/// Every `Field` call is delegated to the selected child. While not editing,
/// left/right (h/l) switch tabs, wrapping around at both ends.
pub struct Tabs {
    label: String,
    labels: Vec<String>,
    fields: Vec<Box<dyn Field>>,
    selected: usize,
    focused: bool,
}

impl Tabs {
    /// # Panics
    ///
    /// Panics when `labels` and `fields` differ in length or are empty.
    pub fn new(label: &str, labels: &[&str], fields: Vec<Box<dyn Field>>) -> Self {
        assert_eq!(
            labels.len(),
            fields.len(),
            "number of tab labels must match number of fields"
        );
        assert!(!fields.is_empty(), "a tab group needs at least one tab");
        Tabs {
            label: label.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            fields,
            selected: 0,
            focused: false,
        }
    }

    /// Show tab `index`. Out of range indexes are ignored.
    pub fn select(&mut self, index: usize) -> Option<FieldCmd> {
        if index >= self.fields.len() || index == self.selected {
            return None;
        }
        if let Some(child) = self.fields.get_mut(self.selected) {
            child.blur();
        }
        self.selected = index;
        if self.focused {
            self.fields.get_mut(index).and_then(|child| child.focus())
        } else {
            None
        }
    }

    fn next(&mut self) -> Option<FieldCmd> {
        self.select((self.selected + 1) % self.fields.len())
    }

    fn prev(&mut self) -> Option<FieldCmd> {
        self.select((self.selected + self.fields.len() - 1) % self.fields.len())
    }

    fn child(&self) -> Option<&dyn Field> {
        self.fields.get(self.selected).map(|f| f.as_ref())
    }

    fn child_mut(&mut self) -> Option<&mut Box<dyn Field>> {
        self.fields.get_mut(self.selected)
    }
}

impl Field for Tabs {
    fn label(&self) -> &str {
        &self.label
    }

    fn terminator(&self) -> Option<&'static str> {
        self.child().and_then(|c| c.terminator())
    }

    fn focus(&mut self) -> Option<FieldCmd> {
        self.focused = true;
        self.child_mut().and_then(|c| c.focus())
    }

    fn blur(&mut self) {
        self.focused = false;
        if let Some(child) = self.child_mut() {
            child.blur();
        }
    }

    fn begin_edit(&mut self) -> Option<FieldCmd> {
        self.child_mut().and_then(|c| c.begin_edit())
    }

    fn commit(&mut self) {
        if let Some(child) = self.child_mut() {
            child.commit();
        }
    }

    fn handle_input(&mut self, event: &AppEvent) -> Option<FieldCmd> {
        if !self.is_editing() {
            if let AppEvent::Key(key) = event {
                match key_name(key).as_str() {
                    "left" | "h" => return self.prev(),
                    "right" | "l" => return self.next(),
                    _ => {}
                }
            }
        }
        self.child_mut().and_then(|c| c.handle_input(event))
    }

    fn render(&self, label_width: usize, theme: &Theme) -> Vec<Line<'static>> {
        let strip: Vec<Span<'static>> = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let style = if i == self.selected && self.focused {
                    theme.tab_active
                } else {
                    theme.tab_inactive
                };
                Span::styled(format!(" {label} "), style)
            })
            .collect();

        let mut lines = vec![Line::from(strip)];
        if let Some(child) = self.child() {
            lines.extend(child.render(label_width, theme));
        }
        lines
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn is_editing(&self) -> bool {
        self.child().is_some_and(|c| c.is_editing())
    }

    fn value(&self) -> String {
        self.child().map(|c| c.value()).unwrap_or_default()
    }

    fn selected_tab(&self) -> Option<usize> {
        Some(self.selected)
    }
}
