//! Key naming and single-line input handling for the terminal user interface.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};

use crate::tui::colors::Theme;

/// Canonical name for a key press: "enter", "esc", "ctrl+s", "left", "j", "G".
///
/// Fields compare these names against their terminator, so the mapping must be
/// stable across terminals.
pub fn key_name(key: &KeyEvent) -> String {
    let base = match key.code {
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pgup".to_string(),
        KeyCode::PageDown => "pgdown".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => return "shift+tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return String::new(),
    };

    let mut name = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("alt+");
    }
    // Shifted characters already carry their case.
    if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
        name.push_str("shift+");
    }
    name.push_str(&base);
    name
}

/// The global quit combination.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// A text input field with cursor position and active state management.
#[derive(Debug, Clone)]
pub struct InputField {
    pub value: String,
    /// Cursor position in characters.
    pub cursor: usize,
    pub active: bool,
    pub limit: usize,
    pub placeholder: String,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new(placeholder: &str, limit: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            active: false,
            limit,
            placeholder: placeholder.to_string(),
        }
    }

    /// Create an input field with initial text value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.chars().take(self.limit).collect();
        self.cursor = self.value.chars().count();
        self
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        if self.value.chars().count() >= self.limit {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Move cursor one position to the left.
    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor one position to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    /// Apply an editing key. Returns false for keys the field does not use.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.handle_char(c),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => self.handle_delete(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }

    /// Render as a single line with a block cursor when active.
    pub fn render(&self, theme: &Theme) -> Line<'static> {
        let mut spans = vec![Span::styled("> ", theme.label)];
        if self.value.is_empty() {
            if self.active {
                spans.push(Span::styled(" ", theme.cursor));
            }
            spans.push(Span::styled(self.placeholder.clone(), theme.help));
            return Line::from(spans);
        }

        let before: String = self.value.chars().take(self.cursor).collect();
        let at: String = self.value.chars().skip(self.cursor).take(1).collect();
        let after: String = self.value.chars().skip(self.cursor + 1).collect();
        spans.push(Span::styled(before, theme.value));
        if self.active {
            let at = if at.is_empty() { " ".to_string() } else { at };
            spans.push(Span::styled(at, theme.cursor));
        } else {
            spans.push(Span::styled(at, theme.value));
        }
        spans.push(Span::styled(after, theme.value));
        Line::from(spans)
    }
}


#[cfg(test)]
mod tests {
    use super::keys::*;
    use super::*;

    #[test]
    fn key_names_are_canonical() {
        assert_eq!(key_name(&code(KeyCode::Enter)), "enter");
        assert_eq!(key_name(&code(KeyCode::Esc)), "esc");
        assert_eq!(key_name(&code(KeyCode::Left)), "left");
        assert_eq!(key_name(&ch('j')), "j");
        assert_eq!(key_name(&ctrl('s')), "ctrl+s");
        assert_eq!(key_name(&ch(' ')), "space");
        assert_eq!(key_name(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)), "G");
    }

    #[test]
    fn ctrl_c_is_the_quit_key() {
        assert!(is_quit_key(&ctrl('c')));
        assert!(!is_quit_key(&ch('c')));
        assert!(!is_quit_key(&ch('q')));
    }

    #[test]
    fn input_respects_limit() {
        let mut input = InputField::new("Username", 3);
        for c in "john".chars() {
            input.handle_char(c);
        }
        assert_eq!(input.value, "joh");
    }

    #[test]
    fn input_edits_in_the_middle() {
        let mut input = InputField::new("", 32).with_value("jhn");
        input.move_cursor_left();
        input.move_cursor_left();
        input.handle_char('o');
        assert_eq!(input.value, "john");
        input.handle_key(&code(KeyCode::End));
        input.handle_backspace();
        assert_eq!(input.value, "joh");
    }

    #[test]
    fn input_handles_multibyte_characters() {
        let mut input = InputField::new("", 32).with_value("zoë");
        input.handle_backspace();
        input.handle_char('e');
        assert_eq!(input.value, "zoe");
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut input = InputField::new("", 32);
        assert!(!input.handle_key(&ctrl('s')));
        assert!(input.value.is_empty());
    }
}
