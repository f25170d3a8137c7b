//! Multi-line text buffer used by the text editor field.
//!
//! The buffer keeps one `String` per line and a character based cursor
//! (`cursor_x` column, `cursor_y` row). Lines longer than the width are
//! soft-wrapped into several screen rows; scrolling counts screen rows. It only
//! reacts to input while focused.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};

use crate::tui::{
    colors::Theme,
    enums::{AppEvent, FieldCmd},
};

#[derive(Debug, Clone)]
pub struct TextArea {
    lines: Vec<String>,
    cursor_x: usize,
    cursor_y: usize,
    scroll_y: usize,
    width: usize,
    height: usize,
    focused: bool,
    cursor_visible: bool,
}

impl TextArea {
    /// Create a buffer holding `text`, cursor at the end.
    pub fn new(text: &str, width: usize, height: usize) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let cursor_y = lines.len() - 1;
        let cursor_x = lines[cursor_y].chars().count();
        let mut area = TextArea {
            lines,
            cursor_x,
            cursor_y,
            scroll_y: 0,
            width: width.max(1),
            height: height.max(1),
            focused: false,
            cursor_visible: true,
        };
        area.keep_cursor_in_view();
        area
    }

    /// Current contents, lines joined with '\n'.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn focus(&mut self) -> Option<FieldCmd> {
        self.focused = true;
        self.cursor_visible = true;
        Some(FieldCmd::Blink)
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Cursor as (column, row), in characters.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Consume one event. Keys are ignored unless the buffer is focused.
    pub fn handle_input(&mut self, event: &AppEvent) -> Option<FieldCmd> {
        match event {
            AppEvent::Tick => {
                if self.focused {
                    self.cursor_visible = !self.cursor_visible;
                }
                None
            }
            AppEvent::Key(key) if self.focused => {
                self.handle_key(key);
                self.cursor_visible = true;
                None
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => self.cursor_x = 0,
            KeyCode::End => self.cursor_x = self.line_len(self.cursor_y),
            _ => {}
        }
        self.keep_cursor_in_view();
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    /// Byte offset of the cursor in its line.
    fn byte_at_cursor(&self) -> usize {
        let line = &self.lines[self.cursor_y];
        line.char_indices()
            .nth(self.cursor_x)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_at_cursor();
        self.lines[self.cursor_y].insert(at, c);
        self.cursor_x += 1;
    }

    fn insert_newline(&mut self) {
        let at = self.byte_at_cursor();
        let rest = self.lines[self.cursor_y].split_off(at);
        self.lines.insert(self.cursor_y + 1, rest);
        self.cursor_y += 1;
        self.cursor_x = 0;
    }

    fn backspace(&mut self) {
        if self.cursor_x > 0 {
            self.cursor_x -= 1;
            let at = self.byte_at_cursor();
            self.lines[self.cursor_y].remove(at);
        } else if self.cursor_y > 0 {
            // Join with the previous line
            let line = self.lines.remove(self.cursor_y);
            self.cursor_y -= 1;
            self.cursor_x = self.line_len(self.cursor_y);
            self.lines[self.cursor_y].push_str(&line);
        }
    }

    fn delete(&mut self) {
        if self.cursor_x < self.line_len(self.cursor_y) {
            let at = self.byte_at_cursor();
            self.lines[self.cursor_y].remove(at);
        } else if self.cursor_y + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_y + 1);
            self.lines[self.cursor_y].push_str(&next);
        }
    }

    fn move_left(&mut self) {
        if self.cursor_x > 0 {
            self.cursor_x -= 1;
        } else if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = self.line_len(self.cursor_y);
        }
    }

    fn move_right(&mut self) {
        if self.cursor_x < self.line_len(self.cursor_y) {
            self.cursor_x += 1;
        } else if self.cursor_y + 1 < self.lines.len() {
            self.cursor_y += 1;
            self.cursor_x = 0;
        }
    }

    fn move_up(&mut self) {
        if self.cursor_y > 0 {
            self.cursor_y -= 1;
            self.cursor_x = self.cursor_x.min(self.line_len(self.cursor_y));
        }
    }

    fn move_down(&mut self) {
        if self.cursor_y + 1 < self.lines.len() {
            self.cursor_y += 1;
            self.cursor_x = self.cursor_x.min(self.line_len(self.cursor_y));
        }
    }

    /// Screen rows taken by a line. A line filling the width exactly gets an
    /// extra row so the cursor after its last character has somewhere to go.
    fn rows_for(&self, row: usize) -> usize {
        self.line_len(row) / self.width + 1
    }

    fn cursor_row(&self) -> usize {
        (0..self.cursor_y).map(|row| self.rows_for(row)).sum::<usize>() + self.cursor_x / self.width
    }

    fn keep_cursor_in_view(&mut self) {
        let row = self.cursor_row();
        if row < self.scroll_y {
            self.scroll_y = row;
        } else if row >= self.scroll_y + self.height {
            self.scroll_y = row + 1 - self.height;
        }
    }

    /// Render the visible window of wrapped rows.
    pub fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        let style = if self.focused { theme.editing } else { theme.value };
        let show_cursor = self.focused && self.cursor_visible;

        let mut rows: Vec<(String, Option<usize>)> = Vec::new();
        for (row, line) in self.lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            for part in 0..self.rows_for(row) {
                let start = part * self.width;
                let text: String = chars.iter().skip(start).take(self.width).collect();
                let cursor = (show_cursor && row == self.cursor_y && self.cursor_x / self.width == part)
                    .then(|| self.cursor_x - start);
                rows.push((text, cursor));
            }
        }

        rows.into_iter()
            .skip(self.scroll_y)
            .take(self.height)
            .map(|(text, cursor)| {
                let Some(col) = cursor else {
                    return Line::from(Span::styled(text, style));
                };
                let chars: Vec<char> = text.chars().collect();
                let before: String = chars.iter().take(col).collect();
                let at: String = chars.get(col).map_or(" ".to_string(), |c| c.to_string());
                let after: String = chars.iter().skip(col + 1).collect();
                Line::from(vec![
                    Span::styled(before, style),
                    Span::styled(at, theme.cursor),
                    Span::styled(after, style),
                ])
            })
            .collect()
    }
}
