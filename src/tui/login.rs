//! Login screen: asks for the user whose backlog to load.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::backend::DEMO_USERS;
use crate::tui::{
    backlog::BacklogScreen,
    colors::Theme,
    enums::AppEvent,
    input::InputField,
    screen::{Effect, Screen, Transition},
    session::Session,
    utils::centered_rect,
};

/// Longest accepted user identifier.
pub const USER_LIMIT: usize = 32;

pub struct LoginScreen {
    input: InputField,
    hint: Option<&'static str>,
}

impl LoginScreen {
    /// A login screen with the input focused and pre-filled with `user`.
    pub fn new(user: &str) -> Self {
        let mut input = InputField::new("Username", USER_LIMIT).with_value(user);
        input.active = true;
        LoginScreen { input, hint: None }
    }

    pub fn value(&self) -> &str {
        &self.input.value
    }

    pub fn update(mut self, event: &AppEvent, session: &mut Session) -> Transition {
        let AppEvent::Key(key) = event else {
            return Transition::Screen(Screen::Login(self));
        };

        match key.code {
            KeyCode::Esc => Transition::Quit,
            KeyCode::Enter => {
                let user = self.input.value.trim();
                if user.is_empty() {
                    self.hint = Some("Enter a username to continue.");
                    return Transition::Screen(Screen::Login(self));
                }
                session.user = user.to_string();
                let effect = session.begin_fetch();
                let generation = match &effect {
                    Effect::Fetch { generation, .. } => *generation,
                    Effect::StartBlink => 0,
                };
                Transition::Effect(Screen::Backlog(BacklogScreen::loading(generation)), effect)
            }
            _ => {
                if self.input.handle_key(key) {
                    self.hint = None;
                }
                Transition::Screen(Screen::Login(self))
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
        let popup = centered_rect(60, 50, area);

        let mut lines = vec![
            Line::from(Span::styled("Work Backlog", theme.title)),
            Line::default(),
            Line::from(Span::styled("Enter your username:", theme.label)),
            self.input.render(theme),
            Line::default(),
        ];
        if let Some(hint) = self.hint {
            lines.push(Line::from(Span::styled(hint, theme.editing)));
            lines.push(Line::default());
        }
        if session.backend.name() == "demo" {
            lines.push(Line::from(Span::styled(
                format!("Demo users: {}", DEMO_USERS.join(", ")),
                theme.help,
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.title)
            .title(" Login ");
        frame.render_widget(
            Paragraph::new(lines).block(block).alignment(Alignment::Left),
            popup,
        );
    }
}
