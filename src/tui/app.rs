//! Application shell for the terminal user interface.
//!
//! `App` owns the current screen and the session. It turns every event from
//! the loop into at most one screen transition and hands side effects back to
//! the caller, which runs them off the event loop.

use std::mem;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::tui::{
    colors::{Theme, YELLOW},
    enums::AppEvent,
    input::is_quit_key,
    login::LoginScreen,
    screen::{Effect, Screen, Transition},
    session::Session,
};

/// Main application state for the terminal user interface.
pub struct App {
    pub screen: Screen,
    pub session: Session,
    theme: Theme,
    pub should_quit: bool,
    /// Set once the blink ticker has been requested.
    blinking: bool,
}

impl App {
    /// Start on the login screen, pre-filled with `user`.
    pub fn new(session: Session, theme: Theme, user: &str) -> Self {
        App {
            screen: Screen::Login(LoginScreen::new(user)),
            session,
            theme,
            should_quit: false,
            blinking: false,
        }
    }

    /// Apply one event. Returns the side effect the loop must run, if any.
    pub fn handle_event(&mut self, event: AppEvent) -> Option<Effect> {
        match event {
            AppEvent::Resize { width, height } => {
                self.session.width = width;
                self.session.height = height;
                if let Screen::Detail(detail) = &mut self.screen {
                    detail.relayout(&self.session);
                }
                None
            }
            AppEvent::Fetched { generation, result } => {
                match &mut self.screen {
                    Screen::Backlog(backlog) => backlog.apply_fetch(generation, result, &mut self.session),
                    other => tracing::debug!(generation, screen = other.name(), "dropping fetch result"),
                }
                None
            }
            AppEvent::Key(key) if is_quit_key(&key) => {
                if self.screen.is_editing() {
                    tracing::debug!("quit ignored while editing");
                } else {
                    self.should_quit = true;
                }
                None
            }
            event => self.dispatch(&event),
        }
    }

    fn dispatch(&mut self, event: &AppEvent) -> Option<Effect> {
        let screen = mem::take(&mut self.screen);
        let from = screen.name();
        let effect = match screen.update(event, &mut self.session) {
            Transition::Screen(next) => {
                self.screen = next;
                None
            }
            Transition::Effect(next, effect) => {
                self.screen = next;
                self.admit(effect)
            }
            Transition::Quit => {
                self.should_quit = true;
                None
            }
        };
        if from != self.screen.name() {
            tracing::debug!(from, to = self.screen.name(), "screen transition");
        }
        effect
    }

    /// The ticker only ever needs to start once.
    fn admit(&mut self, effect: Effect) -> Option<Effect> {
        match effect {
            Effect::StartBlink if self.blinking => None,
            Effect::StartBlink => {
                self.blinking = true;
                Some(Effect::StartBlink)
            }
            fetch => Some(fetch),
        }
    }

    /// Render the status bar with the screen's key help in its accent color.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let mut status_text = format!(" {} ", self.session.backend.name());
        if !self.session.user.is_empty() {
            status_text.push_str(&format!("| {} ", self.session.user));
        }
        status_text.push_str(&format!("| {}", self.screen.help()));

        let accent = self.screen.accent();
        let text_color = match accent {
            YELLOW => Color::Rgb(20, 20, 20),
            _ => Color::White,
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(accent).fg(text_color))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function: the current screen above a one-line status bar.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.screen.render(f, chunks[0], &self.session, &self.theme);
        self.render_status_bar(f, chunks[1]);
    }
}
