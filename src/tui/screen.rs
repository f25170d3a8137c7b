//! Screen state machine.
//!
//! Each screen owns its view-local state and consumes itself on every event,
//! returning the next screen. Navigation is therefore a plain transition
//! function and nothing inside a discarded screen survives it.

use ratatui::{layout::Rect, style::Color, Frame};

use crate::backend::QuerySpec;
use crate::tui::{
    backlog::BacklogScreen,
    colors::{type_color, Theme, VIOLET},
    detail::{DetailScreen, EditScreen},
    enums::AppEvent,
    login::LoginScreen,
    session::Session,
};

pub enum Screen {
    Login(LoginScreen),
    Backlog(BacklogScreen),
    Detail(DetailScreen),
    Edit(EditScreen),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Login(LoginScreen::new(""))
    }
}

/// Result of feeding one event to a screen.
pub enum Transition {
    /// Continue with this screen (possibly the same one).
    Screen(Screen),
    /// Continue with this screen and run a side effect.
    Effect(Screen, Effect),
    Quit,
}

/// Side effect a transition asks the event loop to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Query the backend off the event loop and report back as `AppEvent::Fetched`.
    Fetch { generation: u64, spec: QuerySpec },
    /// Start the cursor blink ticker.
    StartBlink,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login(_) => "login",
            Screen::Backlog(_) => "backlog",
            Screen::Detail(_) => "detail",
            Screen::Edit(_) => "edit",
        }
    }

    /// True while some field is consuming keystrokes.
    pub fn is_editing(&self) -> bool {
        match self {
            Screen::Detail(detail) => detail.is_editing(),
            Screen::Edit(_) => true,
            Screen::Login(_) | Screen::Backlog(_) => false,
        }
    }

    pub fn update(self, event: &AppEvent, session: &mut Session) -> Transition {
        match self {
            Screen::Login(login) => login.update(event, session),
            Screen::Backlog(backlog) => backlog.update(event, session),
            Screen::Detail(detail) => detail.update(event, session),
            Screen::Edit(edit) => edit.update(event, session),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
        match self {
            Screen::Login(login) => login.render(frame, area, session, theme),
            Screen::Backlog(backlog) => backlog.render(frame, area, session, theme),
            Screen::Detail(detail) => detail.render(frame, area, session, theme),
            Screen::Edit(edit) => edit.render(frame, area, theme),
        }
    }

    /// Status bar color: the item's type color while one is open.
    pub fn accent(&self) -> Color {
        match self {
            Screen::Detail(detail) => type_color(detail.item().kind),
            Screen::Edit(edit) => type_color(edit.item().kind),
            Screen::Login(_) | Screen::Backlog(_) => VIOLET,
        }
    }

    /// Key help for the status bar.
    pub fn help(&self) -> &'static str {
        match self {
            Screen::Login(_) => "enter: continue  esc: quit",
            Screen::Backlog(_) => "j/k: move  enter: open  r: refresh  esc: back  q: quit",
            Screen::Detail(detail) if detail.is_editing() => "ctrl+s/esc: finish editing",
            Screen::Detail(_) => {
                "j/k: field  enter: edit  h/l: tab  e: edit description  pgup/pgdn: scroll  esc: back  q: quit"
            }
            Screen::Edit(_) => "ctrl+s: save  esc: cancel",
        }
    }
}
