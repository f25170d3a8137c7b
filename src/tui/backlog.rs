//! Backlog list screen: a table of the user's work items.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::error::BacklogError;
use crate::tui::{
    colors::{type_color, Theme},
    detail::DetailScreen,
    enums::AppEvent,
    input::key_name,
    login::LoginScreen,
    screen::{Effect, Screen, Transition},
    session::Session,
    utils::{table_widths, wrap_text},
};
use crate::work_item::{truncate, WorkItem};

pub struct BacklogScreen {
    table: TableState,
    /// Generation of the outstanding fetch, if any.
    pending: Option<u64>,
}

impl BacklogScreen {
    /// A list waiting for fetch `generation`.
    pub fn loading(generation: u64) -> Self {
        BacklogScreen {
            table: TableState::default(),
            pending: Some(generation),
        }
    }

    /// A list over already fetched items with row `index` selected.
    pub fn with_selection(index: usize, session: &Session) -> Self {
        let mut table = TableState::default();
        if !session.items.is_empty() {
            table.select(Some(index.min(session.items.len() - 1)));
        }
        BacklogScreen { table, pending: None }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn selected(&self) -> Option<usize> {
        self.table.selected()
    }

    /// Apply a fetch result. Results for any generation but the outstanding one
    /// are dropped. Failures leave an empty list and keep the message.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        result: Result<Vec<WorkItem>, BacklogError>,
        session: &mut Session,
    ) {
        if self.pending != Some(generation) {
            tracing::debug!(generation, pending = ?self.pending, "ignoring stale fetch result");
            return;
        }
        self.pending = None;
        match result {
            Ok(items) => {
                tracing::info!(count = items.len(), user = %session.user, "fetched work items");
                session.items = items;
                session.last_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, user = %session.user, "fetch failed");
                session.items.clear();
                session.last_error = Some(err.to_string());
            }
        }
        self.table.select(if session.items.is_empty() { None } else { Some(0) });
    }

    fn move_selection(&mut self, down: bool, len: usize) {
        if len == 0 {
            return;
        }
        let current = self.table.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table.select(Some(next));
    }

    pub fn update(mut self, event: &AppEvent, session: &mut Session) -> Transition {
        let AppEvent::Key(key) = event else {
            return Transition::Screen(Screen::Backlog(self));
        };

        match key_name(key).as_str() {
            "q" => Transition::Quit,
            "esc" => Transition::Screen(Screen::Login(LoginScreen::new(""))),
            "down" | "j" => {
                self.move_selection(true, session.items.len());
                Transition::Screen(Screen::Backlog(self))
            }
            "up" | "k" => {
                self.move_selection(false, session.items.len());
                Transition::Screen(Screen::Backlog(self))
            }
            "r" => {
                let effect = session.begin_fetch();
                if let Effect::Fetch { generation, .. } = &effect {
                    self.pending = Some(*generation);
                }
                Transition::Effect(Screen::Backlog(self), effect)
            }
            "enter" if !self.is_loading() => {
                let Some(index) = self.table.selected() else {
                    return Transition::Screen(Screen::Backlog(self));
                };
                match session.items.get(index) {
                    Some(item) => {
                        tracing::debug!(id = item.id, "opening work item");
                        Transition::Screen(Screen::Detail(DetailScreen::new(item.clone(), index, session)))
                    }
                    None => Transition::Screen(Screen::Backlog(self)),
                }
            }
            _ => Transition::Screen(Screen::Backlog(self)),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let title = Paragraph::new(Line::from(Span::styled(
            format!("Work Items for {}", session.user),
            theme.title,
        )));
        frame.render_widget(title, chunks[0]);

        if self.is_loading() {
            frame.render_widget(
                Paragraph::new(Span::styled("Loading work items...", theme.help)),
                chunks[1],
            );
            return;
        }

        if session.items.is_empty() {
            let mut lines = vec![Line::from(Span::styled(
                "No work items found for this user.",
                theme.value,
            ))];
            if let Some(err) = &session.last_error {
                lines.push(Line::default());
                for line in wrap_text(err, chunks[1].width.max(1) as usize) {
                    lines.push(Line::from(Span::styled(line, theme.editing)));
                }
            }
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
            return;
        }

        let widths = table_widths(session.width);
        let header = Row::new(["ID", "Type", "Title", "Assigned To", "State", "Priority"])
            .style(theme.header);
        let rows = session.items.iter().map(|item| {
            Row::new(vec![
                Cell::from(item.id.to_string()),
                Cell::from(item.kind.display_name()).style(Style::default().fg(type_color(item.kind))),
                Cell::from(truncate(&item.title, widths[2] as usize)),
                Cell::from(item.assignee_label().to_string()),
                Cell::from(item.state.clone()),
                Cell::from(item.priority.to_string()),
            ])
        });

        let table = Table::new(rows, widths.map(Constraint::Length))
            .header(header)
            .block(Block::default().borders(Borders::ALL).border_style(theme.help))
            .row_highlight_style(theme.selected_row);
        frame.render_stateful_widget(table, chunks[1], &mut self.table);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::backend::{Backend, QuerySpec};
    use crate::tui::input::keys::*;
    use crate::tui::session::fixtures::demo_session;

    fn loaded(session: &mut Session) -> BacklogScreen {
        session.user = "john".to_string();
        let items = session.backend.query(&QuerySpec::for_user("john"));
        let mut screen = BacklogScreen::loading(7);
        screen.apply_fetch(7, items, session);
        screen
    }

    fn step(screen: BacklogScreen, session: &mut Session, key: AppEvent) -> BacklogScreen {
        match screen.update(&key, session) {
            Transition::Screen(Screen::Backlog(screen)) => screen,
            _ => panic!("left the backlog"),
        }
    }

    #[test]
    fn successful_fetch_selects_the_first_row() {
        let mut session = demo_session();
        let screen = loaded(&mut session);
        assert!(!screen.is_loading());
        assert_eq!(session.items.len(), 4);
        assert_eq!(screen.selected(), Some(0));
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut session = demo_session();
        let mut screen = BacklogScreen::loading(2);
        screen.apply_fetch(1, Ok(vec![crate::work_item::fixtures::item(1, "t", "d")]), &mut session);
        assert!(screen.is_loading());
        assert!(session.items.is_empty());
    }

    #[test]
    fn failure_shows_no_items_and_keeps_the_error() {
        let mut session = demo_session();
        let mut screen = BacklogScreen::loading(1);
        let err = BacklogError::Status { status: 401, body: "unauthorized".to_string() };
        screen.apply_fetch(1, Err(err), &mut session);
        assert!(session.items.is_empty());
        assert!(session.last_error.as_deref().is_some_and(|e| e.contains("401")));
        assert_eq!(screen.selected(), None);
    }

    #[test]
    fn selection_clamps() {
        let mut session = demo_session();
        let mut screen = loaded(&mut session);
        screen = step(screen, &mut session, AppEvent::Key(ch('k')));
        assert_eq!(screen.selected(), Some(0));
        for _ in 0..10 {
            screen = step(screen, &mut session, AppEvent::Key(ch('j')));
        }
        assert_eq!(screen.selected(), Some(3));
    }

    #[test]
    fn enter_opens_the_selected_item() {
        let mut session = demo_session();
        let mut screen = loaded(&mut session);
        screen = step(screen, &mut session, AppEvent::Key(code(KeyCode::Down)));
        match screen.update(&AppEvent::Key(code(KeyCode::Enter)), &mut session) {
            Transition::Screen(Screen::Detail(detail)) => assert_eq!(detail.item().id, 1002),
            _ => panic!("expected the detail screen"),
        }
    }

    #[test]
    fn enter_while_loading_does_nothing() {
        let mut session = demo_session();
        let screen = step(BacklogScreen::loading(1), &mut session, AppEvent::Key(code(KeyCode::Enter)));
        assert!(screen.is_loading());
    }

    #[test]
    fn refresh_issues_a_new_generation() {
        let mut session = demo_session();
        let screen = loaded(&mut session);
        match screen.update(&AppEvent::Key(ch('r')), &mut session) {
            Transition::Effect(Screen::Backlog(screen), Effect::Fetch { generation, .. }) => {
                assert!(screen.is_loading());
                assert_eq!(screen.pending, Some(generation));
            }
            _ => panic!("expected a refetch"),
        }
    }

    #[test]
    fn modified_letters_are_not_commands() {
        let mut session = demo_session();
        let screen = loaded(&mut session);
        let alt_q = AppEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT));
        let screen = step(screen, &mut session, alt_q);
        let screen = step(screen, &mut session, AppEvent::Key(ctrl('r')));
        assert!(!screen.is_loading());
        assert_eq!(screen.selected(), Some(0));
    }

    #[test]
    fn escape_returns_to_an_empty_login() {
        let mut session = demo_session();
        let screen = loaded(&mut session);
        match screen.update(&AppEvent::Key(code(KeyCode::Esc)), &mut session) {
            Transition::Screen(Screen::Login(login)) => assert_eq!(login.value(), ""),
            _ => panic!("expected login"),
        }
    }

    #[test]
    fn renders_rows_into_the_buffer() {
        let mut session = demo_session();
        let mut screen = loaded(&mut session);
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area(), &session, &theme))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Work Items for john"));
        assert!(text.contains("1001"));
        assert!(text.contains("Initiative"));
    }
}
