//! Work item detail screen and its description edit overlay.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::fields::{PRIORITY_OPTIONS, STATE_OPTIONS, UNASSIGNED};
use crate::tui::{
    backlog::BacklogScreen,
    colors::{type_color, Theme},
    enums::{AppEvent, FieldCmd, Orientation},
    field::{CommentThread, Readonly, Selector, TagList},
    form::{Form, FormEvent},
    input::key_name,
    screen::{Effect, Screen, Transition},
    session::Session,
    tabs::Tabs,
    text_area::TextArea,
    text_field::TextField,
    utils::{content_width, wrap_text},
};
use crate::work_item::{format_date, WorkItem};

/// Global order constants for the detail form fields.
pub const ASSIGNEE_GLOBAL_ORDER: usize = 0;
pub const STATE_GLOBAL_ORDER: usize = 1;
pub const PRIORITY_GLOBAL_ORDER: usize = 2;
pub const ITERATION_GLOBAL_ORDER: usize = 3;
pub const AREA_GLOBAL_ORDER: usize = 4;
pub const CREATED_BY_GLOBAL_ORDER: usize = 5;
pub const CREATED_DATE_GLOBAL_ORDER: usize = 6;
pub const TAGS_GLOBAL_ORDER: usize = 7;
pub const CONTENT_GLOBAL_ORDER: usize = 8;

/// Tabs of the content group.
pub const DESCRIPTION_TAB: usize = 0;
pub const ACCEPTANCE_TAB: usize = 1;
pub const DISCUSSION_TAB: usize = 2;

const SCROLL_STEP: u16 = 5;

/// Assignee choices: unassigned plus everyone owning an item in the backlog.
fn assignee_options(items: &[WorkItem]) -> Vec<&str> {
    let mut options = vec![UNASSIGNED];
    for item in items {
        let name = item.assigned_to.as_str();
        if !name.trim().is_empty() && !options.contains(&name) {
            options.push(name);
        }
    }
    options
}

/// Build the detail form. Text tabs wrap at `width` columns.
fn build_form(item: &WorkItem, items: &[WorkItem], tab: usize, width: usize) -> Form {
    let mut content = Tabs::new(
        "",
        &["Description", "Acceptance Criteria", "Discussion"],
        vec![
            Box::new(TextField::new("", &item.description, true).with_width(width)),
            Box::new(TextField::new("", &item.acceptance_criteria, true).with_width(width)),
            Box::new(CommentThread::new("", &item.comments, width)),
        ],
    );
    content.select(tab);

    Form::new(vec![
        Box::new(
            Selector::new("Assigned To", &assignee_options(items), Orientation::Horizontal)
                .with_selected(item.assignee_label()),
        ),
        Box::new(Selector::new("State", &STATE_OPTIONS, Orientation::Horizontal).with_selected(&item.state)),
        Box::new(
            Selector::new("Priority", &PRIORITY_OPTIONS, Orientation::Horizontal)
                .with_selected(&item.priority.to_string()),
        ),
        Box::new(Readonly::new("Iteration Path", &item.iteration_path)),
        Box::new(Readonly::new("Area Path", &item.area_path)),
        Box::new(Readonly::new("Created By", &item.created_by)),
        Box::new(Readonly::new("Created Date", &format_date(&item.created_at))),
        Box::new(TagList::new("Tags", &item.tags)),
        Box::new(content),
    ])
}

fn header_lines(prefix: &str, item: &WorkItem, width: u16) -> Vec<Line<'static>> {
    let style = Style::default().fg(type_color(item.kind)).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(format!("{prefix}{}", item.heading()), style))];
    lines.extend(
        wrap_text(&item.title, content_width(width))
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(type_color(item.kind))))),
    );
    lines.push(Line::default());
    lines
}

/// Read and edit view of one work item.
pub struct DetailScreen {
    item: WorkItem,
    /// Row of the item in the backlog, restored on the way back.
    index: usize,
    form: Form,
    scroll: u16,
}

impl DetailScreen {
    pub fn new(item: WorkItem, index: usize, session: &Session) -> Self {
        let form = build_form(&item, &session.items, DESCRIPTION_TAB, content_width(session.width));
        DetailScreen {
            item,
            index,
            form,
            scroll: 0,
        }
    }

    pub fn item(&self) -> &WorkItem {
        &self.item
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn is_editing(&self) -> bool {
        self.form.is_editing()
    }

    /// Rebuild the form from the item, keeping the focused field and tab.
    fn rebuild_form(&mut self, session: &Session) {
        let focused = self.form.focused_index();
        let tab = self
            .form
            .field(CONTENT_GLOBAL_ORDER)
            .and_then(|f| f.selected_tab())
            .unwrap_or(DESCRIPTION_TAB);
        self.form = build_form(&self.item, &session.items, tab, content_width(session.width));
        self.form.set_focus(focused);
    }

    /// Re-wrap the form for a new terminal width. Skipped mid-edit so the
    /// draft survives.
    pub fn relayout(&mut self, session: &Session) {
        if !self.form.is_editing() {
            self.rebuild_form(session);
        }
    }

    /// Copy a committed text tab into the item and the backlog.
    fn write_back(&mut self, session: &mut Session) {
        let Some(content) = self.form.field(CONTENT_GLOBAL_ORDER) else { return };
        let value = content.value();
        match content.selected_tab() {
            Some(DESCRIPTION_TAB) => self.item.description = value,
            Some(ACCEPTANCE_TAB) => self.item.acceptance_criteria = value,
            _ => return,
        }
        tracing::info!(id = self.item.id, "committed work item text");
        session.write_back(&self.item);
    }

    pub fn update(mut self, event: &AppEvent, session: &mut Session) -> Transition {
        if let AppEvent::Key(key) = event {
            if !self.form.is_editing() {
                match key_name(key).as_str() {
                    "q" => return Transition::Quit,
                    "esc" => {
                        let backlog = BacklogScreen::with_selection(self.index, session);
                        return Transition::Screen(Screen::Backlog(backlog));
                    }
                    "e" => {
                        let edit = EditScreen::new(self, session);
                        return Transition::Effect(Screen::Edit(edit), Effect::StartBlink);
                    }
                    "pgup" => {
                        self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                        return Transition::Screen(Screen::Detail(self));
                    }
                    "pgdown" => {
                        self.scroll = self.scroll.saturating_add(SCROLL_STEP);
                        return Transition::Screen(Screen::Detail(self));
                    }
                    _ => {}
                }
            }
        }

        match self.form.update(event) {
            Some(FormEvent::Committed(CONTENT_GLOBAL_ORDER)) => {
                self.write_back(session);
                Transition::Screen(Screen::Detail(self))
            }
            Some(FormEvent::Cmd(FieldCmd::Blink)) => Transition::Effect(Screen::Detail(self), Effect::StartBlink),
            _ => Transition::Screen(Screen::Detail(self)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
        let mut lines = header_lines("", &self.item, session.width);
        lines.extend(self.form.render(theme));

        let max_scroll = lines.len().saturating_sub(area.height as usize) as u16;
        let paragraph = Paragraph::new(lines).scroll((self.scroll.min(max_scroll), 0));
        frame.render_widget(paragraph, area);
    }
}

/// Full-width description editor over a detail screen.
///
/// Saving writes the buffer into the item and the backlog; cancelling drops it.
pub struct EditScreen {
    detail: Box<DetailScreen>,
    buffer: TextArea,
}

impl EditScreen {
    pub fn new(detail: DetailScreen, session: &Session) -> Self {
        let width = content_width(session.width).saturating_sub(2).max(10);
        let height = (session.height as usize).saturating_sub(10).max(3);
        let mut buffer = TextArea::new(&detail.item.description, width, height);
        buffer.focus();
        tracing::debug!(id = detail.item.id, "editing description");
        EditScreen {
            detail: Box::new(detail),
            buffer,
        }
    }

    pub fn item(&self) -> &WorkItem {
        &self.detail.item
    }

    pub fn buffer_text(&self) -> String {
        self.buffer.text()
    }

    pub fn update(mut self, event: &AppEvent, session: &mut Session) -> Transition {
        if let AppEvent::Key(key) = event {
            match key_name(key).as_str() {
                "ctrl+s" => {
                    let mut detail = *self.detail;
                    detail.item.description = self.buffer.text();
                    session.write_back(&detail.item);
                    detail.rebuild_form(session);
                    tracing::info!(id = detail.item.id, "saved description");
                    return Transition::Screen(Screen::Detail(detail));
                }
                "esc" => {
                    tracing::debug!(id = self.detail.item.id, "discarded description edit");
                    return Transition::Screen(Screen::Detail(*self.detail));
                }
                _ => {}
            }
        }
        self.buffer.handle_input(event);
        Transition::Screen(Screen::Edit(self))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let header = header_lines("EDITING: ", &self.detail.item, area.width);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header.len() as u16), Constraint::Min(3)])
            .split(area);

        frame.render_widget(Paragraph::new(header), chunks[0]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.editing)
            .title(" Description ");
        frame.render_widget(Paragraph::new(self.buffer.render(theme)).block(block), chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::backend::{Backend, QuerySpec};
    use crate::tui::input::keys::*;
    use crate::tui::session::fixtures::demo_session;
    use crate::work_item::fixtures::item;

    fn detail_with(session: &mut Session, description: &str) -> DetailScreen {
        session.items = vec![item(7, "Story", description), item(8, "Other", "x")];
        DetailScreen::new(session.items[0].clone(), 0, session)
    }

    fn key(code_: KeyCode) -> AppEvent {
        AppEvent::Key(code(code_))
    }

    fn as_detail(transition: Transition) -> DetailScreen {
        match transition {
            Transition::Screen(Screen::Detail(detail)) | Transition::Effect(Screen::Detail(detail), _) => detail,
            _ => panic!("expected the detail screen"),
        }
    }

    fn as_edit(transition: Transition) -> EditScreen {
        match transition {
            Transition::Screen(Screen::Edit(edit)) | Transition::Effect(Screen::Edit(edit), _) => edit,
            _ => panic!("expected the edit overlay"),
        }
    }

    fn type_into_edit(mut edit: EditScreen, session: &mut Session, text: &str) -> EditScreen {
        for c in text.chars() {
            edit = as_edit(edit.update(&AppEvent::Key(ch(c)), session));
        }
        edit
    }

    #[test]
    fn form_lists_every_field_in_order() {
        let mut session = demo_session();
        let detail = detail_with(&mut session, "d");
        let form = detail.form();
        assert_eq!(form.len(), 9);
        assert_eq!(form.focused_index(), ASSIGNEE_GLOBAL_ORDER);
        assert_eq!(form.field(ASSIGNEE_GLOBAL_ORDER).map(|f| f.value()), Some("john".to_string()));
        assert_eq!(form.field(STATE_GLOBAL_ORDER).map(|f| f.value()), Some("Active".to_string()));
        assert_eq!(form.field(PRIORITY_GLOBAL_ORDER).map(|f| f.value()), Some("2".to_string()));
        assert_eq!(form.field(TAGS_GLOBAL_ORDER).map(|f| f.value()), Some("oauth2".to_string()));
        assert_eq!(
            form.field(CONTENT_GLOBAL_ORDER).and_then(|f| f.selected_tab()),
            Some(DESCRIPTION_TAB)
        );
    }

    #[test]
    fn edit_overlay_saves_into_item_and_backlog() {
        let mut session = demo_session();
        let detail = detail_with(&mut session, "original");
        let edit = as_edit(detail.update(&AppEvent::Key(ch('e')), &mut session));
        let edit = type_into_edit(edit, &mut session, "  updated");
        let detail = as_detail(edit.update(&AppEvent::Key(ctrl('s')), &mut session));

        assert_eq!(detail.item().description, "original  updated");
        assert_eq!(session.items[0].description, "original  updated");
        assert_eq!(
            detail.form().field(CONTENT_GLOBAL_ORDER).map(|f| f.value()),
            Some("original  updated".to_string())
        );
    }

    #[test]
    fn edit_overlay_escape_discards() {
        let mut session = demo_session();
        let detail = detail_with(&mut session, "original");
        let edit = as_edit(detail.update(&AppEvent::Key(ch('e')), &mut session));
        let edit = type_into_edit(edit, &mut session, "junk");
        assert_eq!(edit.buffer_text(), "originaljunk");
        let detail = as_detail(edit.update(&key(KeyCode::Esc), &mut session));
        assert_eq!(detail.item().description, "original");
        assert_eq!(session.items[0].description, "original");
    }

    #[test]
    fn opening_the_overlay_requests_blink() {
        let mut session = demo_session();
        let detail = detail_with(&mut session, "d");
        let transition = detail.update(&AppEvent::Key(ch('e')), &mut session);
        assert!(matches!(transition, Transition::Effect(Screen::Edit(_), Effect::StartBlink)));
    }

    #[test]
    fn form_commit_on_description_tab_writes_back() {
        let mut session = demo_session();
        let mut detail = detail_with(&mut session, "base");
        detail.form.set_focus(CONTENT_GLOBAL_ORDER);
        detail = as_detail(detail.update(&key(KeyCode::Enter), &mut session));
        assert!(detail.is_editing());
        detail = as_detail(detail.update(&AppEvent::Key(ch('!')), &mut session));
        detail = as_detail(detail.update(&AppEvent::Key(ctrl('s')), &mut session));
        assert!(!detail.is_editing());
        assert_eq!(detail.item().description, "base!");
        assert_eq!(session.items[0].description, "base!");
    }

    #[test]
    fn form_commit_on_acceptance_tab_writes_back() {
        let mut session = demo_session();
        let mut detail = detail_with(&mut session, "base");
        detail.form.set_focus(CONTENT_GLOBAL_ORDER);
        detail = as_detail(detail.update(&key(KeyCode::Right), &mut session));
        detail = as_detail(detail.update(&key(KeyCode::Enter), &mut session));
        detail = as_detail(detail.update(&AppEvent::Key(ch('A')), &mut session));
        detail = as_detail(detail.update(&key(KeyCode::Esc), &mut session));
        assert_eq!(detail.item().acceptance_criteria, "A");
        assert_eq!(detail.item().description, "base");
        assert_eq!(session.items[0].acceptance_criteria, "A");
    }

    #[test]
    fn keys_are_text_while_the_form_edits() {
        let mut session = demo_session();
        let mut detail = detail_with(&mut session, "");
        detail.form.set_focus(CONTENT_GLOBAL_ORDER);
        detail = as_detail(detail.update(&key(KeyCode::Enter), &mut session));
        for c in "qe".chars() {
            detail = as_detail(detail.update(&AppEvent::Key(ch(c)), &mut session));
        }
        detail = as_detail(detail.update(&key(KeyCode::Esc), &mut session));
        assert_eq!(detail.item().description, "qe");
    }

    #[test]
    fn escape_returns_to_the_same_row() {
        let mut session = demo_session();
        session.items = vec![item(1, "a", ""), item(2, "b", ""), item(3, "c", "")];
        let detail = DetailScreen::new(session.items[2].clone(), 2, &session);
        match detail.update(&key(KeyCode::Esc), &mut session) {
            Transition::Screen(Screen::Backlog(backlog)) => assert_eq!(backlog.selected(), Some(2)),
            _ => panic!("expected the backlog"),
        }
    }

    #[test]
    fn q_quits_when_not_editing() {
        let mut session = demo_session();
        let detail = detail_with(&mut session, "");
        assert!(matches!(detail.update(&AppEvent::Key(ch('q')), &mut session), Transition::Quit));
    }

    #[test]
    fn page_keys_scroll() {
        let mut session = demo_session();
        let mut detail = detail_with(&mut session, "");
        detail = as_detail(detail.update(&key(KeyCode::PageDown), &mut session));
        assert_eq!(detail.scroll, SCROLL_STEP);
        detail = as_detail(detail.update(&key(KeyCode::PageUp), &mut session));
        detail = as_detail(detail.update(&key(KeyCode::PageUp), &mut session));
        assert_eq!(detail.scroll, 0);
    }

    fn rendered_text(detail: &DetailScreen, session: &Session, width: u16, height: u16) -> String {
        use ratatui::{backend::TestBackend, Terminal};

        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| detail.render(frame, frame.area(), session, &theme))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn long_description_wraps_to_the_terminal() {
        let mut session = demo_session();
        session.width = 80;
        session.height = 60;
        session.items = session.backend.query(&QuerySpec::for_user("john")).unwrap();
        let item = session.items.iter().find(|i| i.id == 1001).cloned().unwrap();
        let detail = DetailScreen::new(item, 0, &session);

        let text = rendered_text(&detail, &session, 80, 60);
        assert!(text.contains("user experience."));
        assert!(text.contains("security"));
    }

    #[test]
    fn relayout_rewraps_for_the_new_width() {
        let mut session = demo_session();
        let long = "word ".repeat(30);
        let mut detail = detail_with(&mut session, long.trim_end());
        session.width = 40;
        detail.relayout(&session);
        let text = rendered_text(&detail, &session, 40, 60);
        assert!(text.lines().all(|l| !l.trim_end().ends_with("wor")));
        assert!(text.lines().filter(|l| l.trim() == "word word word word word word word").count() >= 3);
    }

    #[test]
    fn discussion_tab_shows_comment_authors() {
        let mut session = demo_session();
        session.items = session.backend.query(&QuerySpec::for_user("john")).unwrap();
        let item = session.items.iter().find(|i| i.id == 1001).cloned().unwrap();
        let mut detail = DetailScreen::new(item, 0, &session);
        detail.form.set_focus(CONTENT_GLOBAL_ORDER);
        detail = as_detail(detail.update(&key(KeyCode::Left), &mut session));
        assert_eq!(
            detail.form().field(CONTENT_GLOBAL_ORDER).and_then(|f| f.selected_tab()),
            Some(DISCUSSION_TAB)
        );

        let text = rendered_text(&detail, &session, 100, 60);
        assert!(text.contains("alice  2024-01-15 09:30"));
        assert!(text.contains("mike  2024-01-17 10:15"));
    }

    #[test]
    fn unknown_assignee_is_still_selectable() {
        let items = [item(1, "a", "")];
        let options = assignee_options(&items);
        assert_eq!(options, vec![UNASSIGNED, "john"]);
    }
}
