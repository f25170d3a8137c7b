//! Color constants and the shared theme for the terminal user interface.

use ratatui::style::{Color, Modifier, Style};

use crate::fields::WorkItemType;

// These support branded views of the UI
// reflecting the type of the item on screen

/// Used for Initiatives
pub const ORANGE: Color = Color::Indexed(208);
/// Used for Requirements
pub const PURPLE: Color = Color::Indexed(97);
/// Used for User Stories
pub const CYAN: Color = Color::Indexed(38);
/// Used for Tasks
pub const YELLOW: Color = Color::Indexed(220);
/// Used for Bugs
pub const RED: Color = Color::Indexed(161);

/// Primary accent (titles, header background).
pub const VIOLET: Color = Color::Rgb(125, 86, 244);
/// Help text.
pub const GRAY: Color = Color::Rgb(98, 98, 98);
/// Labels and comment authors.
pub const CYAN_GREEN: Color = Color::Indexed(86);
/// Selected row and tab background.
pub const PURPLE_BG: Color = Color::Indexed(57);
/// Tag foreground.
pub const LIGHT_YELLOW: Color = Color::Indexed(229);
/// Tag background.
pub const DARK_GRAY: Color = Color::Indexed(237);
/// Timestamps.
pub const DATE_GRAY: Color = Color::Indexed(241);
/// Edit highlight.
pub const EDIT_YELLOW: Color = Color::Indexed(226);

/// Color for a work item type.
pub fn type_color(kind: WorkItemType) -> Color {
    match kind {
        WorkItemType::Initiative => ORANGE,
        WorkItemType::Requirement => PURPLE,
        WorkItemType::UserStory => CYAN,
        WorkItemType::Task => YELLOW,
        WorkItemType::Bug => RED,
    }
}

/// Every style the renderers use. Built once at startup and only ever borrowed.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub help: Style,
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub tag: Style,
    pub focused: Style,
    pub editing: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub option_active: Style,
    pub option_inactive: Style,
    pub comment_author: Style,
    pub comment_date: Style,
    pub selected_row: Style,
    pub cursor: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            title: Style::default().fg(VIOLET).add_modifier(Modifier::BOLD),
            help: Style::default().fg(GRAY),
            header: Style::default()
                .fg(Color::White)
                .bg(PURPLE_BG)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(CYAN_GREEN).add_modifier(Modifier::BOLD),
            value: Style::default().fg(Color::White),
            tag: Style::default().fg(LIGHT_YELLOW).bg(DARK_GRAY),
            focused: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            editing: Style::default().fg(EDIT_YELLOW).add_modifier(Modifier::BOLD),
            tab_active: Style::default()
                .fg(Color::White)
                .bg(PURPLE_BG)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(GRAY),
            option_active: Style::default().fg(CYAN_GREEN).add_modifier(Modifier::BOLD),
            option_inactive: Style::default().fg(GRAY),
            comment_author: Style::default().fg(CYAN_GREEN).add_modifier(Modifier::BOLD),
            comment_date: Style::default().fg(DATE_GRAY),
            selected_row: Style::default().fg(LIGHT_YELLOW).bg(PURPLE_BG),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}
