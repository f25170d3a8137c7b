//! Work item data structures and related formatting.
//!
//! This module defines the `WorkItem` record fetched from the tracking service,
//! its comment thread, and the small formatting helpers shared by the CLI
//! printer and the terminal screens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{WorkItemType, UNASSIGNED};

/// A single discussion entry on a work item. Never edited once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

/// A backlog record (initiative, requirement, story, task or bug).
///
/// Only `description` and `acceptance_criteria` are ever changed locally; every
/// other field is exactly what the backend returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    pub kind: WorkItemType,
    pub title: String,
    pub assigned_to: String,
    pub state: String,
    pub priority: u8,
    pub description: String,
    #[serde(default)]
    pub acceptance_criteria: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub area_path: String,
    pub iteration_path: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl WorkItem {
    /// Header line used by the detail and edit screens.
    pub fn heading(&self) -> String {
        format!("{} #{}", self.kind, self.id)
    }

    /// Assignee for display, with a placeholder for unassigned items.
    pub fn assignee_label(&self) -> &str {
        if self.assigned_to.trim().is_empty() {
            UNASSIGNED
        } else {
            &self.assigned_to
        }
    }
}

/// Format a timestamp as the screens show it.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a creation date (no time of day).
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Render tags as a comma separated list, or "-" when there are none.
pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

/// Shorten text to `max` characters, ending in "..." when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Render a comment thread as plain text, one block per comment.
pub fn format_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments yet.".to_string();
    }
    comments
        .iter()
        .map(|c| format!("{}  {}\n{}", c.author, format_timestamp(&c.created_at), c.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    pub fn item(id: u64, title: &str, description: &str) -> WorkItem {
        WorkItem {
            id,
            kind: WorkItemType::UserStory,
            title: title.to_string(),
            assigned_to: "john".to_string(),
            state: "Active".to_string(),
            priority: 2,
            description: description.to_string(),
            acceptance_criteria: String::new(),
            created_by: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 16, 11, 0, 0).unwrap(),
            tags: vec!["oauth2".to_string()],
            area_path: "App\\Backend".to_string(),
            iteration_path: "Sprint 23".to_string(),
            comments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let text = "a".repeat(120);
        let cut = truncate(&text, 100);
        assert_eq!(cut.chars().count(), 100);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn empty_assignee_shows_placeholder() {
        let mut item = fixtures::item(1, "t", "d");
        item.assigned_to = "  ".to_string();
        assert_eq!(item.assignee_label(), UNASSIGNED);
    }

    #[test]
    fn comments_render_author_date_and_content() {
        let comments = vec![Comment {
            author: "mike".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 17, 10, 15, 0).unwrap(),
            content: "I can help".to_string(),
        }];
        assert_eq!(format_comments(&comments), "mike  2024-01-17 10:15\nI can help");
        assert_eq!(format_comments(&[]), "No comments yet.");
    }

    #[test]
    fn heading_uses_type_display_name() {
        let item = fixtures::item(1002, "Add OAuth2 login support", "");
        assert_eq!(item.heading(), "User Story #1002");
    }
}
