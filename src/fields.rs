//! Enumerations and fixed option lists for work items.
//!
//! This module defines the work item types known to the tracking service and the
//! option sets offered by the detail form's selectors.

use serde::{Deserialize, Serialize};

/// Backlog hierarchy, from the broadest item down to individual defects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WorkItemType {
    Initiative,
    Requirement,
    #[serde(rename = "User Story")]
    UserStory,
    Task,
    Bug,
}

impl WorkItemType {
    /// Name as the tracking service spells it.
    pub fn display_name(self) -> &'static str {
        match self {
            WorkItemType::Initiative => "Initiative",
            WorkItemType::Requirement => "Requirement",
            WorkItemType::UserStory => "User Story",
            WorkItemType::Task => "Task",
            WorkItemType::Bug => "Bug",
        }
    }

    /// Parse the service's type name. Unknown names fall back to `Task`.
    pub fn from_service_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "initiative" | "epic" => WorkItemType::Initiative,
            "requirement" | "feature" => WorkItemType::Requirement,
            "user story" | "product backlog item" => WorkItemType::UserStory,
            "bug" => WorkItemType::Bug,
            _ => WorkItemType::Task,
        }
    }
}

impl std::fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lifecycle states offered by the State selector.
pub const STATE_OPTIONS: [&str; 4] = ["New", "Active", "Resolved", "Closed"];

/// Priorities offered by the Priority selector.
pub const PRIORITY_OPTIONS: [&str; 4] = ["1", "2", "3", "4"];

/// Placeholder shown for an empty assignee.
pub const UNASSIGNED: &str = "Unassigned";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_story_uses_service_spelling() {
        assert_eq!(WorkItemType::UserStory.to_string(), "User Story");
        let json = serde_json::to_string(&WorkItemType::UserStory).unwrap();
        assert_eq!(json, "\"User Story\"");
    }

    #[test]
    fn service_names_map_to_types() {
        assert_eq!(WorkItemType::from_service_name("User Story"), WorkItemType::UserStory);
        assert_eq!(WorkItemType::from_service_name("bug"), WorkItemType::Bug);
        assert_eq!(WorkItemType::from_service_name("Epic"), WorkItemType::Initiative);
        assert_eq!(WorkItemType::from_service_name("Something Else"), WorkItemType::Task);
    }
}
