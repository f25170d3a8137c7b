//! Backend query collaborators.
//!
//! The terminal UI only ever asks one question of the tracking service:
//! "which work items match this filter?". `Backend` is that seam. The demo
//! implementation serves a fixed data set so the UI works without credentials.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::Result;
use crate::fields::WorkItemType;
use crate::work_item::{Comment, WorkItem};

/// Filter for a work item query. Every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub assignee: Option<String>,
    pub state: Option<String>,
    pub iteration: Option<String>,
    pub area: Option<String>,
}

impl QuerySpec {
    /// A query for everything assigned to `user`.
    pub fn for_user(user: &str) -> Self {
        QuerySpec {
            assignee: Some(user.to_string()),
            ..QuerySpec::default()
        }
    }

    /// Check a work item against every populated filter.
    pub fn matches(&self, item: &WorkItem) -> bool {
        fn eq(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f.eq_ignore_ascii_case(value))
        }
        eq(&self.assignee, &item.assigned_to)
            && eq(&self.state, &item.state)
            && eq(&self.iteration, &item.iteration_path)
            && eq(&self.area, &item.area_path)
    }
}

/// Source of work items. Called from worker threads, never from the event loop.
pub trait Backend: Send + Sync {
    /// Short name for logs and the status bar.
    fn name(&self) -> &'static str;

    /// Run a query and return the matching items in backlog order.
    fn query(&self, spec: &QuerySpec) -> Result<Vec<WorkItem>>;
}

/// In-memory backend with a handful of users and items.
#[derive(Debug, Clone)]
pub struct DemoBackend {
    items: Vec<WorkItem>,
}

/// Users that have items in the demo data set.
pub const DEMO_USERS: [&str; 4] = ["john", "sarah", "mike", "emma"];

impl DemoBackend {
    pub fn new() -> Self {
        DemoBackend { items: demo_items() }
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for DemoBackend {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn query(&self, spec: &QuerySpec) -> Result<Vec<WorkItem>> {
        Ok(self.items.iter().filter(|i| spec.matches(i)).cloned().collect())
    }
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap_or_default()
}

fn comment(author: &str, when: DateTime<Utc>, content: &str) -> Comment {
    Comment {
        author: author.to_string(),
        created_at: when,
        content: content.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: u64,
    kind: WorkItemType,
    title: &str,
    assigned_to: &str,
    state: &str,
    priority: u8,
    description: &str,
    created_by: &str,
    created_at: DateTime<Utc>,
    tags: &[&str],
    area_path: &str,
    iteration_path: &str,
    comments: Vec<Comment>,
) -> WorkItem {
    WorkItem {
        id,
        kind,
        title: title.to_string(),
        assigned_to: assigned_to.to_string(),
        state: state.to_string(),
        priority,
        description: description.to_string(),
        acceptance_criteria: String::new(),
        created_by: created_by.to_string(),
        created_at,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        area_path: area_path.to_string(),
        iteration_path: iteration_path.to_string(),
        comments,
    }
}

fn demo_items() -> Vec<WorkItem> {
    use WorkItemType::*;

    let mut items = vec![
        item(
            1001, Initiative, "Implement new authentication system", "john", "In Progress", 1,
            "Modernize our authentication system to support OAuth2, SAML, and social logins. \
             This initiative will improve security and user experience.",
            "alice", at(2024, 1, 15, 9, 0), &["security", "authentication", "phase-1"],
            "BacklogApp\\Backend\\Security", "Sprint 23",
            vec![
                comment("alice", at(2024, 1, 15, 9, 30), "Created this initiative to track our auth modernization efforts. Let's aim to complete this by end of Q1."),
                comment("john", at(2024, 1, 16, 14, 20), "Started working on the OAuth2 implementation. Will need help with the UI components."),
                comment("mike", at(2024, 1, 17, 10, 15), "I can help with the frontend once you have the API ready!"),
            ],
        ),
        item(
            1002, UserStory, "Add OAuth2 login support", "john", "Active", 1,
            "As a user, I want to log in using my Google or GitHub account so that I don't \
             have to remember another password.",
            "alice", at(2024, 1, 16, 10, 0), &["oauth2", "user-story"],
            "BacklogApp\\Backend\\Auth", "Sprint 23",
            vec![
                comment("alice", at(2024, 1, 16, 11, 0), "This should integrate with Google and GitHub OAuth providers initially."),
                comment("john", at(2024, 1, 18, 15, 45), "Google OAuth is working! GitHub integration next."),
            ],
        ),
        item(
            1003, Task, "Create login page UI", "john", "Done", 2,
            "Design and implement the new login page with OAuth buttons and traditional login form.",
            "john", at(2024, 1, 17, 8, 30), &["ui", "frontend"],
            "BacklogApp\\Frontend", "Sprint 23",
            vec![
                comment("john", at(2024, 1, 17, 9, 0), "Starting the UI work today. Using our design system components."),
                comment("sarah", at(2024, 1, 17, 16, 30), "Looks great! Make sure it's mobile responsive."),
                comment("john", at(2024, 1, 18, 17, 0), "Done! Tested on mobile and desktop."),
            ],
        ),
        item(
            1004, Bug, "Fix login redirect issue", "john", "Active", 1,
            "After successful OAuth login, users are redirected to /home instead of their \
             originally requested page. Need to preserve the redirect URL through the OAuth flow.",
            "emma", at(2024, 1, 20, 10, 0), &["bug", "oauth", "critical"],
            "BacklogApp\\Backend\\Auth", "Sprint 23",
            vec![
                comment("emma", at(2024, 1, 20, 10, 15), "Found this while testing. Steps to reproduce: 1) Navigate to /dashboard, 2) Click login, 3) Complete OAuth, 4) You end up at /home instead of /dashboard"),
                comment("john", at(2024, 1, 20, 11, 30), "Good catch! I'll fix this by storing the original URL in the session state."),
            ],
        ),
        item(
            2001, Requirement, "API rate limiting requirements", "sarah", "New", 1,
            "Define requirements for API rate limiting to protect our services from abuse and \
             ensure fair usage.",
            "alice", at(2024, 1, 10, 13, 0), &["api", "requirements"],
            "BacklogApp\\Backend\\API", "Sprint 24",
            vec![comment("alice", at(2024, 1, 10, 14, 0), "We need to define rate limits per user tier and implement proper throttling.")],
        ),
        item(
            2002, UserStory, "Implement rate limiting middleware", "sarah", "In Progress", 1,
            "As an API owner, I want to rate limit requests per user to prevent abuse and \
             ensure system stability.",
            "sarah", at(2024, 1, 12, 8, 0), &["api", "middleware"],
            "BacklogApp\\Backend\\API", "Sprint 24",
            vec![
                comment("sarah", at(2024, 1, 12, 9, 0), "Starting implementation using Redis for distributed rate limiting."),
                comment("john", at(2024, 1, 13, 10, 30), "Make sure to add proper headers for rate limit status!"),
            ],
        ),
        item(
            3001, Initiative, "Mobile app redesign", "mike", "Planning", 1,
            "Complete redesign of our mobile application with modern UI/UX patterns and \
             improved performance.",
            "alice", at(2024, 1, 5, 7, 30), &["mobile", "redesign", "ux"],
            "BacklogApp\\Mobile", "Sprint 25",
            vec![
                comment("alice", at(2024, 1, 5, 8, 0), "Let's make our mobile app shine! Focus on user experience and performance."),
                comment("mike", at(2024, 1, 6, 11, 0), "Working on the design mockups. Will share soon!"),
            ],
        ),
        item(
            4001, UserStory, "Add data export functionality", "emma", "New", 2,
            "As a user, I want to export my data in multiple formats (CSV, JSON, Excel) so I \
             can analyze it in external tools.",
            "alice", at(2024, 1, 8, 12, 0), &["export", "data"],
            "BacklogApp\\Features", "Sprint 24",
            vec![comment("alice", at(2024, 1, 8, 13, 0), "Users have been requesting this feature. Let's start with CSV.")],
        ),
    ];

    if let Some(story) = items.iter_mut().find(|i| i.id == 1002) {
        story.acceptance_criteria =
            "- Google and GitHub buttons on the login page\n- Existing password login keeps working"
                .to_string();
    }
    items
}
