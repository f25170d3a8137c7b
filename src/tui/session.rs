//! Data shared by every screen and kept across transitions.

use std::sync::Arc;

use crate::backend::{Backend, QuerySpec};
use crate::tui::screen::Effect;
use crate::work_item::WorkItem;

/// Session state owned by the application shell.
///
/// Screens are replaced wholesale on navigation, so anything that must
/// survive a transition (the user, fetched items, local edits) lives here.
pub struct Session {
    pub user: String,
    pub backend: Arc<dyn Backend>,
    /// Filters applied on top of the user to every fetch.
    pub query: QuerySpec,
    pub width: u16,
    pub height: u16,
    pub items: Vec<WorkItem>,
    pub last_error: Option<String>,
    next_generation: u64,
}

impl Session {
    pub fn new(backend: Arc<dyn Backend>, query: QuerySpec, width: u16, height: u16) -> Self {
        Session {
            user: String::new(),
            backend,
            query,
            width,
            height,
            items: Vec::new(),
            last_error: None,
            next_generation: 0,
        }
    }

    /// Describe a fetch of the current user's items under a fresh generation number.
    pub fn begin_fetch(&mut self) -> Effect {
        self.next_generation += 1;
        let spec = QuerySpec {
            assignee: Some(self.user.clone()),
            ..self.query.clone()
        };
        tracing::info!(user = %self.user, generation = self.next_generation, "fetching work items");
        Effect::Fetch {
            generation: self.next_generation,
            spec,
        }
    }

    /// Replace the collection entry with the same id as `item`.
    pub fn write_back(&mut self, item: &WorkItem) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => *slot = item.clone(),
            None => tracing::warn!(id = item.id, "edited item is not in the backlog"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::demo_session;
    use super::*;
    use crate::work_item::fixtures::item;

    #[test]
    fn generations_increase_and_carry_the_user() {
        let mut session = demo_session();
        session.user = "john".to_string();
        session.query.state = Some("Active".to_string());

        let Effect::Fetch { generation: first, spec } = session.begin_fetch() else {
            panic!("expected a fetch");
        };
        assert_eq!(spec.assignee.as_deref(), Some("john"));
        assert_eq!(spec.state.as_deref(), Some("Active"));

        let Effect::Fetch { generation: second, .. } = session.begin_fetch() else {
            panic!("expected a fetch");
        };
        assert!(second > first);
    }

    #[test]
    fn write_back_replaces_matching_item() {
        let mut session = demo_session();
        session.items = vec![item(1, "a", "old"), item(2, "b", "keep")];
        session.write_back(&item(1, "a", "new"));
        assert_eq!(session.items[0].description, "new");
        assert_eq!(session.items[1].description, "keep");
    }
}
