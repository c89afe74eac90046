//! A single task item.

use serde::{Deserialize, Serialize};

/// Identifier of a todo, unique within its owning list.
pub type TodoId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    id: TodoId,
    title: String,
    #[serde(default)]
    done: bool,
}

impl Todo {
    /// A new, not-done todo. Ids come from the owning list's counter, see
    /// `TodoList::create_todo`.
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_undone(&mut self) {
        self.done = false;
    }

    /// Flip the done flag and return the new state.
    pub fn toggle(&mut self) -> bool {
        if self.done {
            self.mark_undone();
        } else {
            self.mark_done();
        }
        self.done
    }
}
