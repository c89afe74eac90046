//! Per-client state: the ordered todo lists plus pending flash messages.
//!
//! # Design
//! A `Session` is loaded whole, mutated and saved whole on every request.
//! List ids come from the session's own counter. Loading goes through
//! `RawSession` so a stored blob that breaks an invariant is rejected as a
//! `DeserializationError` instead of producing a half-valid value.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::sort::sort_todo_lists;
use crate::todo_list::{successor, ListId, TodoList};
use crate::validation::{validate_title, validate_unique_title, TitleKind, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    /// Neutral notices, such as a todo going back to not done.
    Info,
}

/// A one-shot message shown by the next rendered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSession")]
pub struct Session {
    lists: Vec<TodoList>,
    next_list_id: ListId,
    flash: Vec<Flash>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            next_list_id: 1,
            flash: Vec::new(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session pre-populated with a few demo lists.
    pub fn seeded() -> Self {
        Self::demo_lists().unwrap_or_default()
    }

    fn demo_lists() -> Result<Self, TodoError> {
        let mut session = Self::new();

        let id = session.create_list("Work Todos")?;
        let list = session.find_list_mut(id)?;
        let coffee = list.create_todo("Get coffee")?.id();
        list.create_todo("Chat with co-workers")?;
        list.create_todo("Duck out of meeting")?;
        if let Some(todo) = list.find_by_id_mut(coffee) {
            todo.mark_done();
        }

        let id = session.create_list("Home Todos")?;
        let list = session.find_list_mut(id)?;
        list.create_todo("Feed the cats")?;
        list.create_todo("Go to bed")?;
        list.create_todo("Buy milk")?;
        list.create_todo("Water the plants")?;
        list.mark_all_done();

        let id = session.create_list("Additional Todos")?;
        let list = session.find_list_mut(id)?;
        list.create_todo("Buy more milk")?;

        session.create_list("social todos")?;
        Ok(session)
    }

    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn sorted_lists(&self) -> Vec<&TodoList> {
        sort_todo_lists(&self.lists)
    }

    /// Append a new list with the next free id and return that id. The
    /// title must already be validated.
    pub fn create_list(&mut self, title: impl Into<String>) -> Result<ListId, TodoError> {
        let id = self.next_list_id;
        self.next_list_id = successor(id, "list")?;
        self.lists.push(TodoList::new(id, title));
        Ok(id)
    }

    pub fn find_list(&self, id: ListId) -> Result<&TodoList, TodoError> {
        self.lists
            .iter()
            .find(|list| list.id() == id)
            .ok_or(TodoError::ListNotFound(id))
    }

    pub fn find_list_mut(&mut self, id: ListId) -> Result<&mut TodoList, TodoError> {
        self.lists
            .iter_mut()
            .find(|list| list.id() == id)
            .ok_or(TodoError::ListNotFound(id))
    }

    pub fn remove_list(&mut self, id: ListId) -> Result<TodoList, TodoError> {
        let index = self
            .lists
            .iter()
            .position(|list| list.id() == id)
            .ok_or(TodoError::ListNotFound(id))?;
        Ok(self.lists.remove(index))
    }

    pub fn validate_new_list_title(&self, raw: &str) -> Result<String, ValidationErrors> {
        validate_unique_title(raw, TitleKind::List, self.lists.iter().map(TodoList::title))
    }

    /// Validate a new title for list `id`; the list's own current title does
    /// not count as taken.
    pub fn validate_list_rename(&self, id: ListId, raw: &str) -> Result<String, ValidationErrors> {
        let others = self
            .lists
            .iter()
            .filter(|list| list.id() != id)
            .map(TodoList::title);
        validate_unique_title(raw, TitleKind::List, others)
    }

    pub fn validate_todo_title(&self, raw: &str) -> Result<String, ValidationErrors> {
        validate_title(raw, TitleKind::Todo)
    }

    pub fn flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flash.push(Flash {
            kind,
            message: message.into(),
        });
    }

    /// Drain the pending flash messages.
    pub fn take_flash(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flash)
    }

    pub fn to_json(&self) -> Result<String, TodoError> {
        serde_json::to_string(self).map_err(|e| TodoError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, TodoError> {
        serde_json::from_str(json).map_err(|e| TodoError::DeserializationError(e.to_string()))
    }
}

#[derive(Deserialize)]
struct RawSession {
    #[serde(default)]
    lists: Vec<TodoList>,
    next_list_id: Option<ListId>,
    #[serde(default)]
    flash: Vec<Flash>,
}

impl TryFrom<RawSession> for Session {
    type Error = TodoError;

    fn try_from(raw: RawSession) -> Result<Self, Self::Error> {
        let mut ids = HashSet::new();
        let mut titles = HashSet::new();
        for list in &raw.lists {
            if !ids.insert(list.id()) {
                return Err(TodoError::DeserializationError(format!(
                    "duplicate list id {}",
                    list.id()
                )));
            }
            if !titles.insert(list.title()) {
                return Err(TodoError::DeserializationError(format!(
                    "duplicate list title {:?}",
                    list.title()
                )));
            }
        }

        let mut floor = 1;
        for list in &raw.lists {
            let next = successor(list.id(), "list").map_err(|_| {
                TodoError::DeserializationError(format!(
                    "list id {} leaves no room for the list counter",
                    list.id()
                ))
            })?;
            floor = floor.max(next);
        }
        let next_list_id = match raw.next_list_id {
            Some(next) if next < floor || next == ListId::MAX => {
                return Err(TodoError::DeserializationError(format!(
                    "list counter {next} is out of range"
                )))
            }
            Some(next) => next,
            None => floor,
        };

        Ok(Session {
            lists: raw.lists,
            next_list_id,
            flash: raw.flash,
        })
    }
}
