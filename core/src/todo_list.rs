//! A titled, ordered collection of todos.
//!
//! # Design
//! Each list owns a monotonic counter for the ids of its todos, so ids stay
//! unique after removals and never depend on the current length. Stored
//! lists go through `RawTodoList` and are checked before a `TodoList` value
//! exists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::todo::{Todo, TodoId};
use crate::validation::is_well_formed;

/// Identifier of a list, unique within its session.
pub type ListId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTodoList")]
pub struct TodoList {
    id: ListId,
    title: String,
    todos: Vec<Todo>,
    next_todo_id: TodoId,
}

/// Result of toggling a todo through its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub title: String,
    pub done: bool,
}

impl TodoList {
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
            next_todo_id: 1,
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title. Length and uniqueness are the caller's to check.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn size(&self) -> usize {
        self.todos.len()
    }

    pub fn count_done(&self) -> usize {
        self.todos.iter().filter(|todo| todo.is_done()).count()
    }

    pub fn remaining(&self) -> usize {
        self.size() - self.count_done()
    }

    /// An empty list is never done.
    pub fn is_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(Todo::is_done)
    }

    /// Build a todo with the next free id and append it.
    pub fn create_todo(&mut self, title: impl Into<String>) -> Result<&Todo, TodoError> {
        let id = self.next_todo_id;
        self.next_todo_id = successor(id, "todo")?;
        self.todos.push(Todo::new(id, title));
        Ok(&self.todos[self.todos.len() - 1])
    }

    /// Append an existing todo, keeping insertion order.
    pub fn add(&mut self, todo: Todo) -> Result<(), TodoError> {
        if self.find_by_id(todo.id()).is_some() {
            return Err(TodoError::DuplicateTodoId(todo.id()));
        }
        self.next_todo_id = self.next_todo_id.max(successor(todo.id(), "todo")?);
        self.todos.push(todo);
        Ok(())
    }

    pub fn find_by_id(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id() == id)
    }

    pub fn index_of(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id() == id)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Todo, TodoError> {
        if index >= self.todos.len() {
            return Err(TodoError::IndexOutOfRange {
                index,
                len: self.todos.len(),
            });
        }
        Ok(self.todos.remove(index))
    }

    pub fn remove_by_id(&mut self, id: TodoId) -> Result<Todo, TodoError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| self.todo_not_found(id))?;
        self.remove_at(index)
    }

    pub fn toggle_todo(&mut self, id: TodoId) -> Result<ToggleOutcome, TodoError> {
        let not_found = self.todo_not_found(id);
        let todo = self.find_by_id_mut(id).ok_or(not_found)?;
        let done = todo.toggle();
        Ok(ToggleOutcome {
            title: todo.title().to_string(),
            done,
        })
    }

    pub fn mark_all_done(&mut self) {
        self.todos.iter_mut().for_each(Todo::mark_done);
    }

    fn todo_not_found(&self, todo_id: TodoId) -> TodoError {
        TodoError::TodoNotFound {
            list_id: self.id,
            todo_id,
        }
    }
}

/// The id after `id`. Counters never reach `u64::MAX`, so a stored
/// counter of that value is always corrupt.
pub(crate) fn successor(id: u64, kind: &'static str) -> Result<u64, TodoError> {
    id.checked_add(1)
        .filter(|next| *next != u64::MAX)
        .ok_or(TodoError::IdsExhausted(kind))
}

/// Shape of a list as stored in the session, before its invariants are
/// checked.
#[derive(Deserialize)]
struct RawTodoList {
    id: ListId,
    title: String,
    #[serde(default)]
    todos: Vec<Todo>,
    next_todo_id: Option<TodoId>,
}

impl TryFrom<RawTodoList> for TodoList {
    type Error = TodoError;

    fn try_from(raw: RawTodoList) -> Result<Self, Self::Error> {
        if !is_well_formed(&raw.title) {
            return Err(TodoError::DeserializationError(format!(
                "list {} has a malformed title",
                raw.id
            )));
        }

        let mut seen = HashSet::new();
        for todo in &raw.todos {
            if !seen.insert(todo.id()) {
                return Err(TodoError::DeserializationError(format!(
                    "list {} holds duplicate todo id {}",
                    raw.id,
                    todo.id()
                )));
            }
            if !is_well_formed(todo.title()) {
                return Err(TodoError::DeserializationError(format!(
                    "todo {} in list {} has a malformed title",
                    todo.id(),
                    raw.id
                )));
            }
        }

        let mut floor = 1;
        for todo in &raw.todos {
            let next = successor(todo.id(), "todo").map_err(|_| {
                TodoError::DeserializationError(format!(
                    "todo id {} in list {} leaves no room for its counter",
                    todo.id(),
                    raw.id
                ))
            })?;
            floor = floor.max(next);
        }
        let next_todo_id = match raw.next_todo_id {
            Some(next) if next < floor || next == TodoId::MAX => {
                return Err(TodoError::DeserializationError(format!(
                    "list {} counter {next} is out of range",
                    raw.id
                )))
            }
            Some(next) => next,
            None => floor,
        };

        Ok(TodoList {
            id: raw.id,
            title: raw.title,
            todos: raw.todos,
            next_todo_id,
        })
    }
}
