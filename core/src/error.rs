//! Error types for the todo domain.
//!
//! # Design
//! Lookups that miss get dedicated variants because the routing layer maps
//! every one of them to a not-found response. Rejected titles are not errors
//! at this level (see `validation`). Storage round-trips land in
//! `SerializationError` / `DeserializationError` with the serde message.

use thiserror::Error;

use crate::todo::TodoId;
use crate::todo_list::ListId;

#[derive(Debug, Error)]
pub enum TodoError {
    /// No list with this id exists in the session.
    #[error("todo list {0} not found")]
    ListNotFound(ListId),

    /// The list exists but holds no todo with this id.
    #[error("todo {todo_id} not found in list {list_id}")]
    TodoNotFound { list_id: ListId, todo_id: TodoId },

    #[error("index {index} out of range for list of {len} todos")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("todo id {0} already present in list")]
    DuplicateTodoId(TodoId),

    /// A counter reached `u64::MAX`; no further ids can be handed out.
    #[error("no {0} ids left to assign")]
    IdsExhausted(&'static str),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// Stored session data was malformed or broke a model invariant.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl TodoError {
    /// True for every "the thing you asked for does not exist" variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TodoError::ListNotFound(_)
                | TodoError::TodoNotFound { .. }
                | TodoError::IndexOutOfRange { .. }
        )
    }
}
