//! Domain model for the todos service.
//!
//! # Overview
//! Todo lists, their todos, display ordering, title validation and the
//! per-client `Session` that holds them. Nothing here performs I/O; the
//! server crate loads a `Session` per request, calls into it and saves it.
//!
//! # Design
//! - Ids are `u64` values handed out by monotonic counters: one per session
//!   for lists, one per list for todos.
//! - Entity operations are total or return `TodoError`; lookups that miss
//!   are explicit not-found errors rather than silent no-ops.
//! - Stored sessions are re-validated on load (see `session`).

pub mod error;
pub mod session;
pub mod sort;
pub mod todo;
pub mod todo_list;
pub mod validation;

pub use error::TodoError;
pub use session::{Flash, FlashKind, Session};
pub use sort::{sort_by_status_then_title, sort_todo_lists, sort_todos, Sortable};
pub use todo::{Todo, TodoId};
pub use todo_list::{ListId, TodoList, ToggleOutcome};
pub use validation::{validate_title, validate_unique_title, TitleKind, ValidationErrors, MAX_TITLE_LEN};
