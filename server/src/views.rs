//! Request bodies and the JSON documents each page renders to.

use serde::{Deserialize, Serialize};
use todo_core::{sort_todos, Flash, ListId, Session, Todo, TodoId, TodoList};

/// Body of the new-list and edit-list forms.
#[derive(Debug, Deserialize)]
pub struct ListForm {
    #[serde(rename = "todoListTitle", default)]
    pub todo_list_title: String,
}

/// Body of the new-todo form on a list page.
#[derive(Debug, Deserialize)]
pub struct TodoForm {
    #[serde(rename = "todoTitle", default)]
    pub todo_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: ListId,
    pub title: String,
    pub done: bool,
    pub size: usize,
    pub done_count: usize,
}

impl From<&TodoList> for ListSummary {
    fn from(list: &TodoList) -> Self {
        Self {
            id: list.id(),
            title: list.title().to_string(),
            done: list.is_done(),
            size: list.size(),
            done_count: list.count_done(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    pub id: TodoId,
    pub title: String,
    pub done: bool,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id(),
            title: todo.title().to_string(),
            done: todo.is_done(),
        }
    }
}

/// `GET /lists`: every list, not-done first, then by title.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListsView {
    pub lists: Vec<ListSummary>,
    pub flash: Vec<Flash>,
}

impl ListsView {
    pub fn render(session: &Session, flash: Vec<Flash>) -> Self {
        Self {
            lists: session.sorted_lists().into_iter().map(ListSummary::from).collect(),
            flash,
        }
    }
}

/// `GET /lists/{id}`, also re-rendered when a new todo fails validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListView {
    pub list: ListSummary,
    pub todos: Vec<TodoView>,
    pub flash: Vec<Flash>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// The rejected todo title, as submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_title: Option<String>,
}

impl ListView {
    pub fn render(list: &TodoList, flash: Vec<Flash>) -> Self {
        Self {
            list: ListSummary::from(list),
            todos: sort_todos(list.todos()).into_iter().map(TodoView::from).collect(),
            flash,
            errors: Vec::new(),
            todo_title: None,
        }
    }

    pub fn with_rejected_todo(mut self, submitted: String, errors: Vec<String>) -> Self {
        self.todo_title = Some(submitted);
        self.errors = errors;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    NewList,
    EditList,
}

/// The new-list and edit-list forms.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListFormView {
    pub form: FormKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
    #[serde(rename = "todoListTitle")]
    pub todo_list_title: String,
    #[serde(default)]
    pub errors: Vec<String>,
    pub flash: Vec<Flash>,
}

impl ListFormView {
    pub fn new_list(todo_list_title: String, errors: Vec<String>, flash: Vec<Flash>) -> Self {
        Self {
            form: FormKind::NewList,
            list_id: None,
            todo_list_title,
            errors,
            flash,
        }
    }

    pub fn edit_list(
        list_id: ListId,
        todo_list_title: String,
        errors: Vec<String>,
        flash: Vec<Flash>,
    ) -> Self {
        Self {
            form: FormKind::EditList,
            list_id: Some(list_id),
            todo_list_title,
            errors,
            flash,
        }
    }
}
