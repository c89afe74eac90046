//! Display ordering for lists and todos.
//!
//! Entries are partitioned into not-done and done first, then each partition
//! is sorted by lower-cased title. The partition boundary is never crossed,
//! whatever the titles are. Both steps are stable, so entries with equal
//! titles keep their insertion order.

use std::cmp::Ordering;

use crate::todo::Todo;
use crate::todo_list::TodoList;

/// Anything that can be ordered for display.
pub trait Sortable {
    fn is_done(&self) -> bool;
    fn title(&self) -> &str;
}

impl Sortable for Todo {
    fn is_done(&self) -> bool {
        Todo::is_done(self)
    }

    fn title(&self) -> &str {
        Todo::title(self)
    }
}

impl Sortable for TodoList {
    fn is_done(&self) -> bool {
        TodoList::is_done(self)
    }

    fn title(&self) -> &str {
        TodoList::title(self)
    }
}

fn compare_by_title<T: Sortable>(a: &&T, b: &&T) -> Ordering {
    a.title().to_lowercase().cmp(&b.title().to_lowercase())
}

pub fn sort_by_status_then_title<'a, T, I>(items: I) -> Vec<&'a T>
where
    T: Sortable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let (mut undone, mut done): (Vec<&T>, Vec<&T>) =
        items.into_iter().partition(|item| !item.is_done());
    undone.sort_by(compare_by_title);
    done.sort_by(compare_by_title);
    undone.extend(done);
    undone
}

pub fn sort_todo_lists(lists: &[TodoList]) -> Vec<&TodoList> {
    sort_by_status_then_title(lists)
}

pub fn sort_todos(todos: &[Todo]) -> Vec<&Todo> {
    sort_by_status_then_title(todos)
}
