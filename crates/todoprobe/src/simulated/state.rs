//! Todo list model behind the simulated app.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key the list is persisted under
pub const STORAGE_KEY: &str = "todos-todoprobe";

/// One todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable identifier
    pub id: u64,
    /// Display text
    pub title: String,
    /// Completion state
    pub completed: bool,
}

/// Which items the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not completed
    Active,
    /// Completed items
    Completed,
}

impl Filter {
    /// Every filter in the order the footer lists them
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Filter selected by a URL fragment (`#/active`, ...)
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.trim_start_matches('#') {
            "/active" => Self::Active,
            "/completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Link target
    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::All => "#/",
            Self::Active => "#/active",
            Self::Completed => "#/completed",
        }
    }

    /// Whether an item is shown under this filter
    #[must_use]
    pub const fn shows(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        })
    }
}

/// Ordered todo list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoStore {
    todos: Vec<Todo>,
    next_id: u64,
}

impl TodoStore {
    /// Restore from persisted JSON; unreadable data yields an empty list
    #[must_use]
    pub fn restore(json: Option<&str>) -> Self {
        let todos: Vec<Todo> = json
            .and_then(|j| serde_json::from_str(j).ok())
            .unwrap_or_default();
        let next_id = todos.iter().map(|t| t.id + 1).max().unwrap_or(0);
        Self { todos, next_id }
    }

    /// Serialize for storage
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.todos)
    }

    /// All items in list order
    #[must_use]
    pub fn items(&self) -> &[Todo] {
        &self.todos
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of items not completed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Number of completed items
    #[must_use]
    pub fn completed(&self) -> usize {
        self.todos.len() - self.remaining()
    }

    /// Whether every item is completed (false for an empty list)
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.remaining() == 0
    }

    /// Insert a new item at the end (or the front) of the list
    pub fn add(&mut self, title: String, at_front: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let todo = Todo {
            id,
            title,
            completed: false,
        };
        if at_front {
            self.todos.insert(0, todo);
        } else {
            self.todos.push(todo);
        }
        id
    }

    /// Look up an item
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Flip one item's completion state
    pub fn toggle(&mut self, id: u64) {
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = !todo.completed;
        }
    }

    /// Set every item's completion state
    pub fn set_all(&mut self, completed: bool) {
        for todo in &mut self.todos {
            todo.completed = completed;
        }
    }

    /// Replace an item's text
    pub fn rename(&mut self, id: u64, title: String) {
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            todo.title = title;
        }
    }

    /// Remove one item
    pub fn remove(&mut self, id: u64) {
        self.todos.retain(|t| t.id != id);
    }

    /// Remove every completed item
    pub fn clear_completed(&mut self) {
        self.todos.retain(|t| !t.completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_in_order() {
        let mut list = TodoStore::default();
        list.add("a".into(), false);
        list.add("b".into(), false);
        let titles: Vec<_> = list.items().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
    }

    #[test]
    fn test_counts() {
        let mut list = TodoStore::default();
        let a = list.add("a".into(), false);
        list.add("b".into(), false);
        assert!(!list.all_completed());
        list.toggle(a);
        assert_eq!(list.remaining(), 1);
        assert_eq!(list.completed(), 1);
        list.set_all(true);
        assert!(list.all_completed());
        list.clear_completed();
        assert!(list.is_empty());
        assert!(!list.all_completed());
    }

    #[test]
    fn test_restore_round_trip_keeps_ids_fresh() {
        let mut list = TodoStore::default();
        let a = list.add("a".into(), false);
        list.toggle(a);
        let json = list.to_json().unwrap();

        let mut restored = TodoStore::restore(Some(&json));
        assert_eq!(restored.items(), list.items());
        let b = restored.add("b".into(), false);
        assert_ne!(a, b);
    }

    #[test]
    fn test_restore_garbage_is_empty() {
        assert!(TodoStore::restore(Some("not json")).is_empty());
        assert!(TodoStore::restore(None).is_empty());
    }

    #[test]
    fn test_filter_fragments() {
        assert_eq!(Filter::from_fragment("#/active"), Filter::Active);
        assert_eq!(Filter::from_fragment("#/completed"), Filter::Completed);
        assert_eq!(Filter::from_fragment("#/"), Filter::All);
        assert_eq!(Filter::from_fragment(""), Filter::All);
        for filter in Filter::ALL {
            assert_eq!(Filter::from_fragment(filter.href()), filter);
        }
    }
}
