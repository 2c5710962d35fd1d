//! Page object for the TodoMVC page.
//!
//! Scenarios go through [`TodoPage`] instead of spelling selectors inline, so
//! the markup contract lives in one place.

use crate::locator::Locator;

/// Trait for page objects representing a page or component in the UI.
pub trait PageObject {
    /// URL path of the page, relative to the base URL
    fn url_pattern(&self) -> &str;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Selectors of the TodoMVC markup
pub mod selectors {
    /// New item input
    pub const NEW_TODO: &str = ".new-todo";
    /// Rendered items
    pub const TODO_ITEMS: &str = ".todo-list li";
    /// Item checkbox (within an item)
    pub const TOGGLE: &str = ".toggle";
    /// Item label (within an item)
    pub const LABEL: &str = "label";
    /// Item edit field (within an item)
    pub const EDIT: &str = ".edit";
    /// Mark-all checkbox
    pub const TOGGLE_ALL: &str = ".toggle-all";
    /// List section
    pub const MAIN: &str = ".main";
    /// Footer section
    pub const FOOTER: &str = ".footer";
    /// Remaining-items counter
    pub const TODO_COUNT: &str = ".todo-count";
    /// Clear-completed button
    pub const CLEAR_COMPLETED: &str = ".clear-completed";
    /// Filter links container
    pub const FILTERS: &str = ".filters";
}

/// The TodoMVC application page
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoPage;

impl PageObject for TodoPage {
    fn url_pattern(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "TodoMVC"
    }
}

impl TodoPage {
    /// New item input
    #[must_use]
    pub fn new_todo(&self) -> Locator {
        Locator::new(selectors::NEW_TODO)
    }

    /// Every rendered item
    #[must_use]
    pub fn items(&self) -> Locator {
        Locator::new(selectors::TODO_ITEMS)
    }

    /// Mark-all checkbox
    #[must_use]
    pub fn toggle_all(&self) -> Locator {
        Locator::new(selectors::TOGGLE_ALL)
    }

    /// List section
    #[must_use]
    pub fn main(&self) -> Locator {
        Locator::new(selectors::MAIN)
    }

    /// Footer section
    #[must_use]
    pub fn footer(&self) -> Locator {
        Locator::new(selectors::FOOTER)
    }

    /// Remaining-items counter
    #[must_use]
    pub fn todo_count(&self) -> Locator {
        Locator::new(selectors::TODO_COUNT)
    }

    /// Clear-completed button
    #[must_use]
    pub fn clear_completed(&self) -> Locator {
        Locator::new(selectors::CLEAR_COMPLETED)
    }

    /// Filter links container
    #[must_use]
    pub fn filters(&self) -> Locator {
        Locator::new(selectors::FILTERS)
    }

    /// The filter link whose text contains `name`
    #[must_use]
    pub fn filter(&self, name: &str) -> Locator {
        self.filters().contains(name)
    }
}

/// Parts of one item
pub trait ItemParts {
    /// Completion checkbox
    fn toggle(&self) -> Locator;
    /// Text label
    fn label(&self) -> Locator;
    /// Edit field
    fn edit(&self) -> Locator;
}

impl ItemParts for Locator {
    fn toggle(&self) -> Locator {
        self.find(selectors::TOGGLE)
    }

    fn label(&self) -> Locator {
        self.find(selectors::LABEL)
    }

    fn edit(&self) -> Locator {
        self.find(selectors::EDIT)
    }
}
