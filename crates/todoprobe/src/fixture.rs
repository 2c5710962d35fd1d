//! Todo fixtures shared by the scenarios.

use crate::keyboard::{Key, Keystroke};
use crate::locator::{Expectation, Locator};
use crate::page_object::TodoPage;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use tracing::debug;

/// First default item
pub const TODO_ITEM_ONE: &str = "Get some sleep";
/// Second default item
pub const TODO_ITEM_TWO: &str = "Buy some food";
/// Third default item
pub const TODO_ITEM_THREE: &str = "Have a party";

/// The default items in creation order
pub const DEFAULT_TODOS: [&str; 3] = [TODO_ITEM_ONE, TODO_ITEM_TWO, TODO_ITEM_THREE];

/// Positional view over the rendered items
#[derive(Debug, Clone)]
pub struct TodoList {
    items: Locator,
}

impl TodoList {
    /// Wrap an items locator
    #[must_use]
    pub const fn new(items: Locator) -> Self {
        Self { items }
    }

    /// Item at `index`
    #[must_use]
    pub fn nth(&self, index: usize) -> Locator {
        self.items.nth(index)
    }

    /// The whole collection
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.items
    }

    /// Consume into the collection locator
    #[must_use]
    pub fn into_locator(self) -> Locator {
        self.items
    }
}

/// Type `text` into the new-todo input and submit it.
///
/// The text is typed literally; braces are not key tokens here. Waits until
/// the list has grown by one and returns a locator for the new item, which
/// sits at the position the list had before the call.
///
/// # Errors
///
/// Returns an input error for text that is blank after trimming, or the
/// action/assertion error that stopped creation.
pub async fn create_todo(session: &mut Session, text: &str) -> ProbeResult<Locator> {
    if text.trim().is_empty() {
        return Err(ProbeError::input("todo text is blank"));
    }

    let page = TodoPage;
    let items = page.items();
    let before = session.count(&items).await?;
    debug!(text, position = before, "create todo");

    let input = page.new_todo();
    session.focus(&input).await?;
    session
        .type_keys(
            &input,
            vec![Keystroke::text(text), Keystroke::Key(Key::Enter)],
        )
        .await?;
    session
        .expect(&items, Expectation::HaveLength(before + 1))
        .await?;

    Ok(items.nth(before))
}

/// Create the three default items in order.
///
/// # Errors
///
/// Returns the first [`create_todo`] failure.
pub async fn create_default_todos(session: &mut Session) -> ProbeResult<TodoList> {
    for text in DEFAULT_TODOS {
        create_todo(session, text).await?;
    }
    Ok(TodoList::new(TodoPage.items()))
}
