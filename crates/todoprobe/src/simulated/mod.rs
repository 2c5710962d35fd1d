//! In-memory TodoMVC application.
//!
//! `SimulatedApp` renders the standard TodoMVC markup from a todo list model
//! and applies actions with TodoMVC semantics. It keeps `localStorage` across
//! reloads and a hash-route history, so every scenario runs against it
//! without a browser. Defects can be injected for mutation runs.

mod defect;
mod dom;
mod state;

pub use defect::AppDefect;
pub use dom::{Dom, NodeId, Role};
pub use state::{Filter, Todo, TodoStore, STORAGE_KEY};

use crate::driver::ProbeDriver;
use crate::keyboard::{Key, Keystroke};
use crate::locator::{Action, ElementState, Selector};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Edit in progress on one item
#[derive(Debug, Clone, PartialEq, Eq)]
struct Editing {
    id: u64,
    draft: String,
}

/// Per-document state, discarded on every full page load
#[derive(Debug, Clone, Default)]
struct PageState {
    todos: TodoStore,
    filter: Filter,
    draft: String,
    editing: Option<Editing>,
    focus: Option<Role>,
    toggle_all_flag: bool,
}

/// Simulated TodoMVC page
#[derive(Debug, Default)]
pub struct SimulatedApp {
    defects: HashSet<AppDefect>,
    storage: HashMap<String, String>,
    history: Vec<String>,
    cursor: usize,
    page: Option<PageState>,
    calls: Vec<String>,
}

fn split_fragment(url: &str) -> (&str, &str) {
    url.find('#').map_or((url, ""), |i| url.split_at(i))
}

impl SimulatedApp {
    /// Healthy application
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Application with a defect injected
    #[must_use]
    pub fn with_defect(mut self, defect: AppDefect) -> Self {
        self.defects.insert(defect);
        self
    }

    /// Whether a defect is active
    #[must_use]
    pub fn has_defect(&self, defect: AppDefect) -> bool {
        self.defects.contains(&defect)
    }

    /// Driver calls so far, e.g. `navigate http://..`, `click .toggle-all`
    #[must_use]
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Raw storage value
    #[must_use]
    pub fn stored(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    fn load_document(&mut self) {
        let url = self.history.get(self.cursor).cloned().unwrap_or_default();
        let (_, fragment) = split_fragment(&url);
        let autofocus = !self.has_defect(AppDefect::NoAutofocus);
        self.page = Some(PageState {
            todos: TodoStore::restore(self.stored(STORAGE_KEY)),
            filter: Filter::from_fragment(fragment),
            focus: autofocus.then_some(Role::NewTodo),
            ..PageState::default()
        });
    }

    fn page_mut(&mut self) -> ProbeResult<&mut PageState> {
        self.page
            .as_mut()
            .ok_or_else(|| ProbeError::page("no document loaded"))
    }

    fn persist(&mut self) -> ProbeResult<()> {
        if self.has_defect(AppDefect::NoPersistence) {
            return Ok(());
        }
        if let Some(page) = &self.page {
            let json = page.todos.to_json()?;
            self.storage.insert(STORAGE_KEY.to_string(), json);
        }
        Ok(())
    }

    /// Render the current document
    #[must_use]
    pub fn render(&self) -> Dom {
        let mut dom = Dom::new();
        let Some(page) = &self.page else {
            return dom;
        };

        let app = dom.element(Dom::ROOT, "section", &["todoapp"]);
        let header = dom.element(app, "header", &["header"]);
        let h1 = dom.element(header, "h1", &[]);
        dom.text(h1, "todos");
        let input = dom.element(header, "input", &["new-todo"]);
        let node = dom.node_mut(input);
        node.role = Role::NewTodo;
        node.value = Some(page.draft.clone());

        if page.todos.is_empty() {
            return dom;
        }

        let main = dom.element(app, "section", &["main"]);
        let toggle_all = dom.element(main, "input", &["toggle-all"]);
        let node = dom.node_mut(toggle_all);
        node.id = Some("toggle-all");
        node.role = Role::ToggleAll;
        node.checked = if self.has_defect(AppDefect::ToggleAllIgnoresItems) {
            page.toggle_all_flag
        } else {
            page.todos.all_completed()
        };
        let label = dom.element(main, "label", &[]);
        dom.text(label, "Mark all as complete");

        let list = dom.element(main, "ul", &["todo-list"]);
        let filter = if self.has_defect(AppDefect::FilterIgnored) {
            Filter::All
        } else {
            page.filter
        };
        for todo in page.todos.items().iter().filter(|t| filter.shows(t)) {
            self.render_item(&mut dom, list, page, todo);
        }

        let footer = dom.element(app, "footer", &["footer"]);
        let count = dom.element(footer, "span", &["todo-count"]);
        let strong = dom.element(count, "strong", &[]);
        let remaining = page.todos.remaining();
        dom.text(strong, remaining.to_string());
        let noun = if remaining == 1 && !self.has_defect(AppDefect::CountAlwaysPlural) {
            "item"
        } else {
            "items"
        };
        dom.text(count, format!(" {noun} left"));

        let filters = dom.element(footer, "ul", &["filters"]);
        let highlighted = if self.has_defect(AppDefect::FilterHighlightStuck) {
            Filter::All
        } else {
            page.filter
        };
        for f in Filter::ALL {
            let li = dom.element(filters, "li", &[]);
            let classes: &[&'static str] = if f == highlighted { &["selected"] } else { &[] };
            let link = dom.element(li, "a", classes);
            dom.node_mut(link).role = Role::FilterLink(f);
            dom.text(link, f.to_string());
        }

        if page.todos.completed() > 0 || self.has_defect(AppDefect::ClearCompletedAlwaysVisible) {
            let button = dom.element(footer, "button", &["clear-completed"]);
            dom.node_mut(button).role = Role::ClearCompleted;
            dom.text(button, "Clear completed");
        }

        dom
    }

    fn render_item(&self, dom: &mut Dom, list: NodeId, page: &PageState, todo: &Todo) {
        let editing = page.editing.as_ref().filter(|e| e.id == todo.id);
        let mut classes = Vec::new();
        if todo.completed {
            classes.push("completed");
        }
        if editing.is_some() {
            classes.push("editing");
        }
        let li = dom.element(list, "li", &classes);

        let view = dom.element(li, "div", &["view"]);
        dom.node_mut(view).hidden =
            editing.is_some() && !self.has_defect(AppDefect::EditKeepsControlsVisible);
        let toggle = dom.element(view, "input", &["toggle"]);
        let node = dom.node_mut(toggle);
        node.role = Role::Toggle(todo.id);
        node.checked = todo.completed;
        let label = dom.element(view, "label", &[]);
        dom.node_mut(label).role = Role::Label(todo.id);
        dom.text(label, todo.title.clone());
        let destroy = dom.element(view, "button", &["destroy"]);
        dom.node_mut(destroy).role = Role::Destroy(todo.id);

        let edit = dom.element(li, "input", &["edit"]);
        let node = dom.node_mut(edit);
        node.role = Role::Edit(todo.id);
        node.hidden = editing.is_none();
        node.value = Some(editing.map_or_else(|| todo.title.clone(), |e| e.draft.clone()));
    }

    fn target(&self, selector: &Selector) -> ProbeResult<Role> {
        let dom = self.render();
        let focus = self.page.as_ref().and_then(|p| p.focus);
        let found = dom.query(selector, focus)?;
        match found.as_slice() {
            [only] => Ok(dom.node(*only).role),
            _ => Err(ProbeError::ElementNotActionable {
                subject: selector.to_string(),
                found: found.len(),
            }),
        }
    }

    /// Move focus, committing an open edit when its field loses focus
    fn set_focus(&mut self, role: Option<Role>) -> ProbeResult<()> {
        let page = self.page_mut()?;
        let previous = page.focus;
        if previous == role {
            return Ok(());
        }
        page.focus = role;
        if let Some(Role::Edit(id)) = previous {
            self.commit_edit(id)?;
        }
        Ok(())
    }

    fn add_todo(&mut self) -> ProbeResult<()> {
        let no_trim = self.has_defect(AppDefect::NoTrim);
        let at_front = self.has_defect(AppDefect::AppendAtTop);
        let keep_input = self.has_defect(AppDefect::InputNotCleared);
        let page = self.page_mut()?;
        let title = if no_trim {
            page.draft.clone()
        } else {
            page.draft.trim().to_string()
        };
        if title.trim().is_empty() {
            return Ok(());
        }
        page.todos.add(title, at_front);
        if !keep_input {
            page.draft.clear();
        }
        self.persist()
    }

    fn start_edit(&mut self, id: u64) -> ProbeResult<()> {
        self.set_focus(None)?;
        let page = self.page_mut()?;
        let Some(todo) = page.todos.get(id) else {
            return Ok(());
        };
        page.editing = Some(Editing {
            id,
            draft: todo.title.clone(),
        });
        page.focus = Some(Role::Edit(id));
        Ok(())
    }

    fn commit_edit(&mut self, id: u64) -> ProbeResult<()> {
        let keep_empty = self.has_defect(AppDefect::EmptyEditKeepsItem);
        let no_trim = self.has_defect(AppDefect::EditNoTrim);
        let page = self.page_mut()?;
        if page.editing.as_ref().map_or(true, |e| e.id != id) {
            return Ok(());
        }
        let Some(editing) = page.editing.take() else {
            return Ok(());
        };
        if page.focus == Some(Role::Edit(id)) {
            page.focus = None;
        }
        let title = if no_trim {
            editing.draft.as_str()
        } else {
            editing.draft.trim()
        };
        if !title.trim().is_empty() {
            page.todos.rename(id, title.to_string());
        } else if !keep_empty {
            page.todos.remove(id);
        }
        self.persist()
    }

    fn cancel_edit(&mut self, id: u64) -> ProbeResult<()> {
        if self.has_defect(AppDefect::EscapeCommits) {
            return self.commit_edit(id);
        }
        let page = self.page_mut()?;
        if page.editing.as_ref().is_some_and(|e| e.id == id) {
            page.editing = None;
            page.focus = None;
        }
        Ok(())
    }

    fn draft_mut(&mut self, role: Role) -> ProbeResult<Option<&mut String>> {
        let page = self.page_mut()?;
        Ok(match role {
            Role::NewTodo => Some(&mut page.draft),
            Role::Edit(id) => page
                .editing
                .as_mut()
                .filter(|e| e.id == id)
                .map(|e| &mut e.draft),
            _ => None,
        })
    }

    fn type_keys(&mut self, role: Role, keys: &[Keystroke]) -> ProbeResult<()> {
        if !matches!(role, Role::NewTodo | Role::Edit(_)) {
            return Err(ProbeError::input(format!("{role:?} cannot be typed into")));
        }
        self.set_focus(Some(role))?;

        for key in keys {
            // Keys go wherever focus is now; an earlier Enter may have closed the field.
            let Some(focused) = self.page_mut()?.focus else {
                break;
            };
            match key {
                Keystroke::Text(text) => {
                    if let Some(draft) = self.draft_mut(focused)? {
                        draft.push_str(text);
                    }
                }
                Keystroke::Key(Key::Backspace) => {
                    if let Some(draft) = self.draft_mut(focused)? {
                        draft.pop();
                    }
                }
                Keystroke::Key(Key::Enter) => match focused {
                    Role::NewTodo => self.add_todo()?,
                    Role::Edit(id) => self.commit_edit(id)?,
                    _ => {}
                },
                Keystroke::Key(Key::Escape) => {
                    if let Role::Edit(id) = focused {
                        self.cancel_edit(id)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn click(&mut self, role: Role) -> ProbeResult<()> {
        self.set_focus(role.focusable().then_some(role))?;
        let stuck_toggle_all = self.has_defect(AppDefect::ToggleAllIgnoresItems);
        let page = self.page_mut()?;
        match role {
            Role::Toggle(id) => page.todos.toggle(id),
            Role::ToggleAll => {
                let checked = if stuck_toggle_all {
                    page.toggle_all_flag = !page.toggle_all_flag;
                    page.toggle_all_flag
                } else {
                    !page.todos.all_completed()
                };
                page.todos.set_all(checked);
            }
            Role::Destroy(id) => page.todos.remove(id),
            Role::ClearCompleted => page.todos.clear_completed(),
            Role::FilterLink(filter) => return self.follow_fragment(filter.href()),
            Role::None | Role::NewTodo | Role::Label(_) | Role::Edit(_) => return Ok(()),
        }
        self.persist()
    }

    fn is_checked(&self, role: Role) -> ProbeResult<bool> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| ProbeError::page("no document loaded"))?;
        match role {
            Role::Toggle(id) => Ok(page.todos.get(id).is_some_and(|t| t.completed)),
            Role::ToggleAll if self.has_defect(AppDefect::ToggleAllIgnoresItems) => {
                Ok(page.toggle_all_flag)
            }
            Role::ToggleAll => Ok(page.todos.all_completed()),
            _ => Err(ProbeError::input(format!("{role:?} is not a checkbox"))),
        }
    }

    /// Same-document navigation to a fragment, adding a history entry
    fn follow_fragment(&mut self, fragment: &str) -> ProbeResult<()> {
        let current = self.history.get(self.cursor).cloned().unwrap_or_default();
        let (base, old) = split_fragment(&current);
        if old == fragment {
            return Ok(());
        }
        let url = format!("{base}{fragment}");
        self.history.truncate(self.cursor + 1);
        self.history.push(url);
        self.cursor = self.history.len() - 1;
        self.page_mut()?.filter = Filter::from_fragment(fragment);
        Ok(())
    }
}

#[async_trait]
impl ProbeDriver for SimulatedApp {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.calls.push(format!("navigate {url}"));
        if !self.history.is_empty() {
            self.history.truncate(self.cursor + 1);
        }
        self.history.push(url.to_string());
        self.cursor = self.history.len() - 1;
        self.load_document();
        Ok(())
    }

    async fn reload(&mut self) -> ProbeResult<()> {
        self.calls.push("reload".to_string());
        if self.history.is_empty() {
            return Err(ProbeError::page("nothing to reload"));
        }
        self.load_document();
        Ok(())
    }

    async fn go_back(&mut self) -> ProbeResult<()> {
        self.calls.push("back".to_string());
        if self.cursor == 0 {
            let url = self.history.first().cloned().unwrap_or_default();
            return Err(ProbeError::NavigationError {
                url,
                message: "no previous history entry".to_string(),
            });
        }
        let (from_base, _) = split_fragment(&self.history[self.cursor]);
        let from_base = from_base.to_string();
        self.cursor -= 1;
        let target = self.history[self.cursor].clone();
        let (to_base, fragment) = split_fragment(&target);
        if to_base == from_base && self.page.is_some() {
            self.page_mut()?.filter = Filter::from_fragment(fragment);
        } else {
            self.load_document();
        }
        Ok(())
    }

    async fn clear_storage(&mut self) -> ProbeResult<()> {
        self.calls.push("clear storage".to_string());
        self.storage.clear();
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self
            .history
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn query(&self, selector: &Selector) -> ProbeResult<Vec<ElementState>> {
        let dom = self.render();
        let focus = self.page.as_ref().and_then(|p| p.focus);
        Ok(dom
            .query(selector, focus)?
            .into_iter()
            .map(|n| dom.state(n, focus))
            .collect())
    }

    async fn perform(&mut self, selector: &Selector, action: &Action) -> ProbeResult<()> {
        self.calls.push(format!("{action} {selector}"));
        let role = self.target(selector)?;
        trace!(?role, %action, "simulated action");

        match action {
            Action::Type(keys) => self.type_keys(role, keys),
            Action::Click => self.click(role),
            Action::DoubleClick => match role {
                Role::Label(id) => self.start_edit(id),
                other => self.click(other),
            },
            Action::Check | Action::Uncheck => {
                let want = matches!(action, Action::Check);
                if self.is_checked(role)? == want {
                    Ok(())
                } else {
                    self.click(role)
                }
            }
            Action::Clear => {
                if !matches!(role, Role::NewTodo | Role::Edit(_)) {
                    return Err(ProbeError::input(format!("{role:?} cannot be cleared")));
                }
                self.set_focus(Some(role))?;
                if let Some(draft) = self.draft_mut(role)? {
                    draft.clear();
                }
                Ok(())
            }
            Action::Blur => {
                if self.page_mut()?.focus == Some(role) {
                    self.set_focus(None)?;
                }
                Ok(())
            }
            Action::Focus => self.set_focus(role.focusable().then_some(role)),
        }
    }

    async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.calls.push("close".to_string());
        self.page = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::parse_keys;
    use crate::locator::Locator;

    const URL: &str = "http://localhost:8080/";

    async fn loaded(app: SimulatedApp) -> SimulatedApp {
        let mut app = app;
        app.navigate(URL).await.unwrap();
        app
    }

    async fn add(app: &mut SimulatedApp, text: &str) {
        let keys = parse_keys(&format!("{text}{{enter}}")).unwrap();
        app.perform(Locator::new(".new-todo").selector(), &Action::Type(keys))
            .await
            .unwrap();
    }

    async fn texts(app: &SimulatedApp, css: &str) -> Vec<String> {
        app.query(&Selector::css(css))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.text)
            .collect()
    }

    mod rendering_tests {
        use super::*;

        #[tokio::test]
        async fn test_blank_before_navigation() {
            let app = SimulatedApp::new();
            assert!(app.query(&Selector::css(".new-todo")).await.unwrap().is_empty());
            assert_eq!(app.current_url().await.unwrap(), "about:blank");
        }

        #[tokio::test]
        async fn test_initial_page() {
            let app = loaded(SimulatedApp::new()).await;
            let focused = app.query(&Selector::Focused).await.unwrap();
            assert_eq!(focused.len(), 1);
            assert!(focused[0].has_class("new-todo"));
            assert!(app.query(&Selector::css(".main")).await.unwrap().is_empty());
            assert!(app.query(&Selector::css(".footer")).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_counter_text_spans_elements() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            assert_eq!(texts(&app, ".todo-count").await, ["1 item left"]);
            add(&mut app, "b").await;
            assert_eq!(texts(&app, ".todo-count").await, ["2 items left"]);
        }

        #[tokio::test]
        async fn test_edit_field_hidden_until_editing() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            let edit = app.query(&Selector::css(".edit")).await.unwrap();
            assert!(!edit[0].visible);
            let label = Locator::new(".todo-list li").nth(0).find("label");
            app.perform(label.selector(), &Action::DoubleClick).await.unwrap();
            let edit = app.query(&Selector::css(".edit")).await.unwrap();
            assert!(edit[0].visible);
            assert!(edit[0].focused);
            assert_eq!(edit[0].value.as_deref(), Some("a"));
            let toggle = app.query(&Selector::css(".toggle")).await.unwrap();
            assert!(!toggle[0].visible);
        }
    }

    mod behavior_tests {
        use super::*;

        #[tokio::test]
        async fn test_add_trims_and_ignores_blank() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "   spaced   ").await;
            add(&mut app, "    ").await;
            assert_eq!(texts(&app, ".todo-list li").await, ["spaced"]);
        }

        #[tokio::test]
        async fn test_toggle_all_follows_items() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            add(&mut app, "b").await;
            let toggle_all = Selector::css(".toggle-all");
            app.perform(&toggle_all, &Action::Check).await.unwrap();
            assert!(app.query(&toggle_all).await.unwrap()[0].checked);

            let first = Locator::new(".todo-list li").nth(0).find(".toggle");
            app.perform(first.selector(), &Action::Uncheck).await.unwrap();
            assert!(!app.query(&toggle_all).await.unwrap()[0].checked);
        }

        #[tokio::test]
        async fn test_check_is_idempotent() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            let toggle = Selector::css(".toggle");
            app.perform(&toggle, &Action::Check).await.unwrap();
            app.perform(&toggle, &Action::Check).await.unwrap();
            assert!(app.query(&toggle).await.unwrap()[0].checked);
        }

        #[tokio::test]
        async fn test_check_rejects_non_checkbox() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            let label = Locator::new(".todo-list li").nth(0).find("label");
            let err = app
                .perform(label.selector(), &Action::Check)
                .await
                .unwrap_err();
            assert!(err.to_string().contains("not a checkbox"));
        }

        #[tokio::test]
        async fn test_blur_commits_and_escape_cancels() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            let label = Locator::new(".todo-list li").nth(0).find("label");
            let edit = Locator::new(".todo-list li").nth(0).find(".edit");

            app.perform(label.selector(), &Action::DoubleClick).await.unwrap();
            app.perform(edit.selector(), &Action::Clear).await.unwrap();
            app.perform(edit.selector(), &Action::Type(parse_keys(" b ").unwrap()))
                .await
                .unwrap();
            app.perform(edit.selector(), &Action::Blur).await.unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["b"]);

            app.perform(label.selector(), &Action::DoubleClick).await.unwrap();
            app.perform(edit.selector(), &Action::Clear).await.unwrap();
            app.perform(edit.selector(), &Action::Type(parse_keys("zz{esc}").unwrap()))
                .await
                .unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["b"]);
        }

        #[tokio::test]
        async fn test_empty_edit_removes_item() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            add(&mut app, "b").await;
            let second = Locator::new(".todo-list li").nth(1);
            app.perform(second.find("label").selector(), &Action::DoubleClick)
                .await
                .unwrap();
            app.perform(second.find(".edit").selector(), &Action::Clear)
                .await
                .unwrap();
            app.perform(
                second.find(".edit").selector(),
                &Action::Type(parse_keys("{enter}").unwrap()),
            )
            .await
            .unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["a"]);
        }

        #[tokio::test]
        async fn test_storage_survives_reload_but_draft_does_not() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            app.perform(
                &Selector::css(".new-todo"),
                &Action::Type(parse_keys("draft").unwrap()),
            )
            .await
            .unwrap();
            app.reload().await.unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["a"]);
            let input = app.query(&Selector::css(".new-todo")).await.unwrap();
            assert_eq!(input[0].value.as_deref(), Some(""));
            assert!(app.stored(STORAGE_KEY).is_some());
        }

        #[tokio::test]
        async fn test_clear_storage_applies_on_reload() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            app.clear_storage().await.unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["a"]);
            app.reload().await.unwrap();
            assert!(texts(&app, ".todo-list li").await.is_empty());
        }
    }

    mod routing_tests {
        use super::*;

        #[tokio::test]
        async fn test_filters_push_history() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            add(&mut app, "b").await;
            let first = Locator::new(".todo-list li").nth(0).find(".toggle");
            app.perform(first.selector(), &Action::Check).await.unwrap();

            let filters = Locator::new(".filters");
            app.perform(filters.contains("Active").selector(), &Action::Click)
                .await
                .unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["b"]);
            assert_eq!(app.current_url().await.unwrap(), format!("{URL}#/active"));

            app.perform(filters.contains("Completed").selector(), &Action::Click)
                .await
                .unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["a"]);

            app.go_back().await.unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["b"]);
            app.go_back().await.unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, ["a", "b"]);
            assert!(app.go_back().await.is_err());
        }

        #[tokio::test]
        async fn test_selected_filter_class() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            let selected = texts(&app, ".filters a.selected").await;
            assert_eq!(selected, ["All"]);
            app.perform(Locator::new(".filters").contains("Completed").selector(), &Action::Click)
                .await
                .unwrap();
            assert_eq!(texts(&app, ".filters a.selected").await, ["Completed"]);
        }

        #[tokio::test]
        async fn test_navigate_with_fragment_sets_filter() {
            let mut app = SimulatedApp::new();
            app.navigate(&format!("{URL}#/completed")).await.unwrap();
            add(&mut app, "a").await;
            assert!(texts(&app, ".todo-list li").await.is_empty());
        }
    }

    mod defect_tests {
        use super::*;

        #[tokio::test]
        async fn test_no_trim() {
            let mut app = loaded(SimulatedApp::new().with_defect(AppDefect::NoTrim)).await;
            add(&mut app, " a ").await;
            assert_eq!(texts(&app, ".todo-list li").await, [" a "]);
        }

        #[tokio::test]
        async fn test_edit_no_trim() {
            let mut app = loaded(SimulatedApp::new().with_defect(AppDefect::EditNoTrim)).await;
            add(&mut app, "a").await;
            let item = Locator::new(".todo-list li").nth(0);
            app.perform(item.find("label").selector(), &Action::DoubleClick)
                .await
                .unwrap();
            app.perform(item.find(".edit").selector(), &Action::Clear)
                .await
                .unwrap();
            app.perform(
                item.find(".edit").selector(),
                &Action::Type(parse_keys(" b {enter}").unwrap()),
            )
            .await
            .unwrap();
            assert_eq!(texts(&app, ".todo-list li").await, [" b "]);
        }

        #[tokio::test]
        async fn test_no_persistence() {
            let mut app = loaded(SimulatedApp::new().with_defect(AppDefect::NoPersistence)).await;
            add(&mut app, "a").await;
            app.reload().await.unwrap();
            assert!(texts(&app, ".todo-list li").await.is_empty());
        }

        #[tokio::test]
        async fn test_clear_completed_always_visible() {
            let mut app =
                loaded(SimulatedApp::new().with_defect(AppDefect::ClearCompletedAlwaysVisible))
                    .await;
            add(&mut app, "a").await;
            assert_eq!(texts(&app, ".clear-completed").await.len(), 1);
        }

        #[tokio::test]
        async fn test_calls_are_recorded() {
            let mut app = loaded(SimulatedApp::new()).await;
            add(&mut app, "a").await;
            app.close().await.unwrap();
            assert_eq!(app.calls()[0], format!("navigate {URL}"));
            assert!(app.calls()[1].starts_with("type a{enter}"));
            assert_eq!(app.calls().last().map(String::as_str), Some("close"));
        }
    }
}
