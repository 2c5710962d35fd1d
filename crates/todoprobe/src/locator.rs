//! Locator abstraction for element selection and assertions.
//!
//! # Design Philosophy
//!
//! - **Lazy**: a `Locator` is a recipe, not a handle. Every action or
//!   assertion re-queries the page, so an alias taken before a re-render
//!   still points at "the second item of the list" afterwards.
//! - **Chainable**: `.nth()`, `.find()` and `.contains()` narrow a parent
//!   locator the same way the scenarios read.
//! - **Portable**: a selector compiles to a JavaScript expression for the
//!   CDP driver and is interpreted directly by the simulated app.

use crate::keyboard::Keystroke;
use crate::retry::AssertionCheckResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector describing how to find a set of elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector evaluated against the whole document
    Css(String),
    /// The element that currently has focus
    Focused,
    /// The element at `index` within the parent's matches
    Nth {
        /// Parent selector
        parent: Box<Selector>,
        /// Zero-based index
        index: usize,
    },
    /// Descendants of the parent's matches that match a CSS selector
    Descendant {
        /// Parent selector
        parent: Box<Selector>,
        /// CSS selector for descendants
        css: String,
    },
    /// First, deepest descendant of the parent's matches whose text
    /// contains `text`
    Contains {
        /// Parent selector
        parent: Box<Selector>,
        /// Text to look for
        text: String,
    },
}

/// Quote a string as a JavaScript string literal
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Compile to a JavaScript expression that evaluates to an `Array` of
    /// elements in document order
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self {
            Self::Css(css) => {
                format!("Array.from(document.querySelectorAll({}))", js_string(css))
            }
            Self::Focused => "((a) => (a && a !== document.body) ? [a] : [])(document.activeElement)"
                .to_string(),
            Self::Nth { parent, index } => {
                format!("({}).slice({index}, {index} + 1)", parent.to_query_all())
            }
            Self::Descendant { parent, css } => format!(
                "({}).flatMap(el => Array.from(el.querySelectorAll({})))",
                parent.to_query_all(),
                js_string(css)
            ),
            Self::Contains { parent, text } => {
                let t = js_string(text);
                format!(
                    "({}).flatMap(el => Array.from(el.querySelectorAll('*')).filter(c => \
                     c.textContent.includes({t}) && \
                     !Array.from(c.children).some(k => k.textContent.includes({t})))).slice(0, 1)",
                    parent.to_query_all()
                )
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => f.write_str(css),
            Self::Focused => f.write_str("focused element"),
            Self::Nth { parent, index } => write!(f, "{parent}[{index}]"),
            Self::Descendant { parent, css } => write!(f, "{parent} {css}"),
            Self::Contains { parent, text } => write!(f, "{parent} containing {text:?}"),
        }
    }
}

/// A lazily evaluated reference to zero or more elements
#[derive(Debug, Clone)]
pub struct Locator {
    selector: Selector,
    description: Option<String>,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(css: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(css.into()))
    }

    /// Locator for the focused element
    #[must_use]
    pub fn focused() -> Self {
        Self::from_selector(Selector::Focused)
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            description: None,
        }
    }

    /// Attach an alias name used in descriptions (`@name`)
    #[must_use]
    pub fn named(mut self, alias: impl Into<String>) -> Self {
        self.description = Some(format!("@{}", alias.into()));
        self
    }

    /// Narrow to the element at `index`
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        Self {
            selector: Selector::Nth {
                parent: Box::new(self.selector.clone()),
                index,
            },
            description: self.description.as_ref().map(|d| format!("{d}[{index}]")),
        }
    }

    /// Descendants matching `css`
    #[must_use]
    pub fn find(&self, css: impl Into<String>) -> Self {
        let css = css.into();
        Self {
            description: self.description.as_ref().map(|d| format!("{d} {css}")),
            selector: Selector::Descendant {
                parent: Box::new(self.selector.clone()),
                css,
            },
        }
    }

    /// Deepest descendant containing `text`
    #[must_use]
    pub fn contains(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            description: self
                .description
                .as_ref()
                .map(|d| format!("{d} containing {text:?}")),
            selector: Selector::Contains {
                parent: Box::new(self.selector.clone()),
                text,
            },
        }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Human-readable subject for logs and assertion messages
    #[must_use]
    pub fn description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| self.selector.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Observable state of a single matched element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Lower-case tag name
    pub tag: String,
    /// `textContent`
    pub text: String,
    /// Class list
    pub classes: Vec<String>,
    /// Whether the element is rendered and not hidden
    pub visible: bool,
    /// Checkbox checked state (false for non-checkboxes)
    pub checked: bool,
    /// Form control value, if the element has one
    pub value: Option<String>,
    /// Whether the element has focus
    pub focused: bool,
}

impl ElementState {
    /// Check class membership
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Actions that can be performed on a located element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Focus the element and type the keystrokes
    Type(Vec<Keystroke>),
    /// Click
    Click,
    /// Double-click
    DoubleClick,
    /// Make a checkbox checked (no-op when already checked)
    Check,
    /// Make a checkbox unchecked (no-op when already unchecked)
    Uncheck,
    /// Empty a text field
    Clear,
    /// Remove focus from the element
    Blur,
    /// Give focus to the element
    Focus,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(keys) => {
                f.write_str("type ")?;
                for key in keys {
                    write!(f, "{key}")?;
                }
                Ok(())
            }
            Self::Click => f.write_str("click"),
            Self::DoubleClick => f.write_str("dblclick"),
            Self::Check => f.write_str("check"),
            Self::Uncheck => f.write_str("uncheck"),
            Self::Clear => f.write_str("clear"),
            Self::Blur => f.write_str("blur"),
            Self::Focus => f.write_str("focus"),
        }
    }
}

/// Conditions a locator can be expected to satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// At least one element matches
    Exist,
    /// No element matches
    NotExist,
    /// Every match is visible
    BeVisible,
    /// No match is visible
    NotBeVisible,
    /// Every match has the class
    HaveClass(String),
    /// No match has the class
    NotHaveClass(String),
    /// Concatenated text equals exactly
    HaveText(String),
    /// Concatenated text contains
    Contain(String),
    /// Every match is a checked checkbox
    BeChecked,
    /// No match is a checked checkbox
    NotBeChecked,
    /// Exactly this many matches
    HaveLength(usize),
    /// The first match has this form value
    HaveValue(String),
}

impl Expectation {
    /// `HaveClass` shorthand
    #[must_use]
    pub fn have_class(class: impl Into<String>) -> Self {
        Self::HaveClass(class.into())
    }

    /// `NotHaveClass` shorthand
    #[must_use]
    pub fn not_have_class(class: impl Into<String>) -> Self {
        Self::NotHaveClass(class.into())
    }

    /// `HaveText` shorthand
    #[must_use]
    pub fn have_text(text: impl Into<String>) -> Self {
        Self::HaveText(text.into())
    }

    /// `Contain` shorthand
    #[must_use]
    pub fn contain(text: impl Into<String>) -> Self {
        Self::Contain(text.into())
    }

    /// `HaveValue` shorthand
    #[must_use]
    pub fn have_value(value: impl Into<String>) -> Self {
        Self::HaveValue(value.into())
    }

    /// Evaluate against the elements matched at one point in time
    #[must_use]
    pub fn check(&self, elements: &[ElementState]) -> AssertionCheckResult {
        match self {
            Self::Exist => pass_if(!elements.is_empty(), || "no elements matched".into()),
            Self::NotExist => pass_if(elements.is_empty(), || {
                format!("{} element(s) matched", elements.len())
            }),
            Self::HaveLength(n) => pass_if(elements.len() == *n, || {
                format!("length was {}", elements.len())
            }),
            _ if elements.is_empty() => AssertionCheckResult::Fail("no elements matched".into()),
            Self::BeVisible => {
                let hidden = elements.iter().filter(|e| !e.visible).count();
                pass_if(hidden == 0, || {
                    format!("{hidden} of {} element(s) were hidden", elements.len())
                })
            }
            Self::NotBeVisible => {
                let shown = elements.iter().filter(|e| e.visible).count();
                pass_if(shown == 0, || {
                    format!("{shown} of {} element(s) were visible", elements.len())
                })
            }
            Self::HaveClass(class) => match elements.iter().find(|e| !e.has_class(class)) {
                None => AssertionCheckResult::Pass,
                Some(e) => AssertionCheckResult::Fail(format!("classes were {:?}", e.classes)),
            },
            Self::NotHaveClass(class) => match elements.iter().find(|e| e.has_class(class)) {
                None => AssertionCheckResult::Pass,
                Some(e) => AssertionCheckResult::Fail(format!("classes were {:?}", e.classes)),
            },
            Self::HaveText(expected) => {
                let text = joined_text(elements);
                pass_if(&text == expected, || format!("text was {text:?}"))
            }
            Self::Contain(needle) => {
                let text = joined_text(elements);
                pass_if(text.contains(needle.as_str()), || format!("text was {text:?}"))
            }
            Self::BeChecked => pass_if(elements.iter().all(|e| e.checked), || {
                "element was not checked".into()
            }),
            Self::NotBeChecked => pass_if(!elements.iter().any(|e| e.checked), || {
                "element was checked".into()
            }),
            Self::HaveValue(expected) => {
                let actual = elements[0].value.clone().unwrap_or_default();
                pass_if(&actual == expected, || format!("value was {actual:?}"))
            }
        }
    }
}

fn pass_if(ok: bool, actual: impl FnOnce() -> String) -> AssertionCheckResult {
    if ok {
        AssertionCheckResult::Pass
    } else {
        AssertionCheckResult::Fail(actual())
    }
}

fn joined_text(elements: &[ElementState]) -> String {
    elements.iter().map(|e| e.text.as_str()).collect()
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exist => f.write_str("exist"),
            Self::NotExist => f.write_str("not exist"),
            Self::BeVisible => f.write_str("be visible"),
            Self::NotBeVisible => f.write_str("not be visible"),
            Self::HaveClass(c) => write!(f, "have class {c:?}"),
            Self::NotHaveClass(c) => write!(f, "not have class {c:?}"),
            Self::HaveText(t) => write!(f, "have text {t:?}"),
            Self::Contain(t) => write!(f, "contain {t:?}"),
            Self::BeChecked => f.write_str("be checked"),
            Self::NotBeChecked => f.write_str("not be checked"),
            Self::HaveLength(n) => write!(f, "have length {n}"),
            Self::HaveValue(v) => write!(f, "have value {v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(text: &str, classes: &[&str]) -> ElementState {
        ElementState {
            tag: "li".to_string(),
            text: text.to_string(),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
            visible: true,
            ..ElementState::default()
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let query = Selector::css(".todo-list li").to_query_all();
            assert_eq!(
                query,
                r#"Array.from(document.querySelectorAll(".todo-list li"))"#
            );
        }

        #[test]
        fn test_nth_query_wraps_parent() {
            let query = Locator::new(".todo-list li").nth(2).selector().to_query_all();
            assert!(query.contains("querySelectorAll"));
            assert!(query.ends_with(".slice(2, 2 + 1)"));
        }

        #[test]
        fn test_descendant_query() {
            let query = Locator::new(".todo-list li")
                .nth(0)
                .find(".toggle")
                .selector()
                .to_query_all();
            assert!(query.contains("flatMap"));
            assert!(query.contains(r#"".toggle""#));
        }

        #[test]
        fn test_contains_query_escapes_text() {
            let query = Locator::new(".filters")
                .contains("say \"hi\"")
                .selector()
                .to_query_all();
            assert!(query.contains(r#""say \"hi\"""#));
            assert!(query.ends_with(".slice(0, 1)"));
        }

        #[test]
        fn test_focused_query() {
            let query = Selector::Focused.to_query_all();
            assert!(query.contains("document.activeElement"));
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_description_defaults_to_selector() {
            let locator = Locator::new(".todo-list li").nth(1).find("label");
            assert_eq!(locator.description(), ".todo-list li[1] label");
        }

        #[test]
        fn test_named_description_propagates() {
            let todos = Locator::new(".todo-list li").named("todos");
            assert_eq!(todos.nth(1).description(), "@todos[1]");
            assert_eq!(todos.nth(1).find(".toggle").description(), "@todos[1] .toggle");
            let link = Locator::new(".filters").named("filters").contains("All");
            assert_eq!(link.description(), "@filters containing \"All\"");
        }

        #[test]
        fn test_named_keeps_selector() {
            let plain = Locator::new(".todo-list li");
            let named = plain.clone().named("todos");
            assert_eq!(plain.selector(), named.selector());
        }
    }

    mod expectation_tests {
        use super::*;

        #[test]
        fn test_exist_and_not_exist() {
            assert!(Expectation::Exist.check(&[element("a", &[])]).is_pass());
            assert!(Expectation::Exist.check(&[]).is_fail());
            assert!(Expectation::NotExist.check(&[]).is_pass());
            assert!(Expectation::NotExist.check(&[element("a", &[])]).is_fail());
        }

        #[test]
        fn test_have_length() {
            let els = vec![element("a", &[]), element("b", &[])];
            assert!(Expectation::HaveLength(2).check(&els).is_pass());
            let AssertionCheckResult::Fail(msg) = Expectation::HaveLength(3).check(&els) else {
                panic!("expected failure");
            };
            assert_eq!(msg, "length was 2");
        }

        #[test]
        fn test_class_checks_require_elements() {
            assert!(Expectation::have_class("completed").check(&[]).is_fail());
            assert!(Expectation::not_have_class("completed").check(&[]).is_fail());
        }

        #[test]
        fn test_have_class() {
            let done = element("Get some sleep", &["completed"]);
            let open = element("Buy some food", &[]);
            assert!(Expectation::have_class("completed").check(&[done.clone()]).is_pass());
            assert!(Expectation::have_class("completed")
                .check(&[done.clone(), open.clone()])
                .is_fail());
            assert!(Expectation::not_have_class("completed").check(&[open]).is_pass());
            assert!(Expectation::not_have_class("completed").check(&[done]).is_fail());
        }

        #[test]
        fn test_text_exact_vs_contains() {
            let els = [element("3 items left", &[])];
            assert!(Expectation::contain("3 items").check(&els).is_pass());
            assert!(Expectation::have_text("3 items").check(&els).is_fail());
            assert!(Expectation::have_text("3 items left").check(&els).is_pass());
        }

        #[test]
        fn test_one_item_is_not_contained_in_plural() {
            let els = [element("1 items left", &[])];
            assert!(Expectation::contain("1 item left").check(&els).is_fail());
        }

        #[test]
        fn test_visibility() {
            let mut hidden = element("x", &[]);
            hidden.visible = false;
            assert!(Expectation::NotBeVisible.check(&[hidden.clone()]).is_pass());
            assert!(Expectation::BeVisible.check(&[hidden]).is_fail());
            assert!(Expectation::BeVisible.check(&[element("x", &[])]).is_pass());
        }

        #[test]
        fn test_checked() {
            let mut checkbox = element("", &["toggle"]);
            assert!(Expectation::NotBeChecked.check(&[checkbox.clone()]).is_pass());
            checkbox.checked = true;
            assert!(Expectation::BeChecked.check(&[checkbox.clone()]).is_pass());
            assert!(Expectation::NotBeChecked.check(&[checkbox]).is_fail());
        }

        #[test]
        fn test_have_value() {
            let mut input = element("", &["new-todo"]);
            input.value = Some(String::new());
            assert!(Expectation::have_value("").check(&[input.clone()]).is_pass());
            input.value = Some("draft".to_string());
            assert!(Expectation::have_value("").check(&[input]).is_fail());
        }

        #[test]
        fn test_display() {
            assert_eq!(
                Expectation::have_class("selected").to_string(),
                "have class \"selected\""
            );
            assert_eq!(Expectation::HaveLength(2).to_string(), "have length 2");
        }
    }

    mod action_tests {
        use super::*;
        use crate::keyboard::{parse_keys, Key};

        #[test]
        fn test_type_display() {
            let action = Action::Type(parse_keys("foo{esc}").unwrap());
            assert_eq!(action.to_string(), "type foo{esc}");
        }

        #[test]
        fn test_type_holds_keys() {
            let action = Action::Type(vec![Keystroke::Key(Key::Enter)]);
            assert!(matches!(action, Action::Type(ref k) if k.len() == 1));
        }
    }
}
