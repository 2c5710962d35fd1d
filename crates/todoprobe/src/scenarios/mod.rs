//! The TodoMVC scenario set.
//!
//! Groups run in feature order. Before each scenario the runner loads a
//! fresh page; a group's `before_each` hook then runs, and only then the
//! scenario body. Scenarios address elements through aliases registered in
//! the same scenario (or its hook) and never share state otherwise.

mod clear_completed;
mod counter;
mod creation;
mod editing;
mod initial;
mod item;
mod mark_all;
mod persistence;
mod routing;

use crate::fixture::create_default_todos;
use crate::result::ProbeResult;
use crate::session::Session;
use futures::future::BoxFuture;

/// Boxed async scenario step
pub type ScenarioFn = for<'a> fn(&'a mut Session) -> BoxFuture<'a, ProbeResult<()>>;

/// Box an `async fn(&mut Session) -> ProbeResult<()>` into a [`ScenarioFn`]
macro_rules! step {
    ($f:path) => {{
        fn run(session: &mut $crate::session::Session) -> ::futures::future::BoxFuture<'_, $crate::result::ProbeResult<()>> {
            Box::pin($f(session))
        }
        run as $crate::scenarios::ScenarioFn
    }};
}
pub(crate) use step;

/// One named scenario
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Scenario title
    pub name: &'static str,
    /// Scenario body
    pub body: ScenarioFn,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

impl Scenario {
    /// Create a scenario
    #[must_use]
    pub const fn new(name: &'static str, body: ScenarioFn) -> Self {
        Self { name, body }
    }
}

/// Scenarios of one feature area with an optional shared setup
#[derive(Clone)]
pub struct ScenarioGroup {
    /// Feature area title
    pub name: &'static str,
    /// Runs after the fresh page load, before each scenario
    pub before_each: Option<ScenarioFn>,
    /// Scenarios in order
    pub scenarios: Vec<Scenario>,
}

impl std::fmt::Debug for ScenarioGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioGroup")
            .field("name", &self.name)
            .field("before_each", &self.before_each.is_some())
            .field("scenarios", &self.scenarios)
            .finish()
    }
}

impl ScenarioGroup {
    /// Create a group without setup
    #[must_use]
    pub const fn new(name: &'static str, scenarios: Vec<Scenario>) -> Self {
        Self {
            name,
            before_each: None,
            scenarios,
        }
    }

    /// Set the before-each hook
    #[must_use]
    pub const fn with_before_each(mut self, hook: ScenarioFn) -> Self {
        self.before_each = Some(hook);
        self
    }

    /// `"group / scenario"` identifier used by filters and reports
    #[must_use]
    pub fn qualified_name(&self, scenario: &Scenario) -> String {
        format!("{} / {}", self.name, scenario.name)
    }
}

/// Create the default todos and alias them as `todos`
async fn with_default_todos(session: &mut Session) -> ProbeResult<()> {
    let todos = create_default_todos(session).await?;
    session.alias("todos", todos.into_locator());
    Ok(())
}

pub(crate) fn default_todos_hook() -> ScenarioFn {
    step!(with_default_todos)
}

/// Every group in run order
#[must_use]
pub fn all_groups() -> Vec<ScenarioGroup> {
    vec![
        initial::group(),
        creation::group(),
        mark_all::group(),
        item::group(),
        editing::group(),
        counter::group(),
        clear_completed::group(),
        persistence::group(),
        routing::group(),
    ]
}

/// Total number of scenarios
#[must_use]
pub fn scenario_count() -> usize {
    all_groups().iter().map(|g| g.scenarios.len()).sum()
}
