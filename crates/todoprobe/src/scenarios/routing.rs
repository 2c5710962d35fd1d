use super::{default_todos_hook, step, Scenario, ScenarioGroup};
use crate::locator::Expectation;
use crate::page_object::{ItemParts, TodoPage};
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Routing",
        vec![
            Scenario::new("displays active items", step!(displays_active)),
            Scenario::new("displays all items", step!(displays_all)),
            Scenario::new(
                "highlights the currently applied filter",
                step!(highlights_filter),
            ),
        ],
    )
    .with_before_each(default_todos_hook())
}

async fn complete_second_then_filter(s: &mut Session) -> ProbeResult<()> {
    let todos = s.aliased("todos")?;
    s.check(&todos.nth(1).toggle()).await?;
    s.click(&TodoPage.filter("Active")).await?;
    s.click(&TodoPage.filter("Completed")).await
}

async fn displays_active(s: &mut Session) -> ProbeResult<()> {
    complete_second_then_filter(s).await?;
    let todos = s.aliased("todos")?;

    s.expect(&todos, Expectation::HaveLength(1)).await?;
    s.go_back().await?;
    s.expect(&todos, Expectation::HaveLength(2)).await?;
    s.go_back().await?;
    s.expect(&todos, Expectation::HaveLength(3)).await
}

async fn displays_all(s: &mut Session) -> ProbeResult<()> {
    complete_second_then_filter(s).await?;
    s.click(&TodoPage.filter("All")).await?;
    s.expect(&s.aliased("todos")?, Expectation::HaveLength(3))
        .await
}

async fn highlights_filter(s: &mut Session) -> ProbeResult<()> {
    let selected = || Expectation::have_class("selected");

    s.expect(&TodoPage.filter("All"), selected()).await?;

    let active = TodoPage.filter("Active");
    s.click(&active).await?;
    s.expect(&active, selected()).await?;

    let completed = TodoPage.filter("Completed");
    s.click(&completed).await?;
    s.expect(&completed, selected()).await
}
