use super::{default_todos_hook, step, Scenario, ScenarioGroup};
use crate::locator::Expectation;
use crate::page_object::{ItemParts, TodoPage};
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Mark all as complete",
        vec![
            Scenario::new("marks all items as completed", step!(marks_all)),
            Scenario::new("clears the complete state of all items", step!(clears_all)),
            Scenario::new(
                "toggle-all follows item completion",
                step!(toggle_all_follows_items),
            ),
        ],
    )
    .with_before_each(default_todos_hook())
}

async fn marks_all(s: &mut Session) -> ProbeResult<()> {
    s.check(&TodoPage.toggle_all()).await?;

    let todos = s.aliased("todos")?;
    for i in 0..3 {
        s.expect(&todos.nth(i), Expectation::have_class("completed"))
            .await?;
    }
    Ok(())
}

async fn clears_all(s: &mut Session) -> ProbeResult<()> {
    let toggle_all = TodoPage.toggle_all();
    s.check(&toggle_all).await?;
    s.uncheck(&toggle_all).await?;

    let todos = s.aliased("todos")?;
    for i in 0..3 {
        s.expect(&todos.nth(i), Expectation::not_have_class("completed"))
            .await?;
    }
    Ok(())
}

async fn toggle_all_follows_items(s: &mut Session) -> ProbeResult<()> {
    let toggle_all = s.alias("toggleAll", TodoPage.toggle_all());
    s.check(&toggle_all).await?;
    s.expect(&toggle_all, Expectation::BeChecked).await?;

    let first = s.alias("firstTodo", TodoPage.items().nth(0));
    s.uncheck(&first.toggle()).await?;
    s.expect(&s.aliased("toggleAll")?, Expectation::NotBeChecked)
        .await?;

    s.check(&s.aliased("firstTodo")?.toggle()).await?;
    s.expect(&s.aliased("toggleAll")?, Expectation::BeChecked)
        .await
}
