use super::{default_todos_hook, step, Scenario, ScenarioGroup};
use crate::fixture::{TODO_ITEM_ONE, TODO_ITEM_THREE};
use crate::locator::Expectation;
use crate::page_object::{ItemParts, TodoPage};
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Clear completed button",
        vec![
            Scenario::new("removes completed items when clicked", step!(removes_completed)),
            Scenario::new(
                "is hidden when there are no completed items",
                step!(hidden_without_completed),
            ),
        ],
    )
    .with_before_each(default_todos_hook())
}

async fn removes_completed(s: &mut Session) -> ProbeResult<()> {
    let todos = s.aliased("todos")?;
    s.check(&todos.nth(1).toggle()).await?;
    s.click(&TodoPage.clear_completed()).await?;

    s.expect(&todos, Expectation::HaveLength(2)).await?;
    s.expect(&todos.nth(0), Expectation::contain(TODO_ITEM_ONE))
        .await?;
    s.expect(&todos.nth(1), Expectation::contain(TODO_ITEM_THREE))
        .await
}

async fn hidden_without_completed(s: &mut Session) -> ProbeResult<()> {
    let todos = s.aliased("todos")?;
    let button = TodoPage.clear_completed();

    s.check(&todos.nth(1).toggle()).await?;
    s.expect(&button, Expectation::BeVisible).await?;
    s.click(&button).await?;
    s.expect(&button, Expectation::NotExist).await
}
