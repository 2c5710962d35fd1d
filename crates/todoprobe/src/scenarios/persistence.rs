use super::{step, Scenario, ScenarioGroup};
use crate::fixture::{create_todo, TODO_ITEM_ONE, TODO_ITEM_TWO};
use crate::locator::Expectation;
use crate::page_object::ItemParts;
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Persistence",
        vec![Scenario::new("persists its data", step!(persists))],
    )
}

async fn expect_state(s: &Session) -> ProbeResult<()> {
    let first = s.aliased("firstTodo")?;
    let second = s.aliased("secondTodo")?;

    s.expect(&first, Expectation::contain(TODO_ITEM_ONE)).await?;
    s.expect(&first, Expectation::have_class("completed")).await?;
    s.expect(&second, Expectation::contain(TODO_ITEM_TWO)).await?;
    s.expect(&second, Expectation::not_have_class("completed"))
        .await
}

async fn persists(s: &mut Session) -> ProbeResult<()> {
    let first = create_todo(s, TODO_ITEM_ONE).await?;
    let first = s.alias("firstTodo", first);
    let second = create_todo(s, TODO_ITEM_TWO).await?;
    s.alias("secondTodo", second);
    s.check(&first.toggle()).await?;

    expect_state(s).await?;
    s.reload().await?;
    expect_state(s).await
}
