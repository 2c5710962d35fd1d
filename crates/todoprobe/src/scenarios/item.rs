use super::{step, Scenario, ScenarioGroup};
use crate::fixture::{create_todo, TODO_ITEM_ONE, TODO_ITEM_TWO};
use crate::locator::Expectation;
use crate::page_object::ItemParts;
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Item",
        vec![
            Scenario::new("marks items as complete", step!(marks_complete)),
            Scenario::new("un-marks items as complete", step!(unmarks_complete)),
        ],
    )
}

async fn two_todos(s: &mut Session) -> ProbeResult<()> {
    let first = create_todo(s, TODO_ITEM_ONE).await?;
    s.alias("firstTodo", first);
    let second = create_todo(s, TODO_ITEM_TWO).await?;
    s.alias("secondTodo", second);
    Ok(())
}

async fn marks_complete(s: &mut Session) -> ProbeResult<()> {
    two_todos(s).await?;
    let first = s.aliased("firstTodo")?;
    let second = s.aliased("secondTodo")?;

    s.check(&first.toggle()).await?;
    s.expect(&first, Expectation::have_class("completed")).await?;

    s.expect(&second, Expectation::not_have_class("completed"))
        .await?;
    s.check(&second.toggle()).await?;

    s.expect(&first, Expectation::have_class("completed")).await?;
    s.expect(&second, Expectation::have_class("completed")).await
}

async fn unmarks_complete(s: &mut Session) -> ProbeResult<()> {
    two_todos(s).await?;
    let first = s.aliased("firstTodo")?;
    let second = s.aliased("secondTodo")?;

    s.check(&first.toggle()).await?;
    s.expect(&first, Expectation::have_class("completed")).await?;
    s.expect(&second, Expectation::not_have_class("completed"))
        .await?;

    s.uncheck(&first.toggle()).await?;
    s.expect(&first, Expectation::not_have_class("completed"))
        .await?;
    s.expect(&second, Expectation::not_have_class("completed"))
        .await
}
