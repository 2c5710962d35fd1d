use super::{step, Scenario, ScenarioGroup};
use crate::fixture::{create_todo, TODO_ITEM_ONE, TODO_ITEM_TWO};
use crate::locator::Expectation;
use crate::page_object::TodoPage;
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Counter",
        vec![Scenario::new(
            "displays the current number of todo items",
            step!(displays_count),
        )],
    )
}

async fn displays_count(s: &mut Session) -> ProbeResult<()> {
    let count = TodoPage.todo_count();

    create_todo(s, TODO_ITEM_ONE).await?;
    s.expect(&count, Expectation::contain("1 item left")).await?;

    create_todo(s, TODO_ITEM_TWO).await?;
    s.expect(&count, Expectation::contain("2 items left")).await
}
