use super::{step, Scenario, ScenarioGroup};
use crate::fixture::{
    create_default_todos, create_todo, TODO_ITEM_ONE, TODO_ITEM_THREE, TODO_ITEM_TWO,
};
use crate::locator::Expectation;
use crate::page_object::{ItemParts, TodoPage};
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Add todo",
        vec![
            Scenario::new("adds todo items", step!(adds_items)),
            Scenario::new("clears the input after adding", step!(clears_input)),
            Scenario::new("appends new items to the bottom", step!(appends_to_bottom)),
            Scenario::new("trims text input", step!(trims_input)),
            Scenario::new("shows main and footer once a todo exists", step!(shows_main_and_footer)),
        ],
    )
}

async fn adds_items(s: &mut Session) -> ProbeResult<()> {
    let items = TodoPage.items();

    create_todo(s, TODO_ITEM_ONE).await?;
    s.expect(&items.nth(0).label(), Expectation::contain(TODO_ITEM_ONE))
        .await?;

    create_todo(s, TODO_ITEM_TWO).await?;
    s.expect(&items.nth(1).label(), Expectation::contain(TODO_ITEM_TWO))
        .await
}

async fn clears_input(s: &mut Session) -> ProbeResult<()> {
    let input = TodoPage.new_todo();
    s.type_text(&input, TODO_ITEM_ONE).await?;
    s.type_text(&input, "{enter}").await?;
    s.expect(&input, Expectation::have_value("")).await
}

async fn appends_to_bottom(s: &mut Session) -> ProbeResult<()> {
    let todos = create_default_todos(s).await?;
    let todos = s.alias("todos", todos.into_locator());

    s.expect(&TodoPage.todo_count(), Expectation::contain("3 items left"))
        .await?;

    s.expect(&todos.nth(0).label(), Expectation::contain(TODO_ITEM_ONE))
        .await?;
    s.expect(&todos.nth(1).label(), Expectation::contain(TODO_ITEM_TWO))
        .await?;
    s.expect(&todos.nth(2).label(), Expectation::contain(TODO_ITEM_THREE))
        .await
}

async fn trims_input(s: &mut Session) -> ProbeResult<()> {
    create_todo(s, &format!("     {TODO_ITEM_TWO}         ")).await?;
    s.expect(&TodoPage.items().nth(0), Expectation::have_text(TODO_ITEM_TWO))
        .await
}

async fn shows_main_and_footer(s: &mut Session) -> ProbeResult<()> {
    create_todo(s, TODO_ITEM_ONE).await?;
    s.expect(&TodoPage.main(), Expectation::BeVisible).await?;
    s.expect(&TodoPage.footer(), Expectation::BeVisible).await
}
