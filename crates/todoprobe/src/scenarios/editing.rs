use super::{default_todos_hook, step, Scenario, ScenarioGroup};
use crate::fixture::{TODO_ITEM_ONE, TODO_ITEM_THREE, TODO_ITEM_TWO};
use crate::locator::{Expectation, Locator};
use crate::page_object::ItemParts;
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Editing",
        vec![
            Scenario::new("hides other controls while editing", step!(hides_controls)),
            Scenario::new("saves edits on blur", step!(saves_on_blur)),
            Scenario::new("trims entered text", step!(trims_edit)),
            Scenario::new(
                "removes the item when the text is emptied",
                step!(removes_on_empty),
            ),
            Scenario::new("cancels edits on escape", step!(cancels_on_escape)),
        ],
    )
    .with_before_each(default_todos_hook())
}

/// Alias the second item and open its editor
async fn edit_second(s: &mut Session) -> ProbeResult<Locator> {
    let todos = s.aliased("todos")?;
    let second = s.alias("secondTodo", todos.nth(1));
    s.double_click(&second.label()).await?;
    Ok(second)
}

async fn hides_controls(s: &mut Session) -> ProbeResult<()> {
    edit_second(s).await?;
    let second = s.aliased("secondTodo")?;
    s.expect(&second.toggle(), Expectation::NotBeVisible).await?;
    s.expect(&second.label(), Expectation::NotBeVisible).await
}

async fn replace_and_blur(s: &mut Session, text: &str) -> ProbeResult<()> {
    let second = edit_second(s).await?;
    let edit = second.edit();
    s.clear(&edit).await?;
    s.type_text(&edit, text).await?;
    s.blur(&edit).await?;

    let todos = s.aliased("todos")?;
    s.expect(&todos.nth(0), Expectation::contain(TODO_ITEM_ONE))
        .await?;
    s.expect(&second.label(), Expectation::have_text("Something else"))
        .await?;
    s.expect(&todos.nth(2), Expectation::contain(TODO_ITEM_THREE))
        .await
}

async fn saves_on_blur(s: &mut Session) -> ProbeResult<()> {
    replace_and_blur(s, "Something else").await
}

async fn trims_edit(s: &mut Session) -> ProbeResult<()> {
    replace_and_blur(s, "                 Something else              ").await
}

async fn removes_on_empty(s: &mut Session) -> ProbeResult<()> {
    let second = edit_second(s).await?;
    let edit = second.edit();
    s.clear(&edit).await?;
    s.type_text(&edit, "{enter}").await?;

    s.expect(&s.aliased("todos")?, Expectation::HaveLength(2))
        .await
}

async fn cancels_on_escape(s: &mut Session) -> ProbeResult<()> {
    let second = edit_second(s).await?;
    let edit = second.edit();
    s.clear(&edit).await?;
    s.type_text(&edit, "foo{esc}").await?;

    let todos = s.aliased("todos")?;
    s.expect(&todos.nth(0), Expectation::contain(TODO_ITEM_ONE))
        .await?;
    s.expect(&todos.nth(1), Expectation::contain(TODO_ITEM_TWO))
        .await?;
    s.expect(&todos.nth(2), Expectation::contain(TODO_ITEM_THREE))
        .await
}
