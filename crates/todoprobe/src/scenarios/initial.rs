use super::{step, Scenario, ScenarioGroup};
use crate::locator::Expectation;
use crate::page_object::TodoPage;
use crate::result::ProbeResult;
use crate::session::Session;

pub fn group() -> ScenarioGroup {
    ScenarioGroup::new(
        "Initial page",
        vec![
            Scenario::new("focuses the todo input", step!(focuses_input)),
            Scenario::new("has no list items", step!(no_items)),
            Scenario::new("has no main section", step!(no_main)),
            Scenario::new("has no footer", step!(no_footer)),
        ],
    )
}

async fn focuses_input(s: &mut Session) -> ProbeResult<()> {
    s.expect(&s.focused(), Expectation::have_class("new-todo")).await
}

async fn no_items(s: &mut Session) -> ProbeResult<()> {
    s.expect(&TodoPage.items(), Expectation::NotExist).await
}

async fn no_main(s: &mut Session) -> ProbeResult<()> {
    s.expect(&TodoPage.main(), Expectation::NotExist).await
}

async fn no_footer(s: &mut Session) -> ProbeResult<()> {
    s.expect(&TodoPage.footer(), Expectation::NotExist).await
}
