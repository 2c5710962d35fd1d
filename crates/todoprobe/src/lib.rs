//! todoprobe: end-to-end behavioral tests for TodoMVC applications
//!
//! Drives a TodoMVC page the way a user would (typing, clicking, checking,
//! reloading, going back) and asserts on the rendered DOM.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   TODOPROBE Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌──────────────────────┐  │
//! │   │ Scenarios  │    │ Session    │    │ ProbeDriver          │  │
//! │   │ + fixtures │───►│ aliases,   │───►│  ChromiumDriver (CDP)│  │
//! │   │            │    │ retrying   │    │  SimulatedApp        │  │
//! │   └────────────┘    └────────────┘    └──────────────────────┘  │
//! │         ▲                                                        │
//! │   ┌─────┴──────┐    ┌────────────┐                               │
//! │   │ SuiteRunner│───►│ SuiteReport│  text / JSON / JUnit          │
//! │   └────────────┘    └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use todoprobe::{SimulatedApp, Session, SuiteRunner, RetryConfig};
//!
//! # async fn demo() {
//! let mut session = Session::new(Box::new(SimulatedApp::new()), "http://localhost:8080")
//!     .with_retry(RetryConfig::fast());
//! let report = SuiteRunner::default().run(&mut session).await;
//! println!("{}", report.summary());
//! # }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "browser")]
mod chromium;
pub mod config;
mod driver;
pub mod fixture;
mod keyboard;
mod locator;
pub mod mutation;
pub mod page_object;
mod reporter;
mod result;
mod retry;
pub mod runner;
pub mod scenarios;
mod session;
pub mod simulated;

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use config::SuiteConfig;
pub use driver::{BrowserConfig, ProbeDriver};
pub use fixture::{create_default_todos, create_todo, TodoList};
pub use keyboard::{parse_keys, Key, Keystroke};
pub use locator::{Action, ElementState, Expectation, Locator, Selector};
pub use mutation::{MutationReport, MutationRun, MutationScore, MutantResult};
pub use page_object::{ItemParts, PageObject, TodoPage};
pub use reporter::{ReportFormat, ScenarioOutcome, ScenarioStatus, SuiteReport};
pub use result::{ProbeError, ProbeResult};
pub use retry::{
    poll_until, AssertionCheckResult, RetryConfig, RetryError, RetryOutcome, RetryResult,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use runner::{FailureMode, RunEvent, SuiteRunner};
pub use scenarios::{all_groups, scenario_count, Scenario, ScenarioGroup};
pub use session::Session;
pub use simulated::{AppDefect, SimulatedApp};
