//! Scenario session: one driver, one base URL, one alias registry.
//!
//! Every action waits until its locator matches exactly one element, and
//! every expectation is retried until it holds or the command timeout
//! elapses.

use crate::driver::ProbeDriver;
use crate::keyboard::{parse_keys, Keystroke};
use crate::locator::{Action, ElementState, Expectation, Locator};
use crate::page_object::{PageObject, TodoPage};
use crate::result::{ProbeError, ProbeResult};
use crate::retry::{poll_until, AssertionCheckResult, RetryConfig, RetryOutcome};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Driver plus per-scenario state
pub struct Session {
    driver: Box<dyn ProbeDriver>,
    base_url: String,
    retry: RetryConfig,
    aliases: HashMap<String, Locator>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("driver", &self.driver.name())
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("aliases", &self.aliases.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Session {
    /// Create a session over a driver
    #[must_use]
    pub fn new(driver: Box<dyn ProbeDriver>, base_url: impl Into<String>) -> Self {
        Self {
            driver,
            base_url: base_url.into(),
            retry: RetryConfig::default(),
            aliases: HashMap::new(),
        }
    }

    /// Set the retry configuration
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Retry configuration in use
    #[must_use]
    pub const fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    /// Application root URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Driver name
    #[must_use]
    pub fn driver_name(&self) -> &'static str {
        self.driver.name()
    }

    /// Resolve a path against the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Load a path relative to the base URL
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn visit(&mut self, path: &str) -> ProbeResult<()> {
        let url = self.url_for(path);
        debug!(%url, "visit");
        self.driver.navigate(&url).await
    }

    /// Forget aliases, wipe application storage and load the app page
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub async fn fresh_page(&mut self) -> ProbeResult<()> {
        let page = TodoPage;
        debug!(page = page.page_name(), "fresh page");
        self.clear_aliases();
        self.visit(page.url_pattern()).await?;
        self.driver.clear_storage().await?;
        self.driver.reload().await
    }

    /// Reload the current page
    ///
    /// # Errors
    ///
    /// Returns error if the reload fails
    pub async fn reload(&mut self) -> ProbeResult<()> {
        debug!("reload");
        self.driver.reload().await
    }

    /// Go back one history entry
    ///
    /// # Errors
    ///
    /// Returns error if there is no previous entry
    pub async fn go_back(&mut self) -> ProbeResult<()> {
        debug!("back");
        self.driver.go_back().await
    }

    /// Current URL
    ///
    /// # Errors
    ///
    /// Returns error if the driver cannot report it
    pub async fn current_url(&self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    // ------------------------------------------------------------------
    // Locators and aliases
    // ------------------------------------------------------------------

    /// Locator for a CSS selector
    #[must_use]
    pub fn get(&self, css: &str) -> Locator {
        Locator::new(css)
    }

    /// Locator for the focused element
    #[must_use]
    pub fn focused(&self) -> Locator {
        Locator::focused()
    }

    /// Register a locator under `name` and return it with that name attached
    pub fn alias(&mut self, name: &str, locator: Locator) -> Locator {
        let named = locator.named(name);
        self.aliases.insert(name.to_string(), named.clone());
        named
    }

    /// Look up an alias registered in this scenario
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::UnknownAlias`] if the name was never registered
    pub fn aliased(&self, name: &str) -> ProbeResult<Locator> {
        self.aliases
            .get(name.trim_start_matches('@'))
            .cloned()
            .ok_or_else(|| ProbeError::UnknownAlias {
                name: name.trim_start_matches('@').to_string(),
            })
    }

    /// Drop every alias
    pub fn clear_aliases(&mut self) {
        self.aliases.clear();
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Type a string; `{enter}`, `{esc}` and `{backspace}` are special keys
    ///
    /// # Errors
    ///
    /// Returns error on an unknown key token or if the target is not actionable
    pub async fn type_text(&mut self, locator: &Locator, text: &str) -> ProbeResult<()> {
        let keys = parse_keys(text)?;
        self.act(locator, Action::Type(keys)).await
    }

    /// Type pre-parsed keystrokes
    ///
    /// # Errors
    ///
    /// Returns error if the target is not actionable
    pub async fn type_keys(&mut self, locator: &Locator, keys: Vec<Keystroke>) -> ProbeResult<()> {
        self.act(locator, Action::Type(keys)).await
    }

    /// Click
    ///
    /// # Errors
    ///
    /// Returns error if the target is not actionable
    pub async fn click(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.act(locator, Action::Click).await
    }

    /// Double-click
    ///
    /// # Errors
    ///
    /// Returns error if the target is not actionable
    pub async fn double_click(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.act(locator, Action::DoubleClick).await
    }

    /// Check a checkbox (no click when already checked)
    ///
    /// # Errors
    ///
    /// Returns error if the target is not an actionable checkbox
    pub async fn check(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.act(locator, Action::Check).await
    }

    /// Uncheck a checkbox (no click when already unchecked)
    ///
    /// # Errors
    ///
    /// Returns error if the target is not an actionable checkbox
    pub async fn uncheck(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.act(locator, Action::Uncheck).await
    }

    /// Empty a text field
    ///
    /// # Errors
    ///
    /// Returns error if the target is not an actionable text field
    pub async fn clear(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.act(locator, Action::Clear).await
    }

    /// Remove focus from an element
    ///
    /// # Errors
    ///
    /// Returns error if the target is not actionable
    pub async fn blur(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.act(locator, Action::Blur).await
    }

    /// Give focus to an element
    ///
    /// # Errors
    ///
    /// Returns error if the target is not actionable
    pub async fn focus(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.act(locator, Action::Focus).await
    }

    async fn act(&mut self, locator: &Locator, action: Action) -> ProbeResult<()> {
        debug!(subject = %locator, %action, "action");
        self.wait_for_single(locator).await?;
        self.driver
            .perform(locator.selector(), &action)
            .await
            .map_err(|e| match e {
                ProbeError::ElementNotActionable { found, .. } => ProbeError::ElementNotActionable {
                    subject: locator.description(),
                    found,
                },
                other => other,
            })
    }

    async fn wait_for_single(&self, locator: &Locator) -> ProbeResult<()> {
        let driver = &*self.driver;
        let selector = locator.selector();
        let found = AtomicUsize::new(0);
        let last = &found;

        let outcome = poll_until(self.retry, move || async move {
            let n = driver.query(selector).await?.len();
            last.store(n, Ordering::Relaxed);
            Ok::<_, ProbeError>(if n == 1 {
                AssertionCheckResult::Pass
            } else {
                AssertionCheckResult::Fail(format!("{n} element(s) matched"))
            })
        })
        .await?;

        match outcome {
            RetryOutcome::Passed(_) => Ok(()),
            RetryOutcome::Exhausted(_) => Err(ProbeError::ElementNotActionable {
                subject: locator.description(),
                found: found.load(Ordering::Relaxed),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    /// Retry until the locator satisfies the expectation
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::AssertionFailed`] with the last observation if
    /// the expectation never held within the command timeout
    pub async fn expect(&self, locator: &Locator, expectation: Expectation) -> ProbeResult<()> {
        let driver = &*self.driver;
        let selector = locator.selector();
        let wanted = &expectation;

        let outcome = poll_until(self.retry, move || async move {
            let elements = driver.query(selector).await?;
            Ok::<_, ProbeError>(wanted.check(&elements))
        })
        .await?;

        match outcome {
            RetryOutcome::Passed(result) => {
                debug!(subject = %locator, %expectation, attempts = result.attempts, "expectation held");
                Ok(())
            }
            RetryOutcome::Exhausted(err) => Err(ProbeError::AssertionFailed {
                subject: locator.description(),
                expected: expectation.to_string(),
                actual: err.message,
            }),
        }
    }

    /// Current state of every matched element, without waiting
    ///
    /// # Errors
    ///
    /// Returns error if the driver query fails
    pub async fn snapshot(&self, locator: &Locator) -> ProbeResult<Vec<ElementState>> {
        self.driver.query(locator.selector()).await
    }

    /// Number of elements matched right now
    ///
    /// # Errors
    ///
    /// Returns error if the driver query fails
    pub async fn count(&self, locator: &Locator) -> ProbeResult<usize> {
        Ok(self.snapshot(locator).await?.len())
    }

    /// PNG screenshot; empty when the driver cannot render
    ///
    /// # Errors
    ///
    /// Returns error if capture fails
    pub async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Close the driver
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails to shut down
    pub async fn close(&mut self) -> ProbeResult<()> {
        self.driver.close().await
    }
}
