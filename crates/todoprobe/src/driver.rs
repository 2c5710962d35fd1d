//! Driver abstraction over the page under test.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ProbeDriver (async trait)                               │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐   ┌──────────────────────────┐ │
//! │  │  ChromiumDriver      │   │  SimulatedApp            │ │
//! │  │  CDP via             │   │  In-memory TodoMVC DOM   │ │
//! │  │  chromiumoxide       │   │  (harness self-tests,    │ │
//! │  │  (`browser` feature) │   │   mutation runs)         │ │
//! │  └──────────────────────┘   └──────────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A driver answers one query or performs one action. Waiting and retrying
//! live in [`crate::session::Session`].

use crate::locator::{Action, ElementState, Selector};
use crate::result::ProbeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1000,
            viewport_height: 660,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Operations every page driver provides
#[async_trait]
pub trait ProbeDriver: Send + Sync {
    /// Short name for logs and reports
    fn name(&self) -> &'static str;

    /// Load a URL
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Reload the current page
    async fn reload(&mut self) -> ProbeResult<()>;

    /// Go back one history entry
    async fn go_back(&mut self) -> ProbeResult<()>;

    /// Clear the application's local and session storage
    async fn clear_storage(&mut self) -> ProbeResult<()>;

    /// Current URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// Snapshot every element the selector matches, in document order
    async fn query(&self, selector: &Selector) -> ProbeResult<Vec<ElementState>>;

    /// Perform an action on the single element the selector matches
    async fn perform(&mut self, selector: &Selector, action: &Action) -> ProbeResult<()>;

    /// PNG screenshot of the viewport; empty when the driver cannot render
    async fn screenshot(&self) -> ProbeResult<Vec<u8>>;

    /// Release the page and any browser process
    async fn close(&mut self) -> ProbeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_default() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert!(config.chromium_path.is_none());
    }

    #[test]
    fn test_browser_config_builder() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_viewport(1280, 720)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox();
        assert!(!config.headless);
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 720);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        assert!(!config.sandbox);
    }

    #[test]
    fn test_browser_config_partial_yaml() {
        let config: BrowserConfig = serde_yaml_ng::from_str("headless: false\n").unwrap();
        assert!(!config.headless);
        assert_eq!(config.viewport_width, BrowserConfig::default().viewport_width);
    }
}
