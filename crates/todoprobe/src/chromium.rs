//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! Selectors are compiled to JavaScript and evaluated in the page. Text is
//! delivered with `Input.insertText` and special keys with
//! `Input.dispatchKeyEvent`, so the application sees real keyboard events.

#![allow(
    clippy::significant_drop_tightening,
    clippy::missing_errors_doc,
    clippy::cast_possible_wrap
)]

use crate::driver::{BrowserConfig, ProbeDriver};
use crate::keyboard::{Key, Keystroke};
use crate::locator::{Action, ElementState, Selector};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, InsertTextParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Global the resolved action target is parked in between CDP calls
const TARGET: &str = "window.__todoprobe_target";

/// How long `go_back` waits for the URL to change
const HISTORY_TIMEOUT: Duration = Duration::from_secs(2);

/// Chromium browser with a single page
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: CdpPage,
    handle: tokio::task::JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch a new browser instance
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched or the page created
    pub async fn launch(config: &BrowserConfig) -> ProbeResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| ProbeError::BrowserLaunchError { message })?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
            ProbeError::BrowserLaunchError {
                message: e.to_string(),
            }
        })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::page(e.to_string()))?;

        debug!(headless = config.headless, "chromium launched");

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page,
            handle,
        })
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> ProbeResult<T> {
        let result = self
            .page
            .evaluate(expr)
            .await
            .map_err(|e| ProbeError::page(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| ProbeError::page(e.to_string()))
    }

    /// Evaluate a statement against the parked target
    async fn on_target(&self, body: &str) -> ProbeResult<()> {
        let _: bool = self
            .eval(format!("(() => {{ const el = {TARGET}; {body}; return true; }})()"))
            .await?;
        Ok(())
    }

    /// Resolve the selector to exactly one element and park it in [`TARGET`]
    async fn resolve(&self, selector: &Selector) -> ProbeResult<()> {
        let found: usize = self
            .eval(format!(
                "(() => {{ const els = {}; if (els.length === 1) {{ {TARGET} = els[0]; }} return els.length; }})()",
                selector.to_query_all()
            ))
            .await?;
        if found == 1 {
            Ok(())
        } else {
            Err(ProbeError::ElementNotActionable {
                subject: selector.to_string(),
                found,
            })
        }
    }

    async fn focus_at_end(&self) -> ProbeResult<()> {
        self.on_target(
            "el.focus(); \
             if (typeof el.value === 'string' && typeof el.setSelectionRange === 'function') { \
               const n = el.value.length; try { el.setSelectionRange(n, n); } catch (_) {} \
             }",
        )
        .await
    }

    async fn insert_text(&self, text: &str) -> ProbeResult<()> {
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(|e| ProbeError::input(e.to_string()))?;
        Ok(())
    }

    async fn press(&self, key: Key) -> ProbeResult<()> {
        let down_type = if key.text().is_some() {
            DispatchKeyEventType::KeyDown
        } else {
            DispatchKeyEventType::RawKeyDown
        };

        let mut down = DispatchKeyEventParams::builder()
            .r#type(down_type)
            .key(key.dom_key())
            .code(key.dom_key())
            .windows_virtual_key_code(key.key_code())
            .native_virtual_key_code(key.key_code());
        if let Some(text) = key.text() {
            down = down.text(text);
        }
        let down = down.build().map_err(ProbeError::input)?;

        let up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key(key.dom_key())
            .code(key.dom_key())
            .windows_virtual_key_code(key.key_code())
            .native_virtual_key_code(key.key_code())
            .build()
            .map_err(ProbeError::input)?;

        for params in [down, up] {
            self.page
                .execute(params)
                .await
                .map_err(|e| ProbeError::input(e.to_string()))?;
        }
        Ok(())
    }

    async fn type_keys(&self, keys: &[Keystroke]) -> ProbeResult<()> {
        self.focus_at_end().await?;
        for key in keys {
            match key {
                Keystroke::Text(text) => self.insert_text(text).await?,
                Keystroke::Key(key) => self.press(*key).await?,
            }
        }
        Ok(())
    }
}

fn snapshot_script(selector: &Selector) -> String {
    format!(
        "({}).map(el => {{ \
           const style = getComputedStyle(el); \
           return {{ \
             tag: el.tagName.toLowerCase(), \
             text: el.textContent || '', \
             classes: Array.from(el.classList), \
             visible: el.getClientRects().length > 0 && style.visibility !== 'hidden', \
             checked: el.type === 'checkbox' && !!el.checked, \
             value: typeof el.value === 'string' ? el.value : null, \
             focused: el === document.activeElement \
           }}; \
         }})",
        selector.to_query_all()
    )
}

#[async_trait]
impl ProbeDriver for ChromiumDriver {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ProbeError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn reload(&mut self) -> ProbeResult<()> {
        self.page
            .reload()
            .await
            .map_err(|e| ProbeError::page(e.to_string()))?;
        Ok(())
    }

    async fn go_back(&mut self) -> ProbeResult<()> {
        let before = self.current_url().await?;
        let _: bool = self.eval("(history.back(), true)".to_string()).await?;

        let start = Instant::now();
        while start.elapsed() < HISTORY_TIMEOUT {
            if self.current_url().await? != before {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        Err(ProbeError::NavigationError {
            url: before,
            message: "history.back() did not change the URL".to_string(),
        })
    }

    async fn clear_storage(&mut self) -> ProbeResult<()> {
        let _: bool = self
            .eval("(localStorage.clear(), sessionStorage.clear(), true)".to_string())
            .await?;
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        self.eval("location.href".to_string()).await
    }

    async fn query(&self, selector: &Selector) -> ProbeResult<Vec<ElementState>> {
        self.eval(snapshot_script(selector)).await
    }

    async fn perform(&mut self, selector: &Selector, action: &Action) -> ProbeResult<()> {
        self.resolve(selector).await?;
        match action {
            Action::Type(keys) => self.type_keys(keys).await,
            Action::Click => self.on_target("el.click()").await,
            Action::DoubleClick => {
                self.on_target(
                    "el.dispatchEvent(new MouseEvent('dblclick', \
                     { bubbles: true, cancelable: true, detail: 2 }))",
                )
                .await
            }
            Action::Check | Action::Uncheck => {
                let want = matches!(action, Action::Check);
                self.on_target(&format!(
                    "if (el.type !== 'checkbox') {{ throw new Error('not a checkbox'); }} \
                     if (el.checked !== {want}) {{ el.click(); }}"
                ))
                .await
            }
            Action::Clear => {
                self.on_target("el.focus(); if (typeof el.select === 'function') { el.select(); }")
                    .await?;
                self.press(Key::Backspace).await
            }
            Action::Blur => self.on_target("el.blur()").await,
            Action::Focus => self.on_target("el.focus()").await,
        }
    }

    async fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot =
            self.page
                .execute(params)
                .await
                .map_err(|e| ProbeError::ScreenshotError {
                    message: e.to_string(),
                })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| ProbeError::ScreenshotError {
                message: e.to_string(),
            })
    }

    async fn close(&mut self) -> ProbeResult<()> {
        let mut browser = self.browser.lock().await;
        let result = browser.close().await;
        self.handle.abort();
        result.map_err(|e| ProbeError::BrowserLaunchError {
            message: e.to_string(),
        })?;
        Ok(())
    }
}
