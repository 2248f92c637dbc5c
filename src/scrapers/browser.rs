use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::traits::{wait_for, Navigator};
use crate::scrapers::types::ScrapeConfig;
use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Classifies the first match of a selector and clicks it when nothing
/// else sits on top of it. `__SELECTOR__` is replaced with a JSON string.
///
/// Links to another document leave `window.__scoutNavigating` behind; the
/// marker disappears with the old window once the new page commits.
const CLICK_SCRIPT: &str = r##"(() => {
    const el = document.querySelector(__SELECTOR__);
    if (!el) return "missing";
    if (el.disabled) return "disabled";
    const style = window.getComputedStyle(el);
    if (style.display === "none" || style.visibility === "hidden") return "hidden";
    el.scrollIntoView({ block: "center", inline: "center" });
    const rect = el.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0) return "hidden";
    const x = rect.left + rect.width / 2;
    const y = rect.top + rect.height / 2;
    const hit = document.elementFromPoint(x, y);
    if (hit && hit !== el && !el.contains(hit)) return "obstructed";
    const navigates = el.tagName === "A" && !!el.href
        && el.href.split("#")[0] !== location.href.split("#")[0];
    if (navigates) window.__scoutNavigating = true;
    el.click();
    return navigates ? "navigating" : "clicked";
})()"##;

/// True once the clicked page's window is gone and its successor has loaded
const NAVIGATION_SETTLED: &str =
    r#"window.__scoutNavigating === undefined && document.readyState === "complete""#;

/// What the click probe found on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickOutcome {
    Clicked,
    Navigating,
    Missing,
    Disabled,
    Hidden,
    Obstructed,
}

impl ClickOutcome {
    fn parse(value: Option<&Value>) -> Option<Self> {
        match value?.as_str()? {
            "clicked" => Some(Self::Clicked),
            "navigating" => Some(Self::Navigating),
            "missing" => Some(Self::Missing),
            "disabled" => Some(Self::Disabled),
            "hidden" => Some(Self::Hidden),
            "obstructed" => Some(Self::Obstructed),
            _ => None,
        }
    }

    fn into_result(self, selector: &str) -> ScrapeResult<()> {
        let selector = selector.to_string();
        match self {
            Self::Clicked | Self::Navigating => Ok(()),
            Self::Missing => Err(ScrapeError::NotFound { selector }),
            Self::Obstructed => Err(ScrapeError::Obstructed { selector }),
            Self::Disabled => Err(ScrapeError::NotInteractable {
                selector,
                reason: "disabled".to_string(),
            }),
            Self::Hidden => Err(ScrapeError::NotInteractable {
                selector,
                reason: "not rendered".to_string(),
            }),
        }
    }
}

fn selector_literal(selector: &str) -> String {
    // serializing a &str cannot fail
    serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string())
}

/// Poll `evaluate(NAVIGATION_SETTLED)` until the page behind a clicked link
/// has replaced the old one
fn wait_for_navigation<F>(
    selector: &str,
    timeout: Duration,
    interval: Duration,
    mut evaluate: F,
) -> ScrapeResult<()>
where
    F: FnMut(&str) -> ScrapeResult<Option<Value>>,
{
    wait_for(selector, timeout, interval, || {
        let settled = evaluate(NAVIGATION_SETTLED)?;
        Ok(settled.as_ref().and_then(Value::as_bool).unwrap_or(false))
    })
}

/// One headless Chrome process with a single tab, shared by every target
pub struct ChromeSession {
    browser: Browser,
    tab: Arc<Tab>,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl ChromeSession {
    /// Launch headless Chrome and open the working tab
    pub fn launch(config: &ScrapeConfig) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(config.wait_timeout);

        Ok(Self {
            browser,
            tab,
            wait_timeout: config.wait_timeout,
            poll_interval: config.poll_interval,
        })
    }

    /// Close the tab; dropping the browser kills the Chrome process
    pub fn close(self) {
        if let Err(err) = self.tab.close(true) {
            warn!("Failed to close tab cleanly: {}", err);
        }
        drop(self.browser);
        info!("Browser session closed");
    }

    fn evaluate(&self, script: &str) -> ScrapeResult<Option<Value>> {
        let result = self.tab.evaluate(script, false)?;
        Ok(result.value)
    }
}

impl Navigator for ChromeSession {
    fn open(&self, url: &str) -> ScrapeResult<()> {
        debug!("Opening {}", url);
        self.tab.navigate_to(url)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn click(&self, selector: &str) -> ScrapeResult<()> {
        let script = CLICK_SCRIPT.replace("__SELECTOR__", &selector_literal(selector));
        let value = self.evaluate(&script)?;
        let outcome = ClickOutcome::parse(value.as_ref()).ok_or_else(|| {
            ScrapeError::Browser(anyhow::anyhow!("unexpected click probe result: {:?}", value))
        })?;
        debug!("Click {} -> {:?}", selector, outcome);
        outcome.into_result(selector)?;

        if outcome == ClickOutcome::Navigating {
            wait_for_navigation(selector, self.wait_timeout, self.poll_interval, |script| {
                self.evaluate(script)
            })?;
        }
        Ok(())
    }

    fn wait_until_present(&self, selector: &str, timeout: Duration) -> ScrapeResult<()> {
        debug!("Waiting up to {:?} for {}", timeout, selector);
        wait_for(selector, timeout, self.poll_interval, || Ok(self.count(selector)? > 0))
    }

    fn count(&self, selector: &str) -> ScrapeResult<usize> {
        let script = format!("document.querySelectorAll({}).length", selector_literal(selector));
        let value = self.evaluate(&script)?;
        let count = value.as_ref().and_then(Value::as_u64).unwrap_or(0);
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }

    fn page_html(&self) -> ScrapeResult<String> {
        let value = self.evaluate("document.documentElement.outerHTML")?;
        match value {
            Some(Value::String(html)) => Ok(html),
            other => Err(ScrapeError::Browser(anyhow::anyhow!(
                "could not read page HTML: {:?}",
                other
            ))),
        }
    }
}
