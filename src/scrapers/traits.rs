use crate::scrapers::error::{ScrapeError, ScrapeResult};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Browser actions the scraping routines are written against.
/// `ChromeSession` drives a real tab; tests script the outcomes.
pub trait Navigator {
    /// Load `url` and wait for the navigation to settle
    fn open(&self, url: &str) -> ScrapeResult<()>;

    /// Activate the first element matching `selector`.
    ///
    /// Fails with `NotFound` when nothing matches, `Obstructed` when another
    /// element covers the target and `NotInteractable` when the target is
    /// disabled or not rendered. When the element is a link, returns only
    /// once the linked document has loaded.
    fn click(&self, selector: &str) -> ScrapeResult<()>;

    /// Block until `selector` matches something or `timeout` elapses
    fn wait_until_present(&self, selector: &str, timeout: Duration) -> ScrapeResult<()>;

    /// Number of elements currently matching `selector`
    fn count(&self, selector: &str) -> ScrapeResult<usize>;

    /// Outer HTML of the current document
    fn page_html(&self) -> ScrapeResult<String>;
}

/// Run `probe` every `interval` until it reports `true` or `timeout` passes.
///
/// Returns `false` on expiry. Browser errors count as "not yet", since the
/// page may be mid-navigation; any other probe error is returned as-is.
pub fn poll_until<F>(timeout: Duration, interval: Duration, mut probe: F) -> ScrapeResult<bool>
where
    F: FnMut() -> ScrapeResult<bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match probe() {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(ScrapeError::Browser(err)) => debug!("Probe failed, polling again: {}", err),
            Err(err) => return Err(err),
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        thread::sleep(interval.min(deadline - now));
    }
}

/// `poll_until` that turns expiry into `ScrapeError::Timeout`
pub fn wait_for<F>(
    selector: &str,
    timeout: Duration,
    interval: Duration,
    probe: F,
) -> ScrapeResult<()>
where
    F: FnMut() -> ScrapeResult<bool>,
{
    if poll_until(timeout, interval, probe)? {
        Ok(())
    } else {
        Err(ScrapeError::Timeout {
            selector: selector.to_string(),
            timeout,
        })
    }
}
