use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::traits::{poll_until, Navigator};
use crate::scrapers::types::{selectors, ScrapeConfig};
use tracing::{debug, warn};

/// Why the "load more" loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The button is gone from the page
    ControlAbsent,
    /// The button is still there but hidden or disabled
    ControlDisabled,
    /// An overlay kept intercepting clicks after every allowed dismissal
    ObstructionPersisted,
    /// A click went through but no new listings showed up in time
    NothingLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationReport {
    /// "Load more" clicks that added listings
    pub pages_loaded: u32,
    /// Overlay dismissals, not counted as pages
    pub obstruction_retries: u32,
    pub stop: StopReason,
}

impl PaginationReport {
    /// False when listings may still be missing from the view
    pub fn is_complete(&self) -> bool {
        matches!(self.stop, StopReason::ControlAbsent | StopReason::ControlDisabled)
    }
}

/// Click "load more" until the view is exhausted.
///
/// A click counts as a page only once the number of listing cards grows.
/// Each attempt may be retried after dismissing the cookie overlay at most
/// `max_obstruction_retries` times; the budget resets after every page that
/// loads. Errors other than the stop conditions abort the loop.
pub fn load_all<N: Navigator + ?Sized>(
    nav: &N,
    config: &ScrapeConfig,
) -> ScrapeResult<PaginationReport> {
    let mut pages_loaded = 0;
    let mut obstruction_retries = 0;
    let mut attempt_retries = 0;

    let stop = loop {
        let before = nav.count(selectors::LISTING_CARD)?;

        match nav.click(selectors::LOAD_MORE_BUTTON) {
            Ok(()) => {
                let grew = poll_until(config.wait_timeout, config.poll_interval, || {
                    Ok(nav.count(selectors::LISTING_CARD)? > before)
                })?;
                if !grew {
                    warn!(
                        "Load more added no listings within {:?}; stopping after {} page(s)",
                        config.wait_timeout, pages_loaded
                    );
                    break StopReason::NothingLoaded;
                }
                pages_loaded += 1;
                attempt_retries = 0;
                debug!("Loaded page {} of listings", pages_loaded);
            }
            Err(ScrapeError::NotFound { .. }) => break StopReason::ControlAbsent,
            Err(ScrapeError::NotInteractable { reason, .. }) => {
                debug!("Load more control no longer usable: {}", reason);
                break StopReason::ControlDisabled;
            }
            Err(err) if err.is_obstruction() => {
                if attempt_retries >= config.max_obstruction_retries {
                    warn!(
                        "Overlay still blocks load more after {} dismissal(s); \
                         stopping after {} page(s)",
                        attempt_retries, pages_loaded
                    );
                    break StopReason::ObstructionPersisted;
                }
                attempt_retries += 1;
                obstruction_retries += 1;
                dismiss_overlay(nav, config);
            }
            Err(err) => return Err(err),
        }
    };

    Ok(PaginationReport {
        pages_loaded,
        obstruction_retries,
        stop,
    })
}

/// Close the cookie banner if it shows up; failures only leave it in place
fn dismiss_overlay<N: Navigator + ?Sized>(nav: &N, config: &ScrapeConfig) {
    let dismissed = nav
        .wait_until_present(selectors::COOKIE_BANNER_CLOSE, config.wait_timeout)
        .and_then(|()| nav.click(selectors::COOKIE_BANNER_CLOSE));

    match dismissed {
        Ok(()) => debug!("Dismissed cookie banner"),
        Err(err) => debug!("Could not dismiss cookie banner: {}", err),
    }
}
