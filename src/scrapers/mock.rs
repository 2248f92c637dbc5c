use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::traits::Navigator;
use crate::scrapers::types::selectors;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

/// Scripted result of one click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clicked,
    Missing,
    Obstructed,
    Disabled,
    Stalled,
}

impl Step {
    fn into_result(self, selector: &str) -> ScrapeResult<()> {
        let selector = selector.to_string();
        match self {
            Step::Clicked => Ok(()),
            Step::Missing => Err(ScrapeError::NotFound { selector }),
            Step::Obstructed => Err(ScrapeError::Obstructed { selector }),
            Step::Disabled => Err(ScrapeError::NotInteractable {
                selector,
                reason: "hidden".to_string(),
            }),
            Step::Stalled => Err(ScrapeError::Timeout {
                selector,
                timeout: Duration::ZERO,
            }),
        }
    }
}

#[derive(Default)]
struct Script {
    steps: VecDeque<Step>,
    fallback: Option<Step>,
}

/// In-memory `Navigator` replaying scripted click outcomes
#[derive(Default)]
pub struct MockNavigator {
    scripts: RefCell<HashMap<String, Script>>,
    absent: RefCell<HashSet<String>>,
    pages: RefCell<HashMap<String, String>>,
    current: RefCell<String>,
    cards: Cell<usize>,
    batches: RefCell<VecDeque<usize>>,
    log: RefCell<Vec<String>>,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue click outcomes for `selector`; `fallback` applies once they run out
    pub fn script(&self, selector: &str, steps: &[Step], fallback: Step) {
        self.scripts.borrow_mut().insert(
            selector.to_string(),
            Script {
                steps: steps.iter().copied().collect(),
                fallback: Some(fallback),
            },
        );
    }

    /// Make every wait for `selector` time out
    pub fn never_present(&self, selector: &str) {
        self.absent.borrow_mut().insert(selector.to_string());
    }

    /// HTML served after the last click on `selector` (or `open` of a URL)
    pub fn serve(&self, key: &str, html: &str) {
        self.pages.borrow_mut().insert(key.to_string(), html.to_string());
    }

    /// Cards added by each successful "load more" click; one per click afterwards
    pub fn batches(&self, sizes: &[usize]) {
        *self.batches.borrow_mut() = sizes.iter().copied().collect();
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// How often `call` was recorded
    pub fn times(&self, call: &str) -> usize {
        self.log.borrow().iter().filter(|c| c.as_str() == call).count()
    }

    fn record(&self, call: String) {
        self.log.borrow_mut().push(call);
    }

    fn switch_page(&self, key: &str) {
        if let Some(html) = self.pages.borrow().get(key) {
            *self.current.borrow_mut() = html.clone();
        }
    }
}

impl Navigator for MockNavigator {
    fn open(&self, url: &str) -> ScrapeResult<()> {
        self.record(format!("open {url}"));
        self.switch_page(url);
        Ok(())
    }

    fn click(&self, selector: &str) -> ScrapeResult<()> {
        self.record(format!("click {selector}"));
        let step = {
            let mut scripts = self.scripts.borrow_mut();
            match scripts.get_mut(selector) {
                Some(script) => script
                    .steps
                    .pop_front()
                    .or(script.fallback)
                    .unwrap_or(Step::Clicked),
                None => Step::Clicked,
            }
        };
        if step == Step::Clicked {
            self.switch_page(selector);
            if selector == selectors::LOAD_MORE_BUTTON {
                let added = self.batches.borrow_mut().pop_front().unwrap_or(1);
                self.cards.set(self.cards.get() + added);
            }
        }
        step.into_result(selector)
    }

    fn wait_until_present(&self, selector: &str, timeout: Duration) -> ScrapeResult<()> {
        self.record(format!("wait {selector}"));
        if self.absent.borrow().contains(selector) {
            return Err(ScrapeError::Timeout {
                selector: selector.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    fn count(&self, selector: &str) -> ScrapeResult<usize> {
        if self.absent.borrow().contains(selector) {
            Ok(0)
        } else if selector == selectors::LISTING_CARD {
            Ok(self.cards.get())
        } else {
            Ok(1)
        }
    }

    fn page_html(&self) -> ScrapeResult<String> {
        Ok(self.current.borrow().clone())
    }
}
