use crate::export::write_products;
use crate::models::Product;
use crate::scrapers::error::ScrapeResult;
use crate::scrapers::extract::extract_listings;
use crate::scrapers::paginate::{load_all, PaginationReport};
use crate::scrapers::types::{selectors, Route, ScrapeConfig, Target};
use crate::scrapers::Navigator;
use tracing::{error, info, warn};

/// Listings of one target plus how the "load more" loop ended, if it ran
#[derive(Debug)]
pub struct Scraped {
    pub products: Vec<Product>,
    pub pagination: Option<PaginationReport>,
}

impl Scraped {
    pub fn is_complete(&self) -> bool {
        self.pagination.map_or(true, |p| p.is_complete())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetStatus {
    Written { rows: usize, complete: bool },
    Failed(String),
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(&'static str, TargetStatus)>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, status)| matches!(status, TargetStatus::Failed(_)))
            .count()
    }

    #[cfg(test)]
    pub fn status(&self, name: &str) -> Option<&TargetStatus> {
        self.outcomes
            .iter()
            .find(|(target, _)| *target == name)
            .map(|(_, status)| status)
    }
}

/// Navigate to one target's listing view and extract every card
pub fn scrape_target<N: Navigator + ?Sized>(
    nav: &N,
    target: &Target,
    config: &ScrapeConfig,
) -> ScrapeResult<Scraped> {
    let home = config.home_url()?;
    nav.open(home.as_str())?;

    let pagination = match target.route {
        Route::Direct => None,
        Route::Category { link } => {
            nav.click(link)?;
            None
        }
        Route::Paginated {
            category,
            subcategory,
        } => {
            nav.click(category)?;
            nav.wait_until_present(selectors::SUBCATEGORY_NAV, config.wait_timeout)?;
            nav.click(subcategory)?;
            nav.wait_until_present(selectors::LOAD_MORE_CONTAINER, config.wait_timeout)?;
            Some(load_all(nav, config)?)
        }
    };

    nav.wait_until_present(selectors::LISTING_CARD, config.wait_timeout)?;
    let products = extract_listings(&nav.page_html()?, target.rating)?;

    Ok(Scraped {
        products,
        pagination,
    })
}

/// Scrape every target in order, writing one CSV per target.
/// A failing target is logged and skipped; the rest still run.
pub fn run<N: Navigator + ?Sized>(nav: &N, config: &ScrapeConfig) -> RunReport {
    let mut report = RunReport::default();

    for target in &Target::ALL {
        info!("Scraping {}...", target.name);

        let status = match scrape_and_write(nav, target, config) {
            Ok(status) => status,
            Err(err) => {
                error!("Target {} failed: {}", target.name, err);
                TargetStatus::Failed(err.to_string())
            }
        };
        report.outcomes.push((target.name, status));
    }

    report
}

fn scrape_and_write<N: Navigator + ?Sized>(
    nav: &N,
    target: &Target,
    config: &ScrapeConfig,
) -> ScrapeResult<TargetStatus> {
    let scraped = scrape_target(nav, target, config)?;

    if let Some(pagination) = scraped.pagination {
        info!(
            "{}: {} extra page(s) loaded, {} overlay retr(ies)",
            target.name, pagination.pages_loaded, pagination.obstruction_retries
        );
    }
    let complete = scraped.is_complete();
    if !complete {
        warn!(
            "{}: listing view not exhausted, writing {} partial row(s)",
            target.name,
            scraped.products.len()
        );
    }

    let path = config.output_path(target);
    write_products(&path, &scraped.products)?;
    info!("💾 Saved {} products to {}", scraped.products.len(), path.display());

    Ok(TargetStatus::Written {
        rows: scraped.products.len(),
        complete,
    })
}
