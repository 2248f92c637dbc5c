use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// CSS selectors for the demo shop layout
pub mod selectors {
    pub const LISTING_CARD: &str = ".col-md-4.col-xl-4.col-lg-4";
    pub const SUBCATEGORY_NAV: &str = ".nav.nav-second-level";
    pub const LOAD_MORE_CONTAINER: &str = ".row.ecomerce-items.ecomerce-items-more";
    pub const LOAD_MORE_BUTTON: &str =
        ".btn.btn-lg.btn-block.btn-primary.ecomerce-items-scroll-more";
    pub const COOKIE_BANNER_CLOSE: &str = "#closeCookieBanner";

    pub const COMPUTERS_LINK: &str = "a[href='/test-sites/e-commerce/more/computers']";
    pub const LAPTOPS_LINK: &str = "a[href='/test-sites/e-commerce/more/computers/laptops']";
    pub const TABLETS_LINK: &str = "a[href='/test-sites/e-commerce/more/computers/tablets']";
    pub const PHONES_LINK: &str = "a[href='/test-sites/e-commerce/more/phones']";
    pub const TOUCH_LINK: &str = "a[href='/test-sites/e-commerce/more/phones/touch']";
}

/// How a listing view exposes the star rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingStyle {
    /// `<p data-rating="N">` on the grid views
    DataAttribute,
    /// One `span.ws-icon` per star on the "load more" views
    IconCount,
}

/// Navigation recipe from the shop home page to a listing view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Listings on the home page itself
    Direct,
    /// One click on a category link
    Category { link: &'static str },
    /// Category then subcategory, followed by "load more" until exhausted
    Paginated {
        category: &'static str,
        subcategory: &'static str,
    },
}

/// One scraping target and where its rows go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub name: &'static str,
    pub output: &'static str,
    pub route: Route,
    pub rating: RatingStyle,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target {
            name: "home",
            output: "home.csv",
            route: Route::Direct,
            rating: RatingStyle::DataAttribute,
        },
        Target {
            name: "computers",
            output: "computers.csv",
            route: Route::Category {
                link: selectors::COMPUTERS_LINK,
            },
            rating: RatingStyle::DataAttribute,
        },
        Target {
            name: "laptops",
            output: "laptops.csv",
            route: Route::Paginated {
                category: selectors::COMPUTERS_LINK,
                subcategory: selectors::LAPTOPS_LINK,
            },
            rating: RatingStyle::IconCount,
        },
        Target {
            name: "tablets",
            output: "tablets.csv",
            route: Route::Paginated {
                category: selectors::COMPUTERS_LINK,
                subcategory: selectors::TABLETS_LINK,
            },
            rating: RatingStyle::IconCount,
        },
        Target {
            name: "phones",
            output: "phones.csv",
            route: Route::Category {
                link: selectors::PHONES_LINK,
            },
            rating: RatingStyle::DataAttribute,
        },
        Target {
            name: "touch",
            output: "touch.csv",
            route: Route::Paginated {
                category: selectors::PHONES_LINK,
                subcategory: selectors::TOUCH_LINK,
            },
            rating: RatingStyle::IconCount,
        },
    ];
}

/// Runtime settings for one scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Site root
    pub base_url: String,
    /// Shop entry page, relative to `base_url`
    pub home_path: String,
    /// Directory the CSV files are written to
    pub output_dir: PathBuf,
    /// Upper bound for every navigation and presence wait
    pub wait_timeout: Duration,
    /// Delay between presence probes
    pub poll_interval: Duration,
    /// Overlay dismissals allowed per "load more" attempt
    pub max_obstruction_retries: u32,
    pub headless: bool,
    pub window_size: (u32, u32),
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://webscraper.io/".to_string(),
            home_path: "test-sites/e-commerce/more/".to_string(),
            output_dir: PathBuf::from("."),
            wait_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            max_obstruction_retries: 1,
            headless: true,
            window_size: (1920, 1080),
        }
    }
}

impl ScrapeConfig {
    /// Absolute URL of the shop home page
    pub fn home_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)?.join(&self.home_path)
    }

    pub fn output_path(&self, target: &Target) -> PathBuf {
        self.output_dir.join(target.output)
    }
}
