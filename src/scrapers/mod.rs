pub mod browser;
pub mod error;
pub mod extract;
pub mod paginate;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use browser::ChromeSession;
pub use traits::Navigator;
pub use types::{ScrapeConfig, Target};
