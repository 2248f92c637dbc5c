use std::time::Duration;
use thiserror::Error;

/// Failures raised while navigating the site or turning a card into a record
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("no element matches `{selector}`")]
    NotFound { selector: String },
    #[error("element `{selector}` cannot be clicked: {reason}")]
    NotInteractable { selector: String, reason: String },
    #[error("click on `{selector}` intercepted by an overlay")]
    Obstructed { selector: String },
    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },
    #[error("listing has no `{field}` field")]
    MissingField { field: &'static str },
    #[error("cannot parse `{field}` from {value:?}")]
    FieldParse { field: &'static str, value: String },
    #[error("invalid CSS selector `{0}`")]
    InvalidSelector(String),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("browser error: {0}")]
    Browser(#[from] anyhow::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Interaction failures that a dismissed overlay may clear
    pub fn is_obstruction(&self) -> bool {
        matches!(self, ScrapeError::Obstructed { .. })
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
