//! Where the four input tables come from and how their text is obtained

mod http;

pub use http::{classify_status, with_retries, AttemptError, HttpFetcher};

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::types::{CovidashError, Dataset, Result};

/// Reference table shipped with the binary
pub const BUNDLED_COUNTRY_CODES: &str = include_str!("../../data/country_codes.csv");

/// Location of one input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Remote CSV fetched over HTTP(S)
    Url(String),
    /// Local CSV file
    Path(PathBuf),
    /// Table compiled into the binary (country codes only)
    Bundled,
}

impl Source {
    /// `http://` and `https://` strings are URLs, anything else is a path
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bundled => f.write_str("<bundled>"),
        }
    }
}

/// Text retrieval for remote sources
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body, or a human-readable failure reason
    fn get_text(&self, url: &str) -> std::result::Result<String, String>;
}

/// Read the raw CSV text of `dataset` from `source`
pub fn read_source(dataset: Dataset, source: &Source, fetcher: &dyn Fetcher) -> Result<String> {
    match source {
        Source::Url(url) => fetcher
            .get_text(url)
            .map_err(|reason| CovidashError::fetch(dataset, format!("{}: {}", url, reason))),
        Source::Path(path) => fs::read_to_string(path).map_err(|e| {
            CovidashError::fetch(dataset, format!("{}: {}", path.display(), e))
        }),
        Source::Bundled if dataset == Dataset::CountryCodes => {
            Ok(BUNDLED_COUNTRY_CODES.to_string())
        }
        Source::Bundled => Err(CovidashError::Config(format!(
            "no bundled table for {} data",
            dataset
        ))),
    }
}
