//! Resolved input configuration

use std::time::Duration;

use crate::sources::Source;
use crate::types::Dataset;

pub const DEFAULT_CONFIRMED_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";
pub const DEFAULT_DEATHS_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_deaths_global.csv";
pub const DEFAULT_RECOVERED_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_recovered_global.csv";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRIES: u32 = 2;

/// Where each input comes from and how remote inputs are fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub confirmed: Source,
    pub deaths: Source,
    pub recovered: Source,
    pub country_codes: Source,
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            confirmed: Source::Url(DEFAULT_CONFIRMED_URL.to_string()),
            deaths: Source::Url(DEFAULT_DEATHS_URL.to_string()),
            recovered: Source::Url(DEFAULT_RECOVERED_URL.to_string()),
            country_codes: Source::Bundled,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
        }
    }
}

impl SourceConfig {
    pub fn source(&self, dataset: Dataset) -> &Source {
        match dataset {
            Dataset::Confirmed => &self.confirmed,
            Dataset::Deaths => &self.deaths,
            Dataset::Recovered => &self.recovered,
            Dataset::CountryCodes => &self.country_codes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = SourceConfig::default();
        assert_eq!(config.country_codes, Source::Bundled);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retries, 2);
        assert!(matches!(
            config.source(Dataset::Deaths),
            Source::Url(u) if u.ends_with("deaths_global.csv")
        ));
    }

    #[test]
    fn test_source_per_dataset() {
        let config = SourceConfig {
            recovered: Source::Path(PathBuf::from("r.csv")),
            ..SourceConfig::default()
        };
        assert_eq!(
            config.source(Dataset::Recovered),
            &Source::Path(PathBuf::from("r.csv"))
        );
        assert_eq!(config.source(Dataset::CountryCodes), &Source::Bundled);
    }
}
