//! Loads and parses the four inputs in parallel

use std::time::Instant;

use tracing::info;

use crate::config::SourceConfig;
use crate::parsers::{parse_country_codes, parse_time_series};
use crate::services::LoadedTables;
use crate::sources::{read_source, Fetcher, HttpFetcher};
use crate::types::{CountryCodeTable, Dataset, Result, TimeSeriesTable};

/// Fetch-then-parse loader shared by the CLI exports and the TUI
pub struct DataLoaderService {
    config: SourceConfig,
    fetcher: Box<dyn Fetcher>,
}

impl DataLoaderService {
    /// Loader backed by the HTTP fetcher configured from `config`
    pub fn new(config: SourceConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout, config.retries)?;
        Ok(Self::with_fetcher(config, Box::new(fetcher)))
    }

    pub fn with_fetcher(config: SourceConfig, fetcher: Box<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Fetch and parse every input. The first failure aborts the load.
    pub fn load(&self) -> Result<LoadedTables> {
        let started = Instant::now();

        let ((confirmed, deaths), (recovered, country_codes)) = rayon::join(
            || {
                rayon::join(
                    || self.load_series(Dataset::Confirmed),
                    || self.load_series(Dataset::Deaths),
                )
            },
            || {
                rayon::join(
                    || self.load_series(Dataset::Recovered),
                    || self.load_country_codes(),
                )
            },
        );

        let tables = LoadedTables {
            confirmed: confirmed?,
            deaths: deaths?,
            recovered: recovered?,
            country_codes: country_codes?,
        };

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "all inputs loaded"
        );
        Ok(tables)
    }

    fn load_series(&self, dataset: Dataset) -> Result<TimeSeriesTable> {
        let text = self.read(dataset)?;
        let table = parse_time_series(dataset, &text)?;
        info!(
            dataset = %dataset,
            rows = table.rows().len(),
            dates = table.dates().len(),
            "loaded time series"
        );
        Ok(table)
    }

    fn load_country_codes(&self) -> Result<CountryCodeTable> {
        let text = self.read(Dataset::CountryCodes)?;
        let codes = parse_country_codes(&text)?;
        info!(entries = codes.len(), "loaded country codes");
        Ok(codes)
    }

    fn read(&self, dataset: Dataset) -> Result<String> {
        let source = self.config.source(dataset);
        info!(dataset = %dataset, source = %source, "reading");
        read_source(dataset, source, self.fetcher.as_ref())
    }
}
