//! Raw input tables

use chrono::NaiveDate;
use std::collections::HashMap;

use super::{CovidashError, Dataset, Result};

/// One row of a time-series table: a country, optionally narrowed to a province/state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRow {
    pub province: Option<String>,
    pub country: String,
    /// Cumulative counts, one per date column
    pub values: Vec<u64>,
}

impl SeriesRow {
    pub fn new(province: Option<&str>, country: &str, values: Vec<u64>) -> Self {
        Self {
            province: province.map(String::from),
            country: country.to_string(),
            values,
        }
    }
}

/// Cumulative counts per geographic unit and date.
///
/// Date columns are kept in source order; the rightmost one is treated as
/// the most recent reporting date without re-sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeriesTable {
    dataset: Dataset,
    dates: Vec<NaiveDate>,
    rows: Vec<SeriesRow>,
}

impl TimeSeriesTable {
    /// Build a table, checking that there is at least one date column and
    /// that every row carries one value per date
    pub fn new(dataset: Dataset, dates: Vec<NaiveDate>, rows: Vec<SeriesRow>) -> Result<Self> {
        if dates.is_empty() {
            return Err(CovidashError::format(dataset, "no date columns"));
        }
        if let Some(row) = rows.iter().find(|r| r.values.len() != dates.len()) {
            return Err(CovidashError::format(
                dataset,
                format!(
                    "row for {} has {} values, expected {}",
                    row.country,
                    row.values.len(),
                    dates.len()
                ),
            ));
        }
        Ok(Self {
            dataset,
            dates,
            rows,
        })
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    /// Rightmost date column
    pub fn latest_date(&self) -> NaiveDate {
        // Non-empty by construction
        self.dates[self.dates.len() - 1]
    }

    /// Index of the rightmost date column
    pub fn latest_index(&self) -> usize {
        self.dates.len() - 1
    }
}

/// Country name → ISO 3166-1 alpha-3 code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCodeTable {
    codes: HashMap<String, String>,
}

impl CountryCodeTable {
    /// Build from (name, code) pairs; the first entry for a name wins
    pub fn from_pairs<I, N, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut codes = HashMap::new();
        for (name, code) in pairs {
            codes.entry(name.into()).or_insert_with(|| code.into());
        }
        Self { codes }
    }

    /// Exact-name lookup, no aliasing
    pub fn get(&self, country: &str) -> Option<&str> {
        self.codes.get(country).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
