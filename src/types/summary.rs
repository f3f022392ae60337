//! Derived views handed to the presentation layer

use chrono::NaiveDate;
use serde::Serialize;

/// Latest counts for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRow {
    pub country: String,
    /// ISO 3166-1 alpha-3 code, `None` when the reference table has no entry
    pub iso_code: Option<String>,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

/// Column the country table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Confirmed,
    Deaths,
    Recovered,
    Country,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Deaths => "Deaths",
            Self::Recovered => "Recovered",
            Self::Country => "Country",
        }
    }

    /// Next key (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Confirmed => Self::Deaths,
            Self::Deaths => Self::Recovered,
            Self::Recovered => Self::Country,
            Self::Country => Self::Confirmed,
        }
    }
}

/// One row per country, ordered by confirmed cases (descending, ties by name)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CountrySummary {
    rows: Vec<CountryRow>,
}

impl CountrySummary {
    pub fn new(mut rows: Vec<CountryRow>) -> Self {
        sort_rows(&mut rows, SortKey::Confirmed);
        Self { rows }
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that can be drawn on the map
    pub fn mapped(&self) -> impl Iterator<Item = &CountryRow> {
        self.rows.iter().filter(|r| r.iso_code.is_some())
    }

    /// Join misses: countries without an ISO code
    pub fn unmapped(&self) -> impl Iterator<Item = &CountryRow> {
        self.rows.iter().filter(|r| r.iso_code.is_none())
    }

    /// Copy of the rows in the given order
    pub fn sorted_by(&self, key: SortKey) -> Vec<CountryRow> {
        let mut rows = self.rows.clone();
        sort_rows(&mut rows, key);
        rows
    }

    pub fn total_confirmed(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.confirmed))
    }

    pub fn total_deaths(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.deaths))
    }

    pub fn total_recovered(&self) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.recovered))
    }
}

fn sort_rows(rows: &mut [CountryRow], key: SortKey) {
    match key {
        SortKey::Confirmed => {
            rows.sort_by(|a, b| b.confirmed.cmp(&a.confirmed).then(a.country.cmp(&b.country)))
        }
        SortKey::Deaths => {
            rows.sort_by(|a, b| b.deaths.cmp(&a.deaths).then(a.country.cmp(&b.country)))
        }
        SortKey::Recovered => {
            rows.sort_by(|a, b| b.recovered.cmp(&a.recovered).then(a.country.cmp(&b.country)))
        }
        SortKey::Country => rows.sort_by(|a, b| a.country.cmp(&b.country)),
    }
}

/// Worldwide totals for one date column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

/// Worldwide totals per date, in source column order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    points: Vec<TimelinePoint>,
}

impl Timeline {
    pub fn new(points: Vec<TimelinePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TimelinePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// New confirmed cases per date (first date counts from zero).
    /// Corrections that lower the cumulative count show as zero.
    pub fn daily_new(&self) -> Vec<(NaiveDate, u64)> {
        let mut previous = 0u64;
        self.points
            .iter()
            .map(|p| {
                let new = p.confirmed.saturating_sub(previous);
                previous = p.confirmed;
                (p.date, new)
            })
            .collect()
    }
}

/// Scalar block shown next to the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub last_update: NaiveDate,
    pub total_countries: usize,
    pub total_confirmed_cases: u64,
    pub total_deaths: u64,
    pub total_recovered: u64,
    /// Countries kept in the table but left off the map
    pub unmapped_countries: Vec<String>,
}
