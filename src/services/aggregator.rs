//! Aggregator service: reshapes the raw tables into country and timeline views

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::types::{
    CountryCodeTable, CountryRow, CountrySummary, DashboardStats, TimeSeriesTable, Timeline,
    TimelinePoint,
};

/// The four parsed inputs, as produced by the loader
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub confirmed: TimeSeriesTable,
    pub deaths: TimeSeriesTable,
    pub recovered: TimeSeriesTable,
    pub country_codes: CountryCodeTable,
}

/// Aggregator over a loaded set of tables
pub struct Aggregator {
    tables: LoadedTables,
}

impl Aggregator {
    pub fn new(tables: LoadedTables) -> Self {
        Self { tables }
    }

    /// Rightmost date column of the confirmed table
    pub fn latest_date(&self) -> NaiveDate {
        self.tables.confirmed.latest_date()
    }

    /// Date shown as "Last update"
    pub fn last_update(&self) -> NaiveDate {
        self.latest_date()
    }

    /// Sum sub-national rows per country, keeping every date column
    pub fn group_by_country(table: &TimeSeriesTable) -> BTreeMap<String, Vec<u64>> {
        let width = table.dates().len();
        let mut grouped: BTreeMap<String, Vec<u64>> = BTreeMap::new();

        for row in table.rows() {
            let sums = grouped
                .entry(row.country.clone())
                .or_insert_with(|| vec![0; width]);
            for (sum, value) in sums.iter_mut().zip(&row.values) {
                *sum = sum.saturating_add(*value);
            }
        }

        grouped
    }

    /// Per-country count at the latest date column
    pub fn country_totals(table: &TimeSeriesTable) -> BTreeMap<String, u64> {
        let latest = table.latest_index();
        Self::group_by_country(table)
            .into_iter()
            .map(|(country, values)| (country, values[latest]))
            .collect()
    }

    /// One row per confirmed-table country, joined with deaths, recovered and ISO codes
    pub fn build_summary(&self) -> CountrySummary {
        let confirmed = Self::country_totals(&self.tables.confirmed);
        let deaths = Self::country_totals(&self.tables.deaths);
        let recovered = Self::country_totals(&self.tables.recovered);
        let codes = &self.tables.country_codes;

        let rows: Vec<CountryRow> = confirmed
            .into_iter()
            .map(|(country, confirmed)| {
                let iso_code = codes.get(&country).map(String::from);
                if iso_code.is_none() {
                    debug!(country = %country, "no ISO code for country");
                }
                CountryRow {
                    deaths: deaths.get(&country).copied().unwrap_or(0),
                    recovered: recovered.get(&country).copied().unwrap_or(0),
                    iso_code,
                    confirmed,
                    country,
                }
            })
            .collect();

        CountrySummary::new(rows)
    }

    /// Worldwide totals per confirmed-table date column.
    ///
    /// Deaths and recovered are matched by date; a date one of them lacks
    /// contributes zero for that metric.
    pub fn build_timeline(&self) -> Timeline {
        let confirmed = column_sums(&self.tables.confirmed);
        let deaths = sums_by_date(&self.tables.deaths);
        let recovered = sums_by_date(&self.tables.recovered);

        let mut missing = 0usize;
        let points = self
            .tables
            .confirmed
            .dates()
            .iter()
            .zip(confirmed)
            .map(|(date, confirmed)| {
                let d = deaths.get(date).copied();
                let r = recovered.get(date).copied();
                if d.is_none() || r.is_none() {
                    missing += 1;
                }
                TimelinePoint {
                    date: *date,
                    confirmed,
                    deaths: d.unwrap_or(0),
                    recovered: r.unwrap_or(0),
                }
            })
            .collect();

        if missing > 0 {
            warn!(dates = missing, "date columns missing from deaths or recovered data");
        }
        Timeline::new(points)
    }

    /// Distinct countries in the confirmed table
    pub fn total_countries(&self) -> usize {
        let mut names: Vec<&str> = self
            .tables
            .confirmed
            .rows()
            .iter()
            .map(|r| r.country.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    /// Sum of the latest confirmed column
    pub fn total_confirmed_cases(&self) -> u64 {
        let latest = self.tables.confirmed.latest_index();
        self.tables
            .confirmed
            .rows()
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.values[latest]))
    }

    /// Scalar block derived from one summary build
    pub fn stats(&self) -> DashboardStats {
        self.stats_for(&self.build_summary())
    }

    /// Scalar block for a summary the caller already built
    pub fn stats_for(&self, summary: &CountrySummary) -> DashboardStats {
        let unmapped_countries: Vec<String> =
            summary.unmapped().map(|r| r.country.clone()).collect();
        if !unmapped_countries.is_empty() {
            info!(
                count = unmapped_countries.len(),
                "countries without ISO code left off the map"
            );
        }

        DashboardStats {
            last_update: self.last_update(),
            total_countries: summary.len(),
            total_confirmed_cases: summary.total_confirmed(),
            total_deaths: summary.total_deaths(),
            total_recovered: summary.total_recovered(),
            unmapped_countries,
        }
    }
}

fn column_sums(table: &TimeSeriesTable) -> Vec<u64> {
    let mut sums = vec![0u64; table.dates().len()];
    for row in table.rows() {
        for (sum, value) in sums.iter_mut().zip(&row.values) {
            *sum = sum.saturating_add(*value);
        }
    }
    sums
}

fn sums_by_date(table: &TimeSeriesTable) -> BTreeMap<NaiveDate, u64> {
    table
        .dates()
        .iter()
        .copied()
        .zip(column_sums(table))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dataset, SeriesRow};

    fn date(m: u32, d: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(dataset: Dataset, dates: Vec<NaiveDate>, rows: Vec<SeriesRow>) -> TimeSeriesTable {
        TimeSeriesTable::new(dataset, dates, rows).unwrap()
    }

    fn sample() -> LoadedTables {
        let dates = vec![date(5, 31, 2021), date(6, 1, 2021)];
        LoadedTables {
            confirmed: table(
                Dataset::Confirmed,
                dates.clone(),
                vec![
                    SeriesRow::new(Some("Hubei"), "China", vec![450, 500]),
                    SeriesRow::new(Some("Beijing"), "China", vec![280, 300]),
                    SeriesRow::new(None, "Italy", vec![150, 200]),
                    SeriesRow::new(None, "Kosovo", vec![40, 50]),
                ],
            ),
            deaths: table(
                Dataset::Deaths,
                dates.clone(),
                vec![
                    SeriesRow::new(Some("Hubei"), "China", vec![4, 5]),
                    SeriesRow::new(None, "Italy", vec![9, 10]),
                ],
            ),
            recovered: table(
                Dataset::Recovered,
                dates,
                vec![SeriesRow::new(None, "Italy", vec![100, 120])],
            ),
            country_codes: CountryCodeTable::from_pairs(vec![("China", "CHN"), ("Italy", "ITA")]),
        }
    }

    // ========== country_totals tests ==========

    #[test]
    fn test_country_totals_sums_provinces() {
        let tables = sample();
        let totals = Aggregator::country_totals(&tables.confirmed);
        assert_eq!(totals.get("China"), Some(&800));
        assert_eq!(totals.get("Italy"), Some(&200));
        assert_eq!(totals.len(), 3);
    }

    #[test]
    fn test_country_totals_row_count_per_table() {
        let tables = sample();
        assert_eq!(Aggregator::country_totals(&tables.confirmed).len(), 3);
        assert_eq!(Aggregator::country_totals(&tables.deaths).len(), 2);
        assert_eq!(Aggregator::country_totals(&tables.recovered).len(), 1);
        assert_eq!(Aggregator::country_totals(&tables.deaths).get("China"), Some(&5));
    }

    #[test]
    fn test_group_by_country_keeps_all_dates() {
        let tables = sample();
        let grouped = Aggregator::group_by_country(&tables.confirmed);
        assert_eq!(grouped["China"], vec![730, 800]);
    }

    // ========== summary tests ==========

    #[test]
    fn test_join_miss_kept_without_code() {
        let agg = Aggregator::new(sample());
        let summary = agg.build_summary();
        let kosovo = summary
            .rows()
            .iter()
            .find(|r| r.country == "Kosovo")
            .unwrap();
        assert_eq!(kosovo.iso_code, None);
        assert_eq!(kosovo.confirmed, 50);
        assert_eq!(summary.total_confirmed(), 1050);
    }

    #[test]
    fn test_summary_joins_metrics() {
        let agg = Aggregator::new(sample());
        let summary = agg.build_summary();
        let china = &summary.rows()[0];
        assert_eq!(china.country, "China");
        assert_eq!(china.iso_code.as_deref(), Some("CHN"));
        assert_eq!(china.deaths, 5);
        assert_eq!(china.recovered, 0);
    }

    #[test]
    fn test_build_summary_is_repeatable() {
        let agg = Aggregator::new(sample());
        assert_eq!(agg.build_summary(), agg.build_summary());
    }

    // ========== scalar tests ==========

    #[test]
    fn test_last_update_is_rightmost_column() {
        let agg = Aggregator::new(sample());
        assert_eq!(agg.last_update(), date(6, 1, 2021));
    }

    #[test]
    fn test_totals_match_summary() {
        let agg = Aggregator::new(sample());
        let summary = agg.build_summary();
        assert_eq!(agg.total_confirmed_cases(), summary.total_confirmed());
        assert_eq!(agg.total_countries(), summary.len());
    }

    #[test]
    fn test_stats_lists_unmapped() {
        let stats = Aggregator::new(sample()).stats();
        assert_eq!(stats.total_countries, 3);
        assert_eq!(stats.total_confirmed_cases, 1050);
        assert_eq!(stats.total_deaths, 15);
        assert_eq!(stats.total_recovered, 120);
        assert_eq!(stats.unmapped_countries, vec!["Kosovo".to_string()]);
    }

    #[test]
    fn test_stats_for_prebuilt_summary() {
        let agg = Aggregator::new(sample());
        let summary = agg.build_summary();
        assert_eq!(agg.stats_for(&summary), agg.stats());
    }

    // ========== timeline tests ==========

    #[test]
    fn test_timeline_sums_per_date() {
        let timeline = Aggregator::new(sample()).build_timeline();
        assert_eq!(timeline.len(), 2);
        let first = timeline.points()[0];
        assert_eq!(first.confirmed, 920);
        assert_eq!(first.deaths, 13);
        assert_eq!(first.recovered, 100);
    }

    #[test]
    fn test_timeline_confirmed_non_decreasing() {
        let timeline = Aggregator::new(sample()).build_timeline();
        assert!(timeline
            .points()
            .windows(2)
            .all(|w| w[0].confirmed <= w[1].confirmed));
    }

    #[test]
    fn test_timeline_missing_date_counts_zero() {
        let mut tables = sample();
        tables.recovered = table(
            Dataset::Recovered,
            vec![date(5, 31, 2021)],
            vec![SeriesRow::new(None, "Italy", vec![100])],
        );
        let timeline = Aggregator::new(tables).build_timeline();
        assert_eq!(timeline.points()[1].recovered, 0);
        assert_eq!(timeline.points()[1].confirmed, 1050);
    }
}
