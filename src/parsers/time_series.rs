//! Reader for the JHU CSSE time-series layout:
//! `Province/State,Country/Region,Lat,Long,<M/D/YY>,...`

use chrono::NaiveDate;
use tracing::debug;

use super::csv_reader;
use crate::types::{CovidashError, Dataset, Result, SeriesRow, TimeSeriesTable};

/// Fixed columns preceding the date columns
const LEADING_COLUMNS: [&str; 4] = ["Province/State", "Country/Region", "Lat", "Long"];

/// Parse a date column header in `M/D/YY` form (four-digit years are accepted too)
fn parse_date_header(header: &str) -> Option<NaiveDate> {
    let mut parts = header.trim().split('/');
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year_str = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let year: i32 = match year_str.len() {
        2 => 2000 + year_str.parse::<i32>().ok()?,
        4 => year_str.parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a cumulative count cell. Blank cells count as zero.
fn parse_count(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0);
    }
    cell.parse().ok()
}

/// Parse a whole time-series CSV document
pub fn parse_time_series(dataset: Dataset, text: &str) -> Result<TimeSeriesTable> {
    let mut reader = csv_reader(text);
    let headers = reader
        .headers()
        .map_err(|e| CovidashError::format(dataset, format!("unreadable header: {}", e)))?
        .clone();

    for (idx, expected) in LEADING_COLUMNS.iter().enumerate() {
        match headers.get(idx) {
            Some(found) if found == *expected => {}
            Some(found) => {
                return Err(CovidashError::format(
                    dataset,
                    format!(
                        "expected column '{}' at position {}, found '{}'",
                        expected,
                        idx + 1,
                        found
                    ),
                ))
            }
            None => {
                return Err(CovidashError::format(
                    dataset,
                    format!("missing column '{}'", expected),
                ))
            }
        }
    }

    let dates = headers
        .iter()
        .skip(LEADING_COLUMNS.len())
        .map(|h| {
            parse_date_header(h).ok_or_else(|| {
                CovidashError::format(dataset, format!("invalid date column '{}'", h))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1
        let lineno = idx + 2;
        let record = record
            .map_err(|e| CovidashError::format(dataset, format!("line {}: {}", lineno, e)))?;

        if record.len() != headers.len() {
            return Err(CovidashError::format(
                dataset,
                format!(
                    "line {}: expected {} fields, found {}",
                    lineno,
                    headers.len(),
                    record.len()
                ),
            ));
        }

        let country = record.get(1).unwrap_or_default();
        if country.trim().is_empty() {
            return Err(CovidashError::format(
                dataset,
                format!("line {}: empty Country/Region", lineno),
            ));
        }
        let province = record.get(0).filter(|p| !p.trim().is_empty());

        let values = record
            .iter()
            .skip(LEADING_COLUMNS.len())
            .zip(&dates)
            .map(|(cell, date)| {
                parse_count(cell).ok_or_else(|| {
                    CovidashError::format(
                        dataset,
                        format!(
                            "line {}: non-numeric count '{}' for {} on {}",
                            lineno, cell, country, date
                        ),
                    )
                })
            })
            .collect::<Result<Vec<u64>>>()?;

        rows.push(SeriesRow::new(province, country, values));
    }

    debug!(
        dataset = %dataset,
        rows = rows.len(),
        dates = dates.len(),
        "parsed time series"
    );

    TimeSeriesTable::new(dataset, dates, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
Hubei,China,30.97,112.27,444,444,549
Beijing,China,40.18,116.41,14,22,36
,Italy,41.87,12.56,0,0,2
";

    #[test]
    fn test_parse_date_header() {
        assert_eq!(
            parse_date_header("1/22/20"),
            NaiveDate::from_ymd_opt(2020, 1, 22)
        );
        assert_eq!(
            parse_date_header("12/31/21"),
            NaiveDate::from_ymd_opt(2021, 12, 31)
        );
        assert_eq!(
            parse_date_header("6/1/2021"),
            NaiveDate::from_ymd_opt(2021, 6, 1)
        );
        assert_eq!(parse_date_header("13/1/20"), None);
        assert_eq!(parse_date_header("Lat"), None);
        assert_eq!(parse_date_header("1/2/3/4"), None);
    }

    #[test]
    fn test_parse_sample() {
        let table = parse_time_series(Dataset::Confirmed, SAMPLE).unwrap();
        assert_eq!(table.dates().len(), 3);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[0].province.as_deref(), Some("Hubei"));
        assert_eq!(table.rows()[0].values, vec![444, 444, 549]);
        assert_eq!(table.rows()[2].province, None);
        assert_eq!(table.rows()[2].country, "Italy");
        assert_eq!(
            table.latest_date(),
            NaiveDate::from_ymd_opt(2020, 1, 24).unwrap()
        );
    }

    #[test]
    fn test_quoted_country_names() {
        let text = "\
Province/State,Country/Region,Lat,Long,1/22/20
,\"Korea, South\",35.9,127.8,1
";
        let table = parse_time_series(Dataset::Confirmed, text).unwrap();
        assert_eq!(table.rows()[0].country, "Korea, South");
    }

    #[test]
    fn test_empty_cell_counts_as_zero() {
        let text = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
,Italy,,,,5
";
        let table = parse_time_series(Dataset::Recovered, text).unwrap();
        assert_eq!(table.rows()[0].values, vec![0, 5]);
    }

    #[test]
    fn test_missing_leading_column() {
        let text = "Country/Region,Lat,Long,1/22/20\nItaly,1,1,0\n";
        let err = parse_time_series(Dataset::Deaths, text).unwrap_err();
        assert!(matches!(
            err,
            CovidashError::Format {
                dataset: Dataset::Deaths,
                ..
            }
        ));
        assert!(err.to_string().contains("Province/State"));
    }

    #[test]
    fn test_no_date_columns() {
        let text = "Province/State,Country/Region,Lat,Long\n,Italy,1,1\n";
        let err = parse_time_series(Dataset::Confirmed, text).unwrap_err();
        assert!(err.to_string().contains("no date columns"));
    }

    #[test]
    fn test_invalid_date_header() {
        let text = "Province/State,Country/Region,Lat,Long,yesterday\n,Italy,1,1,0\n";
        let err = parse_time_series(Dataset::Confirmed, text).unwrap_err();
        assert!(err.to_string().contains("invalid date column 'yesterday'"));
    }

    #[test]
    fn test_non_numeric_count() {
        let text = "Province/State,Country/Region,Lat,Long,1/22/20\n,Italy,1,1,n/a\n";
        let err = parse_time_series(Dataset::Confirmed, text).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_negative_count_rejected() {
        let text = "Province/State,Country/Region,Lat,Long,1/22/20\n,Italy,1,1,-3\n";
        assert!(parse_time_series(Dataset::Confirmed, text).is_err());
    }

    #[test]
    fn test_ragged_row() {
        let text = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Italy,1,1,0\n";
        let err = parse_time_series(Dataset::Confirmed, text).unwrap_err();
        assert!(err.to_string().contains("expected 6 fields, found 5"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let text = "\u{feff}Province/State,Country/Region,Lat,Long,1/22/20\n,Italy,1,1,4\n";
        let table = parse_time_series(Dataset::Confirmed, text).unwrap();
        assert_eq!(table.rows()[0].values, vec![4]);
    }

    #[test]
    fn test_country_name_kept_verbatim() {
        let text = "\
Province/State , Country/Region,Lat,Long,1/22/20
, Italy,41.87,12.56, 7
";
        let table = parse_time_series(Dataset::Confirmed, text).unwrap();
        assert_eq!(table.rows()[0].country, " Italy");
        assert_eq!(table.rows()[0].values, vec![7]);
    }
}
