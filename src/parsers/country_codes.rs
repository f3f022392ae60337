//! Reader for the country name → ISO alpha-3 reference table

use csv::StringRecord;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::csv_reader;
use crate::types::{CountryCodeTable, CovidashError, Dataset, Result};

/// Header names accepted for the country column (case-insensitive)
const NAME_HEADERS: [&str; 4] = ["country/region", "country", "name", "country_name"];

/// Header names accepted for the code column (case-insensitive)
const CODE_HEADERS: [&str; 5] = ["code", "iso3", "iso", "alpha-3", "iso_alpha3"];

fn find_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.iter().any(|c| h.eq_ignore_ascii_case(c)))
}

/// Resolve (name, code) column indices; falls back to the first two columns
fn resolve_columns(headers: &StringRecord) -> Result<(usize, usize)> {
    match (
        find_column(headers, &NAME_HEADERS),
        find_column(headers, &CODE_HEADERS),
    ) {
        (Some(name), Some(code)) => Ok((name, code)),
        (None, None) if headers.len() >= 2 => Ok((0, 1)),
        (None, _) => Err(CovidashError::format(
            Dataset::CountryCodes,
            "missing country name column",
        )),
        (_, None) => Err(CovidashError::format(
            Dataset::CountryCodes,
            "missing ISO code column",
        )),
    }
}

fn is_alpha3(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Parse the reference table
pub fn parse_country_codes(text: &str) -> Result<CountryCodeTable> {
    let dataset = Dataset::CountryCodes;
    let mut reader = csv_reader(text);
    let headers = reader
        .headers()
        .map_err(|e| CovidashError::format(dataset, format!("unreadable header: {}", e)))?
        .clone();
    let (name_idx, code_idx) = resolve_columns(&headers)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let lineno = idx + 2;
        let record = record
            .map_err(|e| CovidashError::format(dataset, format!("line {}: {}", lineno, e)))?;

        let name = record.get(name_idx).unwrap_or_default();
        let code = record.get(code_idx).unwrap_or_default().trim();
        if name.trim().is_empty() || code.is_empty() {
            debug!(line = lineno, "skipping country code row with empty field");
            continue;
        }
        if !is_alpha3(code) {
            return Err(CovidashError::format(
                dataset,
                format!("line {}: '{}' is not a 3-letter code", lineno, code),
            ));
        }
        if !seen.insert(name.to_string()) {
            warn!(country = name, line = lineno, "duplicate country code entry ignored");
            continue;
        }
        pairs.push((name.to_string(), code.to_ascii_uppercase()));
    }

    debug!(entries = pairs.len(), "parsed country codes");
    Ok(CountryCodeTable::from_pairs(pairs))
}
