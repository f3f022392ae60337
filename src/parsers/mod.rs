//! CSV readers for the time-series and country-code tables

mod country_codes;
mod time_series;

pub use country_codes::parse_country_codes;
pub use time_series::parse_time_series;

/// CSV reader over an in-memory document.
///
/// Rows are read flexibly so ragged lines surface as format errors with a
/// line number instead of an opaque csv error. A leading byte order mark is
/// dropped. Only headers are trimmed; name cells are kept verbatim for the
/// exact-name country join.
fn csv_reader(text: &str) -> csv::Reader<&[u8]> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes())
}
