use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{SourceConfig, DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::services::{Aggregator, DataLoaderService};
use crate::sources::Source;
use crate::tui::widgets::overview::{format_number, ATTRIBUTION, TITLE};
use crate::tui::{self, AppData};
use crate::types::{CountrySummary, DashboardStats, Timeline};

/// COVID-19 time-series dashboard for the terminal
#[derive(Parser)]
#[command(name = "covidash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Input locations and fetch limits
#[derive(Args, Debug)]
struct SourceArgs {
    /// Confirmed-cases CSV (URL or path) [default: JHU CSSE global series]
    #[arg(long, global = true, env = "COVIDASH_CONFIRMED")]
    confirmed: Option<String>,

    /// Deaths CSV (URL or path) [default: JHU CSSE global series]
    #[arg(long, global = true, env = "COVIDASH_DEATHS")]
    deaths: Option<String>,

    /// Recovered CSV (URL or path) [default: JHU CSSE global series]
    #[arg(long, global = true, env = "COVIDASH_RECOVERED")]
    recovered: Option<String>,

    /// Country name to ISO alpha-3 table (URL or path) [default: bundled]
    #[arg(long, global = true, env = "COVIDASH_COUNTRY_CODES")]
    country_codes: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "COVIDASH_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Retries after a failed request
    #[arg(long, global = true, env = "COVIDASH_RETRIES", default_value_t = DEFAULT_RETRIES)]
    retries: u32,
}

impl SourceArgs {
    fn into_config(self) -> anyhow::Result<SourceConfig> {
        if self.timeout == 0 {
            anyhow::bail!("--timeout must be at least 1 second");
        }
        let defaults = SourceConfig::default();
        let pick = |arg: Option<String>, default: Source| arg.map_or(default, |s| Source::parse(&s));
        Ok(SourceConfig {
            confirmed: pick(self.confirmed, defaults.confirmed),
            deaths: pick(self.deaths, defaults.deaths),
            recovered: pick(self.recovered, defaults.recovered),
            country_codes: pick(self.country_codes, defaults.country_codes),
            timeout: Duration::from_secs(self.timeout),
            retries: self.retries,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch interactive dashboard (default)
    Tui,

    /// Show latest counts per country
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show worldwide totals per date
    Timeline {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show headline statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        init_tracing(self.debug);

        let config = self.sources.into_config()?;
        debug!(?config, "resolved sources");
        let loader = DataLoaderService::new(config)?;
        let tables = loader.load().context("could not load COVID-19 data")?;
        let aggregator = Aggregator::new(tables);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.command {
            None | Some(Commands::Tui) => {
                drop(out);
                tui::run(AppData::from_aggregator(&aggregator))
            }
            Some(Commands::Summary { json }) => {
                let summary = aggregator.build_summary();
                if json {
                    write_json(&mut out, &summary)
                } else {
                    write_summary(&mut out, &summary)
                }
            }
            Some(Commands::Timeline { json }) => {
                let timeline = aggregator.build_timeline();
                if json {
                    write_json(&mut out, &timeline)
                } else {
                    write_timeline(&mut out, &timeline)
                }
            }
            Some(Commands::Stats { json }) => {
                let stats = aggregator.stats();
                if json {
                    write_json(&mut out, &stats)
                } else {
                    write_stats(&mut out, &stats)
                }
            }
        }
    }
}

/// Logs go to stderr so stdout stays clean for exports
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &CountrySummary) -> anyhow::Result<()> {
    writeln!(
        out,
        "{:<32} {:<4} {:>14} {:>12} {:>14}",
        "Country/Region", "ISO", "Confirmed", "Deaths", "Recovered"
    )?;
    for row in summary.rows() {
        writeln!(
            out,
            "{:<32} {:<4} {:>14} {:>12} {:>14}",
            row.country,
            row.iso_code.as_deref().unwrap_or(""),
            format_number(row.confirmed),
            format_number(row.deaths),
            format_number(row.recovered)
        )?;
    }
    Ok(())
}

fn write_timeline(out: &mut impl Write, timeline: &Timeline) -> anyhow::Result<()> {
    writeln!(
        out,
        "{:<10} {:>14} {:>12} {:>14}",
        "Date", "Confirmed", "Deaths", "Recovered"
    )?;
    for point in timeline.points() {
        writeln!(
            out,
            "{:<10} {:>14} {:>12} {:>14}",
            point.date.format("%Y-%m-%d"),
            format_number(point.confirmed),
            format_number(point.deaths),
            format_number(point.recovered)
        )?;
    }
    Ok(())
}

fn write_stats(out: &mut impl Write, stats: &DashboardStats) -> anyhow::Result<()> {
    writeln!(out, "{}", TITLE)?;
    writeln!(out)?;
    writeln!(out, "Last update: {}", stats.last_update.format("%Y-%m-%d"))?;
    writeln!(out, "Number of countries: {}", stats.total_countries)?;
    writeln!(
        out,
        "Total confirmed cases: {}",
        format_number(stats.total_confirmed_cases)
    )?;
    writeln!(out, "Total deaths: {}", format_number(stats.total_deaths))?;
    writeln!(out, "Total recovered: {}", format_number(stats.total_recovered))?;
    if !stats.unmapped_countries.is_empty() {
        writeln!(
            out,
            "Not on map (no ISO code): {}",
            stats.unmapped_countries.join(", ")
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", ATTRIBUTION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CountryRow, TimelinePoint};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["covidash"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_parse_summary_json() {
        let cli = Cli::try_parse_from(["covidash", "summary", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Summary { json: true })));
    }

    #[test]
    fn test_cli_parse_stats() {
        let cli = Cli::try_parse_from(["covidash", "stats"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Stats { json: false })));
    }

    #[test]
    fn test_cli_global_source_after_subcommand() {
        let cli =
            Cli::try_parse_from(["covidash", "timeline", "--confirmed", "data/c.csv", "--debug"])
                .unwrap();
        assert!(cli.debug);
        let config = cli.sources.into_config().unwrap();
        assert_eq!(config.confirmed, Source::Path(PathBuf::from("data/c.csv")));
        assert_eq!(config.country_codes, Source::Bundled);
    }

    #[test]
    fn test_cli_defaults_resolve_to_config() {
        let cli = Cli::try_parse_from(["covidash", "--retries", "0"]).unwrap();
        let config = cli.sources.into_config().unwrap();
        assert_eq!(config.retries, 0);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.deaths, SourceConfig::default().deaths);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from(["covidash", "--timeout", "0"]).unwrap();
        assert!(cli.sources.into_config().is_err());
    }

    #[test]
    fn test_write_stats_text() {
        let stats = DashboardStats {
            last_update: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            total_countries: 3,
            total_confirmed_cases: 1_050,
            total_deaths: 15,
            total_recovered: 120,
            unmapped_countries: vec!["Kosovo".into()],
        };
        let mut out = Vec::new();
        write_stats(&mut out, &stats).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Last update: 2021-06-01"));
        assert!(text.contains("Number of countries: 3"));
        assert!(text.contains("Total confirmed cases: 1,050"));
        assert!(text.contains("Not on map (no ISO code): Kosovo"));
    }

    #[test]
    fn test_write_summary_blank_code() {
        let summary = CountrySummary::new(vec![CountryRow {
            country: "Kosovo".into(),
            iso_code: None,
            confirmed: 50,
            deaths: 1,
            recovered: 0,
        }]);
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("Kosovo"));
    }

    #[test]
    fn test_write_timeline_json() {
        let timeline = Timeline::new(vec![TimelinePoint {
            date: NaiveDate::from_ymd_opt(2020, 1, 22).unwrap(),
            confirmed: 555,
            deaths: 17,
            recovered: 28,
        }]);
        let mut out = Vec::new();
        write_json(&mut out, &timeline).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["date"], "2020-01-22");
        assert_eq!(value[0]["confirmed"], 555);
    }
}
