//! covidash: COVID-19 time-series aggregation and terminal dashboard

pub mod cli;
pub mod config;
pub mod parsers;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;
